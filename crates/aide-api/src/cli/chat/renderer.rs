//! Terminal markdown rendering with syntax-highlighted code blocks.
//!
//! Prose goes through `termimad`; fenced code blocks through `syntect`.

use crossterm::style::Color;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

const THEME: &str = "base16-ocean.dark";

pub struct ChatRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl ChatRenderer {
    pub fn new(accent_color: Option<Color>) -> Self {
        let mut skin = MadSkin::default_dark();

        if let Some(color) = accent_color {
            let tc = to_termimad_color(color);
            skin.bold.set_fg(tc);
            skin.headers[0].set_fg(tc);
            skin.headers[1].set_fg(tc);
        }
        skin.inline_code.set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render a complete markdown reply.
    pub fn render(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut code: Option<(String, String)> = None;

        for line in markdown.lines() {
            let fence = line.trim_start().starts_with("```");
            code = match (code.take(), fence) {
                (None, true) => {
                    let lang = line.trim_start().trim_start_matches('`').trim().to_string();
                    Some((lang, String::new()))
                }
                (Some((lang, buf)), true) => {
                    output.push_str(&self.highlight_code(&buf, &lang));
                    None
                }
                (Some((lang, mut buf)), false) => {
                    buf.push_str(line);
                    buf.push('\n');
                    Some((lang, buf))
                }
                (None, false) => {
                    output.push_str(&self.skin.term_text(line).to_string());
                    None
                }
            };
        }

        if let Some((lang, buf)) = code.filter(|(_, buf)| !buf.is_empty()) {
            output.push_str(&self.highlight_code(&buf, &lang));
        }

        output
    }

    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let Some(theme) = self.theme_set.themes.get(THEME) else {
            return code.to_string();
        };
        let mut h = HighlightLines::new(syntax, theme);

        let mut output = format!("  {}\n", console::style(format!("--- {lang} ---")).dim());
        for line in code.lines() {
            let ranges: Vec<(Style, &str)> = h
                .highlight_line(line, &self.syntax_set)
                .unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }
        output
    }
}

fn to_termimad_color(color: Color) -> termimad::crossterm::style::Color {
    use termimad::crossterm::style::Color as T;
    match color {
        Color::Cyan => T::Cyan,
        Color::Green => T::Green,
        Color::Yellow => T::Yellow,
        Color::Magenta => T::Magenta,
        Color::Blue => T::Blue,
        Color::Red => T::Red,
        Color::Rgb { r, g, b } => T::Rgb { r, g, b },
        _ => T::Cyan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prose_keeps_words() {
        let renderer = ChatRenderer::new(None);
        let out = renderer.render("Your next meeting is at 3pm.");
        assert!(out.contains("meeting"));
    }

    #[test]
    fn test_code_block_is_highlighted() {
        let renderer = ChatRenderer::new(Some(Color::Cyan));
        let out = renderer.render("Run this:\n```rust\nfn main() {}\n```\nDone.");
        assert!(out.contains("--- rust ---"));
        assert!(out.contains("\x1b[0m"));
        assert!(!out.contains("```"));
    }

    #[test]
    fn test_unclosed_code_block_is_flushed() {
        let renderer = ChatRenderer::new(None);
        let out = renderer.render("```sh\nls -la");
        assert!(out.contains("--- sh ---"));
    }
}
