//! Context providers and the assembler that stitches their output into the
//! text prepended to a query.

pub mod assembler;
pub mod box_provider;
pub mod port;

pub use assembler::ContextAssembler;
pub use box_provider::BoxContextProvider;
pub use port::ContextProvider;
