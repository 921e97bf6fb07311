pub mod compiler;
pub mod error;
pub mod smf;

pub use compiler::Compiler;
pub use error::Error;
