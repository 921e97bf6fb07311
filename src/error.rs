use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("SMF parse error: {0}")]
    SmfParse(String),

    #[error("Delta time {0} exceeds the 4-byte variable-length limit")]
    DeltaOverflow(u64),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
