/// The four failure categories the decoder can raise.
///
/// `Syntax` is raised eagerly by the scanner/parser and fully unwinds the
/// decode call; no partial tree is ever returned alongside it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input. `line`/`column` are 1-based and point at the
    /// scanner's position at the moment the error was raised.
    #[error("{message} at line {line},{column} >>> {context}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
        context: String,
    },

    /// A typed accessor was applied to a `Value` of the wrong variant.
    /// Not raised by the decoder itself; reserved for host integrations
    /// built on top of the `Value` tree.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Vector access past its end.
    #[error("index {index} out of bounds for vector of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// The input file could not be opened or read.
    #[error("file error: {0}")]
    FileError(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn syntax(message: impl Into<String>, line: usize, column: usize, context: impl Into<String>) -> Self {
        Error::Syntax {
            message: message.into(),
            line,
            column,
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
