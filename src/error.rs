use std::{fmt, io};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    InvalidUtf8 { line: usize },
    /// A record line without the tab separating key and value.
    MissingSeparator { line: usize },
    InvalidValue {
        line: usize,
        value: String,
        source: std::num::ParseIntError,
    },
    /// The running total for a key no longer fits in an `i64`.
    Overflow { key: String },
    /// A `LINECOUNT_*` variable holds no valid option.
    Config(config::ConfigError),
}

impl Error {
    /// Whether the error comes from a bad input line rather than the stream.
    pub fn is_malformed_record(&self) -> bool {
        matches!(
            self,
            Error::InvalidUtf8 { .. } | Error::MissingSeparator { .. } | Error::InvalidValue { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(_) => write!(f, "stream i/o failed"),
            Error::InvalidUtf8 { line } => write!(f, "line {line}: record is not valid utf-8"),
            Error::MissingSeparator { line } => {
                write!(f, "line {line}: expected `<key>\\t<value>`, found no tab")
            }
            Error::InvalidValue { line, value, .. } => {
                write!(f, "line {line}: `{value}` is not an integer count")
            }
            Error::Overflow { key } => write!(f, "total for key `{key}` overflowed"),
            Error::Config(_) => write!(f, "invalid LINECOUNT_* configuration"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::InvalidValue { source, .. } => Some(source),
            Error::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e)
    }
}
