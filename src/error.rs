//! Error types for the 3270 data stream engine
//!
//! Per-subsystem error enums with hand-written `Display` and
//! `std::error::Error` impls, converted into the top-level `Tn3270Error`
//! via `From`. Messages are stable: callers match on them.

use std::fmt;

/// Errors raised while decoding an inbound data stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatastreamError {
    /// First byte is not a known 3270 command in either code set
    UnrecognisedCommand(u8),
    /// A known command this engine does not implement (read family,
    /// erase-all-unprotected)
    UnsupportedCommand(u8),
    /// A buffer address needs two bytes and the stream ended after one
    AddressTerminatedEarly,
    /// An order introducer appeared but its payload was cut short
    TruncatedOrder(&'static str),
    /// A structured field length points past the end of the stream, or a
    /// header is shorter than its own length field
    TruncatedStructuredField,
    /// A structured field type other than Read Partition
    UnsupportedStructuredField(u8),
    /// A Read Partition operation other than Query / Query List
    UnsupportedQueryRequestType(u8),
}

impl fmt::Display for DatastreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatastreamError::UnrecognisedCommand(code) => {
                write!(f, "Unrecognised command code={}", code)
            }
            DatastreamError::UnsupportedCommand(code) => {
                write!(f, "Unsupported command code={}", code)
            }
            DatastreamError::AddressTerminatedEarly => {
                write!(f, "Buffer address terminated too early")
            }
            DatastreamError::TruncatedOrder(order) => {
                write!(f, "{} order terminated too early", order)
            }
            DatastreamError::TruncatedStructuredField => {
                write!(f, "Structured field terminated too early")
            }
            DatastreamError::UnsupportedStructuredField(sf_type) => {
                write!(f, "Unsupported structured field type=0x{:02X}", sf_type)
            }
            DatastreamError::UnsupportedQueryRequestType(op) => {
                write!(f, "Unsupported read partition operation=0x{:02X}", op)
            }
        }
    }
}

impl std::error::Error for DatastreamError {}

/// Errors raised by the terminal facade's cursor and retrieval API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalError {
    /// Row or column below 1
    InvalidCursorPosition { row: usize, col: usize },
    /// Row beyond the bottom of the screen
    RowOutOfRange { row: usize, rows: usize },
    /// Column beyond the right edge of the screen
    ColOutOfRange { col: usize, cols: usize },
    /// Retrieval of `length` characters from `position` runs off the
    /// end of the buffer
    LengthExceedsBuffer { position: usize, length: usize },
}

impl fmt::Display for TerminalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminalError::InvalidCursorPosition { row, col } => {
                write!(f, "Invalid cursor position ({}, {})", row, col)
            }
            TerminalError::RowOutOfRange { row, rows } => {
                write!(
                    f,
                    "Invalid cursor position: row {} exceeds number of rows ({})",
                    row, rows
                )
            }
            TerminalError::ColOutOfRange { col, cols } => {
                write!(
                    f,
                    "Invalid cursor position: column {} exceeds number of columns ({})",
                    col, cols
                )
            }
            TerminalError::LengthExceedsBuffer { position, length } => {
                write!(
                    f,
                    "Invalid length, it would exceed the screen buffer (position {}, length {})",
                    position, length
                )
            }
        }
    }
}

impl std::error::Error for TerminalError {}

/// Errors raised by waiting text searches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The expected text never appeared before the deadline. Carries
    /// the last screen snapshot scanned.
    TextNotFound { text: String, scanned: String },
    /// The failure text appeared before the expected text
    ErrorTextFound { found: String, scanned: String },
    /// The text appeared, but not the expected number of times
    IncorrectOccurrences {
        text: String,
        expected: usize,
        actual: usize,
        scanned: String,
    },
    /// `interrupt()` was called while the search was blocked
    Interrupted,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::TextNotFound { text, scanned } => {
                write!(f, "Text '{}' not found; screen was '{}'", text, scanned)
            }
            SearchError::ErrorTextFound { found, scanned } => {
                write!(f, "Error text '{}' found; screen was '{}'", found, scanned)
            }
            SearchError::IncorrectOccurrences {
                text,
                expected,
                actual,
                scanned,
            } => {
                write!(
                    f,
                    "Text '{}' found {} times, expected {}; screen was '{}'",
                    text, actual, expected, scanned
                )
            }
            SearchError::Interrupted => {
                write!(f, "Terminal was interrupted while waiting for text")
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Errors raised while loading or validating a terminal configuration
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    /// Rows or columns of zero
    InvalidDimensions { rows: usize, cols: usize },
    UnknownCodePage(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Configuration parse error: {}", e),
            ConfigError::InvalidDimensions { rows, cols } => {
                write!(f, "Invalid screen dimensions {}x{}", rows, cols)
            }
            ConfigError::UnknownCodePage(name) => {
                write!(f, "Unknown code page '{}'", name)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

/// Top-level error for the crate
#[derive(Debug)]
pub enum Tn3270Error {
    Datastream(DatastreamError),
    Terminal(TerminalError),
    Search(SearchError),
    Config(ConfigError),
}

impl fmt::Display for Tn3270Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tn3270Error::Datastream(e) => write!(f, "{}", e),
            Tn3270Error::Terminal(e) => write!(f, "{}", e),
            Tn3270Error::Search(e) => write!(f, "{}", e),
            Tn3270Error::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Tn3270Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Tn3270Error::Datastream(e) => Some(e),
            Tn3270Error::Terminal(e) => Some(e),
            Tn3270Error::Search(e) => Some(e),
            Tn3270Error::Config(e) => Some(e),
        }
    }
}

impl From<DatastreamError> for Tn3270Error {
    fn from(err: DatastreamError) -> Self {
        Tn3270Error::Datastream(err)
    }
}

impl From<TerminalError> for Tn3270Error {
    fn from(err: TerminalError) -> Self {
        Tn3270Error::Terminal(err)
    }
}

impl From<SearchError> for Tn3270Error {
    fn from(err: SearchError) -> Self {
        Tn3270Error::Search(err)
    }
}

impl From<ConfigError> for Tn3270Error {
    fn from(err: ConfigError) -> Self {
        Tn3270Error::Config(err)
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Tn3270Error>;

/// Result alias for the decoder
pub type DatastreamResult<T> = std::result::Result<T, DatastreamError>;
