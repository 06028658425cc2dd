//! tn3270r - IBM 3270 data stream engine
//!
//! Decodes the inbound 3270 data stream (commands, orders, structured
//! fields) into a field-partitioned screen buffer and encodes the
//! outbound query replies for capability negotiation. Transport framing
//! (telnet negotiation, EOR records) and rendering live outside this
//! crate: the engine consumes one framed record per call and exposes a
//! thread-safe terminal handle.
//!
//! ```
//! use tn3270r::Terminal;
//!
//! let term = Terminal::new(24, 80);
//! // Write "HI" at buffer position 0
//! term.process_inbound(&[0xF1, 0x40, 0x11, 0x40, 0x40, 0xC8, 0xC9]).unwrap();
//! assert_eq!(term.retrieve_text(1, 1, 2).unwrap(), "HI");
//! ```

pub mod addressing;
pub mod codes;
pub mod config;
pub mod datastream;
pub mod ebcdic;
pub mod error;
pub mod field;
pub mod screen;
pub mod structured_field;
pub mod terminal;

pub use config::TerminalConfig;
pub use datastream::{decode_inbound, InboundMessage, Order, WriteControlCharacter};
pub use ebcdic::{CharacterSet, Cp037};
pub use error::{
    ConfigError, DatastreamError, Result, SearchError, TerminalError, Tn3270Error,
};
pub use field::{Field, FieldAttributes};
pub use screen::Screen;
pub use structured_field::StructuredField;
pub use terminal::Terminal;
