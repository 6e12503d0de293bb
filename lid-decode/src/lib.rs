//! A library for decoding logger (`.lid`) files into temperature and orientation CSV streams.
//!
//! The library is designed for efficient, sequential reading of large logger files without
//! holding more than one data page in memory at a time.
extern crate chrono;

pub mod byte_source;
pub mod clock;
pub mod driver;
pub mod header;
pub mod page_decoder;
pub mod tag_parser;

pub use byte_source::ByteSource;
pub use driver::decode;
pub use header::{Header, InstrumentSettings, MiniHeaderTemplate};

pub use lid_core::errors::LidError;
pub use lid_core::settings::LidSettings;
