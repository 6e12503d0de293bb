//! This library is the foundation for the `lid-decode` crate. It holds the structures and
//! calibration arithmetic that are shared between header parsing and page decoding: errors,
//! settings overrides, the host-storage (calibration) record, lookup tables, and the sampling
//! pattern planner. It can be built either with serialization support, or in a slightly more
//! lightweight manner without it (see features).
#[cfg(any(feature = "to_json", feature = "serde"))]
extern crate serde;
#[cfg(feature = "to_json")]
extern crate serde_json;

pub mod errors;
pub mod host_storage;
pub mod lookup;
pub mod pattern;
pub mod settings;

pub use errors::LidError;
pub use host_storage::{Axis, HostStorage};
pub use lookup::LookupTables;
pub use pattern::{Case, PatternPlan};
pub use settings::LidSettings;

/// Size of the main header at the start of every logger file.
pub const MAIN_HEADER_LEN: usize = 32 * 1024;
/// Size of a data page following the main header.
pub const PAGE_LEN: usize = 1024 * 1024;
/// Length of the end-of-data sentinel (14 bytes of `0xFF`).
pub const SENTINEL_LEN: usize = 14;
pub const SENTINEL_BYTE: u8 = 0xFF;
