//! Extractors Crate
//!
//! Turns vendor maintenance-notification emails into structured
//! maintenance windows.
//!
//! # Architecture
//!
//! - **Types**: rules, messages and notifications live in the `shared-types` crate
//! - **Catalog**: [`PatternCatalog`] loads and compiles partner pattern files
//! - **Extraction**: [`extract`] pulls CID and times out of one message for one pattern
//! - **Normalization**: [`normalize`] parses times and computes the event identity
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::{extract, normalize, PatternCatalog};
//!
//! let catalog = PatternCatalog::load(&patterns_dir)?;
//! for pattern in catalog.iter() {
//!     let fields = extract(&message, pattern);
//!     if let Some(notification) = normalize(fields, pattern, &message)? {
//!         println!("{}", notification.event_uuid);
//!     }
//! }
//! ```

pub mod attachment_parser;
pub mod error;
pub mod maintenance_patterns;

pub use attachment_parser::{IcsParser, IcsParserConfig, InviteWindow};
pub use error::{CatalogError, NormalizeError};
pub use maintenance_patterns::{
    event_identity, extract, load_rules, normalize, parse_time, MaintenancePattern,
    PatternCatalog, RawMaintenanceFields, RawTime,
};
