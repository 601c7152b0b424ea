//! Dataset Module - Tabular training/scoring input
//!
//! Rows of numeric feature vectors plus one held-out nominal class column.
//! The class is used for evaluation bookkeeping only and never enters training.
//!
//! # Architecture
//! - `types.rs`: `Attribute`, `Header`, `Instance`, `Dataset`
//! - `validate.rs`: Capability checks before training / scoring
//! - `loader.rs`: CSV adapter (last column is the class)

pub mod types;
pub mod validate;
pub mod loader;

pub use types::{Attribute, AttributeKind, Dataset, Header, Instance};
pub use validate::{validate_for_scoring, validate_for_training};
pub use loader::{load_csv, load_csv_with_header, read_csv, read_csv_with_header};
