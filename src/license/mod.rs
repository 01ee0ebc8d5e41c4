//! License and exception id tables.
//!
//! - [`registry`]: canonical SPDX ids with metadata, case-insensitive.
//! - [`mapping`]: aliases and deprecated ids mapped to current expressions.
//! - [`declared`]: turns manifest license strings into expressions.
//! - [`spdx`]: the built-in table data.

pub mod declared;
pub mod mapping;
pub mod registry;
pub(crate) mod spdx;

pub use declared::{DeclaredLicenseProcessor, ProcessedDeclaredLicense};
pub use registry::{Registry, RegistryEntry, RegistryError};
