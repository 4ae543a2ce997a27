//! Admission validation and values merging for App Platform custom resources.
//!
//! ## Crate Features
//!
//! - `default` enables `logging`.
//! - `logging` enables [`logging::initialize_logging`] for binaries.
//! - `clap` derives `clap::ValueEnum` for the enums used as command line options.

pub mod admission;
pub mod builder;
pub mod constants;
pub mod crd;
pub mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod store;
pub mod validation;
pub mod values;
pub mod yaml;

// External re-exports
pub use k8s_openapi;
pub use kube;
