//! Core form logic: domain types, state machines, configuration

pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod form;
pub mod log;
pub mod orchestrator;
pub mod synchronizer;

#[cfg(test)]
pub(crate) mod stubs;

// Re-export main types for cleaner imports
pub use conversion::{ConversionOutcome, ConversionProvider, ConversionRequest, Direction};
pub use currency::{CatalogProvider, Currency, REFERENCE_CURRENCY};
pub use error::{ClientError, FormError};
pub use form::{FormController, FormView};
