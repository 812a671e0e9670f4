//! Core types and pipeline turning a Kraków address into a structured waste collection schedule.

/// Street and house-number catalogs with fuzzy lookup.
pub mod catalog;
/// Pipeline thresholds loaded from the environment.
pub mod config;
/// Correction table for misread day digits.
pub mod corrections;
/// Confidence filtering and reading order of recognized text.
pub mod decoder;
/// Lookup failures of the pipeline.
pub mod error;
/// Date and waste type extraction from ordered text.
pub mod extractor;
/// Domain models and identifiers.
pub mod model;
/// Bundle of ports serving one city.
pub mod plugin;
/// Traits describing the external capabilities.
pub mod ports;
/// Recognized text regions and their geometry.
pub mod region;
/// Address resolution against the catalogs.
pub mod resolver;
/// Structured schedule model.
pub mod schedule;
/// High-level service facade used by clients.
pub mod service;
/// Month, weekday, and waste vocabularies.
pub mod vocabulary;

pub use catalog::*;
pub use config::*;
pub use corrections::*;
pub use decoder::*;
pub use error::*;
pub use extractor::*;
pub use model::*;
pub use plugin::*;
pub use ports::*;
pub use region::*;
pub use resolver::*;
pub use schedule::*;
pub use service::*;
pub use vocabulary::*;
