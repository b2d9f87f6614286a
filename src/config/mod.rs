//! Configuration module for link ingestion
//!
//! This module provides the `IngestConfig` struct, its type-safe builder and
//! the environment/file loaders, with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod sources;
pub mod types;

// Re-exports for public API
pub use builder::{IngestConfigBuilder, WithApiKey};
pub use types::{ExtractorConfig, IngestConfig, ProcessorConfig, ScraperConfig, ValidatorConfig};
