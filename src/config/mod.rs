//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LoaderConfig (validated, immutable)
//!     → ReqwestTransport::from_config / LoaderOptions::from_defaults
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{DefaultsConfig, LoaderConfig, ObservabilityConfig, TransportConfig};
pub use validation::ValidationError;
