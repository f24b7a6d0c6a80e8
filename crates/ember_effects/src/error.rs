//! # Effect Error Types
//!
//! Errors from loading and building effect files.

use ember_core::EmberError;
use thiserror::Error;

/// Errors that can occur while loading or building an effect.
#[derive(Error, Debug)]
pub enum EffectError {
    /// The effect file is not valid TOML or does not match the schema.
    #[error("failed to parse effect: {0}")]
    Parse(#[from] toml::de::Error),

    /// The effect could not be written as TOML.
    #[error("failed to serialize effect: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The effect file could not be read.
    #[error("failed to read effect file: {0}")]
    Io(#[from] std::io::Error),

    /// A parameter was rejected by the engine.
    #[error(transparent)]
    Core(#[from] EmberError),

    /// The effect is well-formed but inconsistent.
    #[error("invalid effect configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for effect loading.
pub type EffectResult<T> = Result<T, EffectError>;
