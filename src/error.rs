//! Error types for morphcloud.
//!
//! Everything that can fail does so before the first frame: loading and
//! validating configuration, and building the target buffers. The per-frame
//! path never returns errors.

use std::fmt;

/// Errors that can occur while loading or validating a [`SimConfig`](crate::SimConfig).
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read or write the config file.
    Io(std::io::Error),
    /// The file was not valid config JSON.
    Parse(serde_json::Error),
    /// A field holds a value the simulation cannot run with.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Failed to access config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors that can occur when building a [`SimulationState`](crate::SimulationState).
#[derive(Debug)]
pub enum InitError {
    /// Particle count was zero.
    EmptyParticleCount,
    /// A target buffer does not match the particle count.
    BufferLength {
        shape: &'static str,
        expected: usize,
        actual: usize,
    },
    /// A target buffer contains NaN or infinity.
    NonFiniteTarget { shape: &'static str, index: usize },
    /// Configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::EmptyParticleCount => {
                write!(f, "Particle count must be greater than zero")
            }
            InitError::BufferLength {
                shape,
                expected,
                actual,
            } => write!(
                f,
                "{} buffer holds {} particles, expected {}",
                shape, actual, expected
            ),
            InitError::NonFiniteTarget { shape, index } => {
                write!(f, "{} target of particle {} is not finite", shape, index)
            }
            InitError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for InitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for InitError {
    fn from(e: ConfigError) -> Self {
        InitError::Config(e)
    }
}
