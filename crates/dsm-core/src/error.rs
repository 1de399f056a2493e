//! Unified error type for the DSM plotting workspace
//!
//! [`DsmError`] covers lookups against the solved-model store, table
//! validation, file access and rendering. Library code returns
//! [`DsmResult`] at the data-model level; file and render boundaries wrap
//! these in `anyhow` with context.
//!
//! # Example
//!
//! ```ignore
//! use dsm_core::{DsmError, DsmResult};
//!
//! fn wind(store: &impl ResultStore) -> DsmResult<Vec<f64>> {
//!     let bus = store.node("bus_elec")?;
//!     Ok(bus.flow("wind", "bus_elec")?.to_vec())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all DSM operations.
#[derive(Error, Debug)]
pub enum DsmError {
    /// A node, flow or declared series requested by name is absent from the results.
    #[error("missing series: {0}")]
    MissingSeries(String),

    /// A result block does not follow the expected column layout
    #[error("invalid result layout: {0}")]
    InvalidLayout(String),

    /// Data validation errors (length mismatches, bad index, bad window size)
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O errors (file access, directory creation)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing/deserialization errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Chart drawing errors
    #[error("Render error: {0}")]
    Render(String),

    /// Generic errors (for wrapping external errors)
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using DsmError.
pub type DsmResult<T> = Result<T, DsmError>;

impl DsmError {
    /// Shorthand for a missing `(from, to)` flow on a node.
    pub fn missing_flow(node: &str, from: &str, to: &str) -> Self {
        DsmError::MissingSeries(format!("(('{from}', '{to}'), 'flow') on node '{node}'"))
    }
}

impl From<anyhow::Error> for DsmError {
    fn from(err: anyhow::Error) -> Self {
        DsmError::Other(err.to_string())
    }
}

impl From<String> for DsmError {
    fn from(s: String) -> Self {
        DsmError::Other(s)
    }
}

impl From<&str> for DsmError {
    fn from(s: &str) -> Self {
        DsmError::Other(s.to_string())
    }
}

impl From<serde_json::Error> for DsmError {
    fn from(err: serde_json::Error) -> Self {
        DsmError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_series_names_identifier() {
        let err = DsmError::missing_flow("bus_elec", "pp_coal_1", "bus_elec");
        let text = err.to_string();
        assert!(text.contains("missing series"));
        assert!(text.contains("pp_coal_1"));
        assert!(text.contains("bus_elec"));
    }

    #[test]
    fn io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: DsmError = io_err.into();
        assert!(matches!(err, DsmError::Io(_)));
    }

    #[test]
    fn question_mark_propagates() {
        fn inner() -> DsmResult<()> {
            Err(DsmError::InvalidLayout("one column".into()))
        }

        fn outer() -> DsmResult<()> {
            inner()?;
            Ok(())
        }

        assert!(matches!(outer(), Err(DsmError::InvalidLayout(_))));
    }
}
