//! Structured errors for unit construction and conversion
//!
//! Each error carries a machine-readable code and a severity so callers can
//! tell a configuration mistake they may recover from apart from a defect in
//! their unit definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const NOT_STANDARD: &str = "NOT_STANDARD";
    pub const SYMBOL_CONFLICT: &str = "SYMBOL_CONFLICT";
    pub const INCOMPATIBLE: &str = "INCOMPATIBLE";
    pub const DIMENSION_MISMATCH: &str = "DIMENSION_MISMATCH";
}

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Operation failed; the caller may retry with different input
    Error,
    /// The unit definitions themselves are defective
    Fatal,
}

/// Error type for unit operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnitError {
    /// An alternate unit was requested from a unit that is not standard
    #[error("{unit} is not a standard unit")]
    NotStandard { unit: String },

    /// The symbol is already bound to a different unit
    #[error("symbol {symbol} is associated to a different unit ({existing})")]
    SymbolConflict { symbol: String, existing: String },

    /// The two units do not share a standard unit
    #[error("cannot convert {from} to {to}: standard units differ")]
    Incompatible { from: String, to: String },

    /// A unit was tagged with a quantity kind of another dimension
    #[error("unit {unit} has dimension {actual}, expected {expected}")]
    DimensionMismatch {
        unit: String,
        expected: String,
        actual: String,
    },
}

impl UnitError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            UnitError::NotStandard { .. } => codes::NOT_STANDARD,
            UnitError::SymbolConflict { .. } => codes::SYMBOL_CONFLICT,
            UnitError::Incompatible { .. } => codes::INCOMPATIBLE,
            UnitError::DimensionMismatch { .. } => codes::DIMENSION_MISMATCH,
        }
    }

    /// Severity of this error
    pub fn severity(&self) -> Severity {
        match self {
            UnitError::NotStandard { .. } => Severity::Fatal,
            _ => Severity::Error,
        }
    }

    /// Check if the caller can recover (e.g. by choosing another symbol)
    pub fn is_recoverable(&self) -> bool {
        self.severity() != Severity::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let err = UnitError::SymbolConflict {
            symbol: "Hz".into(),
            existing: "Hz".into(),
        };
        assert_eq!(err.code(), codes::SYMBOL_CONFLICT);
        assert_eq!(err.severity(), Severity::Error);
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_not_standard_is_fatal() {
        let err = UnitError::NotStandard { unit: "km".into() };
        assert_eq!(err.severity(), Severity::Fatal);
        assert!(!err.is_recoverable());
        assert_eq!(err.to_string(), "km is not a standard unit");
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Fatal).unwrap();
        assert_eq!(json, "\"fatal\"");
        let back: Severity = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(back, Severity::Error);
        assert!(serde_json::from_str::<Severity>("\"warning\"").is_err());
    }

    #[test]
    fn test_every_error_is_error_or_fatal() {
        let errors = [
            UnitError::NotStandard { unit: "km".into() },
            UnitError::SymbolConflict { symbol: "Hz".into(), existing: "m".into() },
            UnitError::Incompatible { from: "Gy".into(), to: "Sv".into() },
            UnitError::DimensionMismatch {
                unit: "m".into(),
                expected: "T".into(),
                actual: "L".into(),
            },
        ];
        let fatal: Vec<bool> = errors.iter().map(|e| e.severity() == Severity::Fatal).collect();
        assert_eq!(fatal, vec![true, false, false, false]);
    }
}
