use thiserror::Error;

/// Main error type for boolq operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BoolqError {
    #[error("Boost conflict on field '{field}': {left} vs {right}")]
    BoostConflict { field: String, left: f64, right: f64 },

    #[error("Value conflict on field '{field}': {left} and {right} cannot both hold")]
    ValueConflict {
        field: String,
        left: String,
        right: String,
    },

    #[error("Empty intersection: ranges on field '{field}' do not overlap")]
    EmptyIntersection { field: String },

    #[error("Type mismatch: cannot merge {left} with {right}")]
    TypeMismatch {
        left: &'static str,
        right: &'static str,
    },

    #[error("Missing operand for {0}")]
    NilOperand(&'static str),

    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Result type alias for boolq operations
pub type Result<T> = std::result::Result<T, BoolqError>;

impl BoolqError {
    /// Check if this error is a deterministic conflict between two merge operands
    ///
    /// Conflicts are a property of the inputs; repeating the merge yields the
    /// same error.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            BoolqError::BoostConflict { .. }
                | BoolqError::ValueConflict { .. }
                | BoolqError::EmptyIntersection { .. }
                | BoolqError::TypeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BoolqError::EmptyIntersection {
            field: "price".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Empty intersection: ranges on field 'price' do not overlap"
        );

        let err = BoolqError::BoostConflict {
            field: "title".to_string(),
            left: 1.0,
            right: 2.5,
        };
        assert_eq!(err.to_string(), "Boost conflict on field 'title': 1 vs 2.5");
    }

    #[test]
    fn test_conflict_errors() {
        assert!(BoolqError::EmptyIntersection {
            field: "x".to_string()
        }
        .is_conflict());
        assert!(BoolqError::TypeMismatch {
            left: "ids",
            right: "term"
        }
        .is_conflict());
        assert!(!BoolqError::NilOperand("union").is_conflict());
        assert!(!BoolqError::UnknownField("x".to_string()).is_conflict());
    }
}
