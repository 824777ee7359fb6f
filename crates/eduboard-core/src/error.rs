use thiserror::Error;

#[derive(Debug, Error)]
pub enum EduboardError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: u32 },

    #[error("Seed error: {0}")]
    Seed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl EduboardError {
    pub fn not_found(entity: &'static str, id: u32) -> Self {
        Self::NotFound { entity, id }
    }

    /// Returns `true` for the error a store raises on a missing Id.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, EduboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = EduboardError::not_found("Assignment", 999);
        assert_eq!(err.to_string(), "Assignment not found: 999");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_other_kinds_are_not_not_found() {
        assert!(!EduboardError::Config("bad".into()).is_not_found());
        assert!(!EduboardError::InvalidInput("title cannot be empty".into()).is_not_found());
    }
}
