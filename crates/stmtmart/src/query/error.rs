use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    StoreRead(String),
    StoreWrite(String),
    UnknownField(String),
    Resolver(String),
}

impl QueryError {
    pub fn store_read(error: impl Into<anyhow::Error>) -> Self {
        Self::StoreRead(format!("{:#}", error.into()))
    }

    pub fn store_write(error: impl Into<anyhow::Error>) -> Self {
        Self::StoreWrite(format!("{:#}", error.into()))
    }

    pub fn resolver(error: impl Into<anyhow::Error>) -> Self {
        Self::Resolver(format!("{:#}", error.into()))
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::StoreRead(_) => "store_read_failed",
            Self::StoreWrite(_) => "store_write_failed",
            Self::UnknownField(_) => "unknown_field",
            Self::Resolver(_) => "column_resolve_failed",
        }
    }

    // Unknown-field failures come from caller input; everything else is a
    // backend/dependency failure.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::UnknownField(_))
    }
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StoreRead(detail) => write!(f, "store read failed: {detail}"),
            Self::StoreWrite(detail) => write!(f, "store write failed: {detail}"),
            Self::UnknownField(field) => write!(f, "unknown requested field: {field}"),
            Self::Resolver(detail) => write!(f, "column resolution failed: {detail}"),
        }
    }
}

impl std::error::Error for QueryError {}

#[cfg(test)]
mod tests {
    use super::QueryError;

    #[test]
    fn codes_are_stable_per_variant() {
        assert_eq!(
            QueryError::StoreRead("x".to_string()).code(),
            "store_read_failed"
        );
        assert_eq!(
            QueryError::StoreWrite("x".to_string()).code(),
            "store_write_failed"
        );
        assert_eq!(
            QueryError::UnknownField("x".to_string()).code(),
            "unknown_field"
        );
        assert_eq!(
            QueryError::Resolver("x".to_string()).code(),
            "column_resolve_failed"
        );
    }

    #[test]
    fn only_unknown_field_classifies_as_input_error() {
        assert!(QueryError::UnknownField("latency".to_string()).is_input_error());
        assert!(!QueryError::StoreRead("boom".to_string()).is_input_error());
        assert!(!QueryError::StoreWrite("boom".to_string()).is_input_error());
        assert!(!QueryError::Resolver("boom".to_string()).is_input_error());
    }

    #[test]
    fn display_names_the_offending_field() {
        let error = QueryError::UnknownField("sum_latencyy".to_string());
        assert_eq!(
            error.to_string(),
            "unknown requested field: sum_latencyy"
        );
    }
}
