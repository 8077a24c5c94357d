// src/domain/krate/value_objects.rs
use crate::domain::errors::{DomainError, DomainResult};
use std::fmt;

const MAX_NAME_LENGTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CrateName(String);

impl CrateName {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(DomainError::Validation("crate name cannot be empty".into()));
        }
        if value.len() > MAX_NAME_LENGTH {
            return Err(DomainError::Validation(format!(
                "crate name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::Validation(format!(
                "invalid crate name `{value}`"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CrateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<CrateName> for String {
    fn from(value: CrateName) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::CrateName;

    #[test]
    fn accepts_registry_style_names() {
        assert!(CrateName::new("serde_json").is_ok());
        assert!(CrateName::new("tokio-util").is_ok());
    }

    #[test]
    fn rejects_empty_long_and_odd_names() {
        assert!(CrateName::new("").is_err());
        assert!(CrateName::new("a".repeat(65)).is_err());
        assert!(CrateName::new("two words").is_err());
        assert!(CrateName::new("../etc").is_err());
    }
}
