//! Identifier validation.
//!
//! Every identifier that ends up in a request path or body is parsed into a
//! [`ResourceId`] first, so malformed input never costs a network round-trip.

use serde::Serialize;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("{field} is required")]
    Empty { field: &'static str },

    #[error("{field} '{value}' is not a valid identifier")]
    Malformed { field: &'static str, value: String },
}

/// A well-formed UUID identifying a marketplace resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Parses `value`, naming `field` in the error so the message is specific.
    pub fn parse(field: &'static str, value: &str) -> Result<Self, IdError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(IdError::Empty { field });
        }
        Uuid::parse_str(trimmed)
            .map(ResourceId)
            .map_err(|_| IdError::Malformed {
                field,
                value: value.to_string(),
            })
    }

    #[cfg(test)]
    pub fn new_v4() -> Self {
        ResourceId(Uuid::new_v4())
    }
}

impl From<Uuid> for ResourceId {
    fn from(uuid: Uuid) -> Self {
        ResourceId(uuid)
    }
}

impl FromStr for ResourceId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceId::parse("id", s)
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_hyphenated_uuid() {
        let id = ResourceId::parse("product_id", "6f1c2a3e-8a43-4b1d-9d0e-2c5f7a9b1e42").unwrap();
        assert_eq!(id.to_string(), "6f1c2a3e-8a43-4b1d-9d0e-2c5f7a9b1e42");
    }

    #[test]
    /// Surrounding whitespace is tolerated.
    fn valid_with_whitespace() {
        let padded = "  6f1c2a3e-8a43-4b1d-9d0e-2c5f7a9b1e42\n";
        assert!(ResourceId::parse("investor_id", padded).is_ok());
    }

    #[test]
    /// Uppercase hex renders back in canonical lowercase.
    fn valid_uppercase() {
        let id = ResourceId::parse("id", "6F1C2A3E-8A43-4B1D-9D0E-2C5F7A9B1E42").unwrap();
        assert_eq!(id.to_string(), "6f1c2a3e-8a43-4b1d-9d0e-2c5f7a9b1e42");
    }

    #[test]
    fn empty_is_rejected_with_field_name() {
        let err = ResourceId::parse("commitment_id", "   ").unwrap_err();
        assert_eq!(err, IdError::Empty { field: "commitment_id" });
        assert_eq!(err.to_string(), "commitment_id is required");
    }

    #[test]
    /// Path-like input must never reach a URL.
    fn path_traversal_is_rejected() {
        let err = ResourceId::parse("product_id", "../admin").unwrap_err();
        assert!(matches!(err, IdError::Malformed { field: "product_id", .. }));
    }

    #[test]
    fn numeric_ids_are_rejected() {
        assert!("12345".parse::<ResourceId>().is_err());
    }
}
