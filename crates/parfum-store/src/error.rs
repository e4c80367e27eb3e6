//! Store error types.

use parfum_cache::CacheError;
use parfum_commerce::CommerceError;
use parfum_data::FetchError;
use thiserror::Error;

/// Errors returned by backends and services.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Talking to the backend failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    /// A domain rule rejected the operation.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// No valid session.
    #[error("Not signed in")]
    Unauthorized,

    /// Signed in, but not an administrator.
    #[error("Account {0} is not an administrator")]
    Forbidden(String),

    /// The backend answered with something we cannot use.
    #[error("Unexpected backend response: {0}")]
    Malformed(String),

    #[error("Fixture error: {0}")]
    Fixture(String),
}

/// Coarse error category, for deciding how to present a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend could not be reached or returned an error.
    RemoteFetch,
    /// Input was rejected; show the message next to the form.
    Validation,
    /// The requested row does not exist.
    NotFound,
    /// Sign-in required or not allowed.
    Unauthorized,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::RemoteFetch => "remote_fetch",
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Unauthorized => "unauthorized",
        }
    }
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Fetch(e) if e.is_auth_failure() => ErrorKind::Unauthorized,
            StoreError::Fetch(e) if e.is_not_found() => ErrorKind::NotFound,
            StoreError::Fetch(_) | StoreError::Cache(_) => ErrorKind::RemoteFetch,
            StoreError::Malformed(_) | StoreError::Fixture(_) => ErrorKind::RemoteFetch,
            StoreError::Commerce(e) => match e {
                CommerceError::ProductNotFound(_)
                | CommerceError::SkuNotFound(_)
                | CommerceError::DiscoverySetNotFound(_)
                | CommerceError::OrderNotFound(_)
                | CommerceError::EntryNotInCart(_) => ErrorKind::NotFound,
                CommerceError::InvalidSnapshot(_) => ErrorKind::RemoteFetch,
                _ => ErrorKind::Validation,
            },
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::Unauthorized | StoreError::Forbidden(_) => ErrorKind::Unauthorized,
        }
    }

    /// Inline field messages, for validation failures.
    pub fn field_errors(&self) -> &[parfum_commerce::error::FieldError] {
        match self {
            StoreError::Commerce(e) => e.field_errors(),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let http = |status| {
            StoreError::Fetch(FetchError::HttpError {
                status,
                message: String::new(),
            })
        };
        assert_eq!(http(500).kind(), ErrorKind::RemoteFetch);
        assert_eq!(http(401).kind(), ErrorKind::Unauthorized);
        assert_eq!(http(404).kind(), ErrorKind::NotFound);
        assert_eq!(StoreError::Fetch(FetchError::Timeout).kind(), ErrorKind::RemoteFetch);
        assert_eq!(
            StoreError::Commerce(CommerceError::EmptyCart).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            StoreError::Commerce(CommerceError::OrderNotFound("o".into())).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(StoreError::Forbidden("a@b.ro".into()).kind(), ErrorKind::Unauthorized);
        assert_eq!(StoreError::not_found("Order", "o1").to_string(), "Order not found: o1");
    }

    #[test]
    fn test_field_errors_pass_through() {
        let err = StoreError::from(CommerceError::invalid("customer_email", "Email invalid"));
        assert_eq!(err.field_errors()[0].field, "customer_email");
        assert!(StoreError::Unauthorized.field_errors().is_empty());
    }
}
