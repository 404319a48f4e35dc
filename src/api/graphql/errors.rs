//! CivicError → GraphQL error mapping
//!
//! Every error carries `extensions.code`; database and internal failures are
//! logged here and reach the client only as a generic message.

use async_graphql::{Error, ErrorExtensions};
use tracing::error;

use crate::errors::CivicError;

impl ErrorExtensions for CivicError {
    fn extend(&self) -> Error {
        let message = if self.is_client_safe() {
            self.message().to_string()
        } else {
            error!(code = self.code(), "{}", self.format_simple());
            "internal server error".to_string()
        };
        let code = self.graphql_code();
        Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}

/// `Result<T, CivicError>` → `async_graphql::Result<T>` keeping the error code
pub trait GqlResultExt<T> {
    fn gql(self) -> async_graphql::Result<T>;
}

impl<T> GqlResultExt<T> for Result<T, CivicError> {
    fn gql(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.extend())
    }
}

/// RATE_LIMITED 错误，附带 retryAfterSecs
pub fn rate_limited_error(retry_after_secs: u64) -> Error {
    Error::new(format!(
        "rate limit exceeded, retry in {} seconds",
        retry_after_secs
    ))
    .extend_with(|_, e| {
        e.set("code", "RATE_LIMITED");
        e.set("retryAfterSecs", retry_after_secs);
    })
}
