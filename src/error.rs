use http::header::{HeaderName, InvalidHeaderValue};

/// Failures of the header-backed cookie jars.
///
/// The middleware itself never surfaces these to the caller; they are logged and the request or
/// response passes through untouched.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A rebuilt `Cookie` or `Set-Cookie` value is not a legal header value.
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] InvalidHeaderValue),

    /// A cookie header could not be read as text.
    #[error("{0} header is not valid utf-8")]
    NonUtf8Header(HeaderName),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
