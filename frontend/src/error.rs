//! Defines the error returned by every API call.

/// The ways a call to the REST API can fail.
///
/// Every API client function returns `Result<T, ApiError>` so the caller
/// decides whether to send the user back to the login screen, show a
/// message, or give up.
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum ApiError {
    /// The access token was rejected. Stored tokens have already been
    /// cleared by the time this is returned.
    #[error("your session has expired, please log in again")]
    AuthExpired,

    /// Login was refused for the given username and password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The request never produced a response: offline, DNS, CORS or timeout.
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status other than 401.
    ///
    /// `body` holds the raw response text, which for validation failures is
    /// the server's field error object.
    #[error("server responded with status {status}")]
    Server { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("could not read server response: {0}")]
    Decode(String),

    /// The request payload could not be serialized.
    #[error("could not encode request: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthExpired)
    }
}
