use thiserror::Error;

/// Failures talking to the indexing service.
///
/// Non-2xx answers keep the HTTP status and the response body verbatim so
/// callers can branch on kind without re-parsing display strings.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The indexing submission was rejected.
    #[error("indexing request rejected with HTTP {status}: {body}")]
    IndexRequest { status: u16, body: String },

    /// The status resource answered with something other than 200.
    #[error("status fetch failed with HTTP {status}: {body}")]
    StatusFetch { status: u16, body: String },

    /// The query endpoint rejected the request.
    #[error("query rejected with HTTP {status}: {body}")]
    Query { status: u16, body: String },

    /// The search endpoint rejected the request.
    #[error("search rejected with HTTP {status}: {body}")]
    Search { status: u16, body: String },

    /// A 200 status body that did not parse as the expected JSON.
    #[error("could not decode the status response body")]
    Decode(#[from] serde_json::Error),

    /// The request exceeded the configured timeout.
    #[error("request to the indexing service timed out")]
    Timeout(#[source] reqwest::Error),

    /// Transport-level failure (connection, TLS, body read).
    #[error("request to the indexing service failed")]
    Http(#[source] reqwest::Error),

    /// The configured base URL cannot address endpoints.
    #[error("invalid API base URL {url:?}")]
    BaseUrl {
        url: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// The service does not document this operation yet.
    #[error("{operation} is not implemented against the indexing service yet")]
    NotImplemented { operation: &'static str },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(err)
        } else {
            ApiError::Http(err)
        }
    }
}
