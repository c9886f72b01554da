use thiserror::Error;

/// Failures that surface from a fetch-extract-resolve pipeline.
///
/// A page without a relay store and references that point nowhere are not
/// errors; they come back as `None` or as shorter result lists.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Connection failure, non-2xx status or a body that could not be read.
    #[error("failed to fetch page: {0}")]
    Network(#[from] reqwest::Error),

    /// The body was not valid UTF-8. Counts as a failed fetch.
    #[error("page body is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// The relay store marker was present but its payload is not a JSON object.
    #[error("relay store payload could not be parsed: {0}")]
    MalformedPayload(#[source] serde_json::Error),
}
