use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverpassError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid Overpass endpoint \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },
}
