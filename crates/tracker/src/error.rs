use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("JIRA_EMAIL and JIRA_API_TOKEN must be set (e.g. in .env)")]
    MissingCredentials,

    #[error("tracker returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("tracker request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("could not write issue dump to {path}: {source}")]
    Dump {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not encode issue dump: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
