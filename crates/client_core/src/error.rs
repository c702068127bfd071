use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url '{raw}': {source}")]
    InvalidServerUrl {
        raw: String,
        source: url::ParseError,
    },
    #[error("server url must start with http:// or https://, got '{0}'")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
