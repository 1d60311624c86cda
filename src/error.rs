use thiserror::Error;

/// Failures inside the extraction engine. None of these reach the host page;
/// the dispatcher logs them and answers "nothing found".
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid CSS selector \"{selector}\": {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("invalid page URL \"{url}\": {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
