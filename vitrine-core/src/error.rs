use thiserror::Error;
use vitrine_model::ModelError;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Catalog API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Empty response from {endpoint}")]
    EmptyResponse { endpoint: String },

    #[error("Invalid facet selection: {0}")]
    Model(#[from] ModelError),

    #[error("Backfill aborted on backend page {page} (round {round})")]
    BackfillAborted {
        page: u32,
        round: u32,
        #[source]
        source: Box<CatalogError>,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Whether repeating the same request later could reasonably succeed.
    ///
    /// The engine never retries on its own; this only informs the caller's
    /// "could not load products, try again" state.
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Http(err) => {
                err.is_timeout() || err.is_connect() || err.is_request()
            }
            CatalogError::Api { status, .. } => *status >= 500 || *status == 429,
            CatalogError::EmptyResponse { .. } => true,
            CatalogError::BackfillAborted { source, .. } => source.is_retryable(),
            CatalogError::Serialization(_)
            | CatalogError::Url(_)
            | CatalogError::Model(_)
            | CatalogError::Internal(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backfill_abort_inherits_retryability_from_cause() {
        let transient = CatalogError::BackfillAborted {
            page: 2,
            round: 3,
            source: Box::new(CatalogError::Api {
                status: 503,
                message: "maintenance".into(),
            }),
        };
        assert!(transient.is_retryable());

        let permanent = CatalogError::BackfillAborted {
            page: 0,
            round: 1,
            source: Box::new(CatalogError::Api {
                status: 400,
                message: "bad filter".into(),
            }),
        };
        assert!(!permanent.is_retryable());
    }

    #[test]
    fn abort_message_names_the_failing_page() {
        let err = CatalogError::BackfillAborted {
            page: 4,
            round: 2,
            source: Box::new(CatalogError::Internal("boom".into())),
        };
        assert_eq!(
            err.to_string(),
            "Backfill aborted on backend page 4 (round 2)"
        );
    }
}
