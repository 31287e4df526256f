use thiserror::Error;

use crate::cluster::ClusterId;

/// Errors returned by the clustering engine and the query pipeline.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A required configuration value is missing, blank, or out of range.
    ///
    /// Raised while building a [`ClusteringConfig`](crate::ClusteringConfig);
    /// the component cannot be constructed without fixing it.
    #[error("{message}")]
    Configuration {
        /// Configuration key.
        parameter: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// Invalid request parameter value.
    ///
    /// The display text is part of the response contract and is exactly the message.
    #[error("{message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// A cluster handle that is not live in the store.
    #[error("unknown cluster handle {0}")]
    UnknownCluster(ClusterId),

    /// A cluster asked to merge with itself.
    #[error("cannot merge cluster {0} with itself")]
    SelfMerge(ClusterId),

    /// The cost cache no longer mirrors the cluster store.
    ///
    /// Indicates a store mutation that was not replayed on the cache.
    #[error("cost cache out of sync with cluster store")]
    CacheOutOfSync,

    /// A point with a NaN or infinite coordinate.
    #[error("non-finite coordinate for point {key:?}")]
    NonFiniteCoordinate {
        /// Key of the rejected point.
        key: String,
    },

    /// Output could not be converted into a response value.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }

    pub(crate) fn configuration(parameter: &'static str, message: impl Into<String>) -> Self {
        Error::Configuration {
            parameter,
            message: message.into(),
        }
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
