//! # Talus DNS Resolver
//!
//! Iterative stub-to-recursive resolution: queries start at a randomly
//! chosen root server and follow the delegation chain (authority/NS
//! records) down to whichever server finally answers, with CNAME chains
//! resolved along the way by the codec.
//!
//! One resolution chain is strictly sequential and owns its sockets;
//! independent top-level calls share nothing but the read-only root
//! table and may run concurrently without coordination.

use async_trait::async_trait;
use std::time::Duration;
use talus_proto::{Message, Question};
use thiserror::Error;

pub mod hints;
pub mod iterative;

pub use hints::{ROOT_SERVERS, RootServer};
pub use iterative::IterativeResolver;

/// Resolver error.
///
/// Every failure mode is a distinct variant so callers can tell a hostile
/// response from a dead network from an unencodable input. An empty
/// answer section is not an error: a response with neither answers nor
/// delegation is returned as-is.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// No response arrived within the configured deadline.
    #[error("timed out waiting for a response")]
    Timeout,

    /// The delegation chain exceeded the configured hop bound.
    ///
    /// Without this bound a misbehaving server delegating in a circle
    /// would keep the chain alive forever.
    #[error("delegation chain exceeded {max_hops} hops")]
    DelegationLoopExceeded {
        /// The configured bound.
        max_hops: u8,
    },

    /// Every candidate server at some delegation level failed.
    #[error("no usable name server remained at this delegation level")]
    ServersExhausted,

    /// A response could not be decoded. Hard failure of the hop it
    /// arrived on; never retried against the same server.
    #[error("malformed response: {0}")]
    Malformed(talus_proto::Error),

    /// The queried domain name cannot be encoded. Surfaced immediately,
    /// no retry.
    #[error("domain name cannot be encoded: {0}")]
    Encoding(talus_proto::Error),

    /// UDP send/receive failure.
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),
}

/// Result type for resolver operations.
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Maximum delegation hops per resolution chain.
    pub max_hops: u8,

    /// Deadline for one query round trip.
    pub query_timeout: Duration,

    /// Deadline for the whole resolution chain, checked before every new
    /// query.
    pub total_timeout: Duration,

    /// Extra attempts against the same server before falling back to
    /// another candidate at the same delegation level.
    pub server_retries: u32,

    /// Port queried on name servers. 53 in production; configurable so
    /// tests and local forwarders can be targeted.
    pub server_port: u16,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_hops: 16,
            query_timeout: Duration::from_secs(3),
            total_timeout: Duration::from_secs(15),
            server_retries: 2,
            server_port: talus_proto::DNS_PORT,
        }
    }
}

/// Resolver trait, the seam between the engine and its callers.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolves a DNS question to a decoded response message.
    async fn resolve(&self, question: &Question) -> Result<Message>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ResolverConfig::default();

        assert_eq!(config.max_hops, 16);
        assert_eq!(config.query_timeout, Duration::from_secs(3));
        assert_eq!(config.total_timeout, Duration::from_secs(15));
        assert_eq!(config.server_retries, 2);
        assert_eq!(config.server_port, 53);
    }

    #[test]
    fn test_error_display() {
        let err = ResolverError::DelegationLoopExceeded { max_hops: 16 };
        assert_eq!(err.to_string(), "delegation chain exceeded 16 hops");

        let err = ResolverError::Encoding(talus_proto::Error::LabelTooLong { length: 64 });
        assert!(err.to_string().contains("cannot be encoded"));
    }
}
