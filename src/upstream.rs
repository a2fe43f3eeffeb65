// Boundary to the upstream game API client.
//
// The client owns retries and availability detection; this crate only sees
// the outcome as data. Absence of a snapshot is a value, never a panic.

use thiserror::Error;

use crate::model::{PlayerProfile, WarSnapshot};

/// Why the upstream could not supply a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Unavailable {
    /// The game API is in a maintenance window.
    #[error("game API is under maintenance")]
    Maintenance,
    /// The requested tag does not exist.
    #[error("no such tag: {0}")]
    NotFound(String),
    /// The clan's war log is private.
    #[error("war log is private")]
    PrivateWarLog,
    /// Transient gateway failure after the client exhausted its retries.
    #[error("upstream gateway error: {0}")]
    Gateway(String),
}

/// Read-only snapshot supplier. Implemented by the API client; tests use
/// in-memory stubs. Every method is one upstream request.
pub trait SnapshotSource {
    /// Full profile (town hall, unit list) for one player tag.
    fn player_profile(
        &self,
        player_tag: &str,
    ) -> impl std::future::Future<Output = Result<PlayerProfile, Unavailable>> + Send;

    /// One league war by its round war tag.
    fn league_war(
        &self,
        war_tag: &str,
    ) -> impl std::future::Future<Output = Result<WarSnapshot, Unavailable>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_display() {
        assert_eq!(
            Unavailable::Maintenance.to_string(),
            "game API is under maintenance"
        );
        assert_eq!(
            Unavailable::NotFound("#ABC".into()).to_string(),
            "no such tag: #ABC"
        );
        assert_eq!(
            Unavailable::Gateway("503".into()).to_string(),
            "upstream gateway error: 503"
        );
    }
}
