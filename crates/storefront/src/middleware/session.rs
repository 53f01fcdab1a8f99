//! Session middleware configuration.
//!
//! Sessions are held in a bounded moka store that evicts expired records on
//! its own. The cart a session points to lives in the cart registry, and both
//! share the same capacity and idle period.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::carts::MAX_CARTS;
use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "zar_session";

/// Maximum number of live sessions; one per cart.
pub const MAX_SESSIONS: u64 = MAX_CARTS;

/// In-memory session store bounded to [`MAX_SESSIONS`] records.
#[must_use]
pub fn session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer.
///
/// Sessions expire after the same idle period as carts.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    let idle_secs = i64::try_from(config.cart_idle_timeout.as_secs()).unwrap_or(i64::MAX);

    SessionManagerLayer::new(session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(idle_secs),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
mod tests {
    use tower_sessions::SessionStore;
    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};

    use super::*;

    fn record(expires_in: Duration) -> Record {
        Record {
            id: Id::default(),
            data: std::collections::HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_store_keeps_live_sessions() {
        let store = session_store();
        let mut live = record(Duration::hours(1));
        store.create(&mut live).await.expect("create");

        let loaded = store.load(&live.id).await.expect("load");
        assert_eq!(loaded.map(|r| r.id), Some(live.id));
    }

    #[tokio::test]
    async fn test_store_drops_expired_sessions() {
        let store = session_store();
        let mut expired = record(Duration::seconds(-1));
        store.create(&mut expired).await.expect("create");

        assert!(store.load(&expired.id).await.expect("load").is_none());
    }

    #[test]
    fn test_session_capacity_matches_carts() {
        assert_eq!(MAX_SESSIONS, MAX_CARTS);
    }
}
