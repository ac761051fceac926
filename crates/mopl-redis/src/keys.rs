//! Key layout of the watching-session store.

use uuid::Uuid;

const PREFIX: &str = "mopl:watching";

/// Builds the keys used by watching sessions.
#[derive(Debug, Clone, Copy)]
pub struct WatchingSessionKeys;

impl WatchingSessionKeys {
    /// JSON body of one session.
    pub fn session(session_id: Uuid) -> String {
        format!("{PREFIX}:session:{session_id}")
    }

    /// Pointer from a watcher to their current session id.
    pub fn watcher(watcher_id: Uuid) -> String {
        format!("{PREFIX}:watcher:{watcher_id}")
    }

    /// Sorted set of session ids watching one content item.
    pub fn content(content_id: Uuid) -> String {
        format!("{PREFIX}:content:{content_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_use_hyphenated_ids() {
        let id = Uuid::from_u128(0x1);
        assert_eq!(
            WatchingSessionKeys::content(id),
            "mopl:watching:content:00000000-0000-0000-0000-000000000001"
        );
        assert!(WatchingSessionKeys::session(id).starts_with("mopl:watching:session:"));
        assert!(WatchingSessionKeys::watcher(id).starts_with("mopl:watching:watcher:"));
    }
}
