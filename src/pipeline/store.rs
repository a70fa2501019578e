//! Session store
//!
//! In-process session map with TTL expiry measured from last
//! activity. Expired sessions are pruned lazily: on create and when
//! touched by a lookup.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::domain::Session;
use crate::error::{PipelineError, PipelineResult};

pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            ttl: Duration::seconds(ttl_seconds as i64),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn create(&self, now: DateTime<Utc>) -> Session {
        let session = Session::new(Uuid::new_v4().to_string(), now);
        let mut sessions = self.sessions.write();
        sessions.retain(|_, s| !Self::expired(s, self.ttl, now));
        sessions.insert(session.id.clone(), session.clone());
        debug!(session_id = %session.id, "Session created");
        session
    }

    pub fn get(&self, id: &str, now: DateTime<Utc>) -> PipelineResult<Session> {
        let mut sessions = self.sessions.write();
        match sessions.get(id) {
            Some(session) if !Self::expired(session, self.ttl, now) => Ok(session.clone()),
            Some(_) => {
                sessions.remove(id);
                debug!(session_id = id, "Session expired");
                Err(PipelineError::SessionNotFound(id.to_string()))
            }
            None => Err(PipelineError::SessionNotFound(id.to_string())),
        }
    }

    /// Mutate a live session in place. The closure runs under the
    /// write lock; the updated session is stamped with `now` and
    /// returned.
    pub fn update(
        &self,
        id: &str,
        now: DateTime<Utc>,
        apply: impl FnOnce(&mut Session),
    ) -> PipelineResult<Session> {
        let mut sessions = self.sessions.write();
        match sessions.get_mut(id) {
            Some(session) if !Self::expired(session, self.ttl, now) => {
                apply(session);
                session.touch(now);
                Ok(session.clone())
            }
            Some(_) => {
                sessions.remove(id);
                Err(PipelineError::SessionNotFound(id.to_string()))
            }
            None => Err(PipelineError::SessionNotFound(id.to_string())),
        }
    }

    fn expired(session: &Session, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - session.last_activity > ttl
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_780_000_000, 0).unwrap()
    }

    #[test]
    fn create_then_get_round_trips() {
        let store = SessionStore::new(3600);
        let session = store.create(now());
        let fetched = store.get(&session.id, now()).unwrap();
        assert_eq!(fetched.id, session.id);
        assert_eq!(fetched.stage, crate::domain::Stage::InputProcessing);
    }

    #[test]
    fn unknown_id_is_not_found() {
        let store = SessionStore::new(3600);
        let err = store.get("missing", now()).unwrap_err();
        assert_eq!(err.code(), "SESSION_NOT_FOUND");
    }

    #[test]
    fn expired_session_is_dropped_on_read() {
        let store = SessionStore::new(3600);
        let session = store.create(now());
        let later = now() + Duration::seconds(3601);
        assert_eq!(store.get(&session.id, later).unwrap_err().code(), "SESSION_NOT_FOUND");
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn activity_extends_the_ttl() {
        let store = SessionStore::new(3600);
        let session = store.create(now());
        let halfway = now() + Duration::seconds(1800);
        store.update(&session.id, halfway, |_| {}).unwrap();
        let past_original_deadline = now() + Duration::seconds(3601);
        assert!(store.get(&session.id, past_original_deadline).is_ok());
    }

    #[test]
    fn create_prunes_expired_sessions() {
        let store = SessionStore::new(3600);
        store.create(now());
        store.create(now() + Duration::seconds(7200));
        assert_eq!(store.len(), 1);
    }
}
