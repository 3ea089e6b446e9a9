//! Storage seams for the intake service.
//!
//! Sessions, idempotency keys, and generated specifications live behind
//! capability traits injected into `SessionService`, so the service never
//! touches process-wide mutable state. Production embeddings back these with
//! a transactional datastore; the in-memory implementations here serve tests
//! and single-process embedding.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::errors::EngineError;
use crate::models::lsp::LayoutSpecificationPackage;
use crate::models::session::Session;

// ────────────────────────────────────────────────────────────────────────────
// Traits
// ────────────────────────────────────────────────────────────────────────────

/// Session persistence, keyed by session id.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Result<Option<Session>, EngineError>;
    async fn put(&self, session: Session) -> Result<(), EngineError>;
    /// Returns true when a session was removed.
    async fn delete(&self, session_id: &str) -> Result<bool, EngineError>;
}

/// A recorded idempotency key. Keys expire after the configured retention
/// window; expired records are ignored on lookup and reaped lazily.
#[derive(Debug, Clone)]
pub struct IdempotencyRecord {
    pub key: String,
    pub session_id: String,
    pub expires_at: DateTime<Utc>,
}

impl IdempotencyRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Idempotency-key persistence.
#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    /// Returns the live (unexpired) record for a key, if any.
    async fn get(&self, key: &str) -> Result<Option<IdempotencyRecord>, EngineError>;
    async fn put(&self, record: IdempotencyRecord) -> Result<(), EngineError>;
}

/// Generated LSP persistence, keyed by proposal id.
#[async_trait]
pub trait SpecificationStore: Send + Sync {
    async fn get(
        &self,
        proposal_id: &str,
    ) -> Result<Option<LayoutSpecificationPackage>, EngineError>;
    async fn put(&self, spec: LayoutSpecificationPackage) -> Result<(), EngineError>;
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory implementations
// ────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<Session>, EngineError> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    async fn put(&self, session: Session) -> Result<(), EngineError> {
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<bool, EngineError> {
        Ok(self.sessions.write().await.remove(session_id).is_some())
    }
}

#[derive(Default)]
pub struct InMemoryIdempotencyStore {
    records: RwLock<HashMap<String, IdempotencyRecord>>,
}

impl InMemoryIdempotencyStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl IdempotencyStore for InMemoryIdempotencyStore {
    async fn get(&self, key: &str) -> Result<Option<IdempotencyRecord>, EngineError> {
        let now = Utc::now();
        let mut records = self.records.write().await;
        match records.get(key) {
            Some(record) if record.is_expired(now) => {
                records.remove(key);
                Ok(None)
            }
            Some(record) => Ok(Some(record.clone())),
            None => Ok(None),
        }
    }

    async fn put(&self, record: IdempotencyRecord) -> Result<(), EngineError> {
        self.records.write().await.insert(record.key.clone(), record);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySpecificationStore {
    specs: RwLock<HashMap<String, LayoutSpecificationPackage>>,
}

impl InMemorySpecificationStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl SpecificationStore for InMemorySpecificationStore {
    async fn get(
        &self,
        proposal_id: &str,
    ) -> Result<Option<LayoutSpecificationPackage>, EngineError> {
        Ok(self.specs.read().await.get(proposal_id).cloned())
    }

    async fn put(&self, spec: LayoutSpecificationPackage) -> Result<(), EngineError> {
        self.specs.write().await.insert(spec.proposal_id.clone(), spec);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
