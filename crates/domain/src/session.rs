//! Login sessions: opaque bearer tokens persisted as documents.

use chrono::{DateTime, Duration, Utc};
use common::UserId;
use doc_store::{Collection, DocStoreError, DocumentStore, DocumentStoreExt, PutOptions, Stored};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// A login session. The opaque token doubles as the document identifier,
/// so token lookup is a plain document get.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns true if the session is expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Typed access to session documents.
#[derive(Clone)]
pub struct SessionStore<D: DocumentStore> {
    store: D,
}

impl<D: DocumentStore> SessionStore<D> {
    /// Creates a new session store over the given document store.
    pub fn new(store: D) -> Self {
        Self { store }
    }

    /// Issues a new session for the user, valid for the given duration.
    #[tracing::instrument(skip(self))]
    pub async fn create_session(&self, user_id: UserId, ttl: Duration) -> Result<Session> {
        let now = Utc::now();
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at: now + ttl,
        };

        self.store
            .put_typed(
                Collection::Sessions,
                &session.token,
                &session,
                PutOptions::expect_new(),
            )
            .await?;

        Ok(session)
    }

    /// Resolves a bearer token to its session, if one exists.
    pub async fn session_by_token(&self, token: &str) -> Result<Option<Stored<Session>>> {
        Ok(self.store.get_typed(Collection::Sessions, token).await?)
    }

    /// Deletes a session. Tokens that are already gone are not an error.
    pub async fn delete_session(&self, token: &str) -> Result<()> {
        match self.store.delete(Collection::Sessions, token).await {
            Ok(()) => Ok(()),
            Err(DocStoreError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
