//! User accounts: the `User` document and typed access to it.

use chrono::{DateTime, Utc};
use common::UserId;
use doc_store::{Collection, DocumentStore, DocumentStoreExt, PutOptions, Stored};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};

/// A registered user.
///
/// The password hash is part of the stored document; API response types
/// pick their own fields and never include it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Payload for registering a user. The password arrives already hashed;
/// hashing lives at the HTTP boundary.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Typed access to user documents.
#[derive(Clone)]
pub struct UserStore<D: DocumentStore> {
    store: D,
}

impl<D: DocumentStore> UserStore<D> {
    /// Creates a new user store over the given document store.
    pub fn new(store: D) -> Self {
        Self { store }
    }

    /// Creates a user, rejecting duplicate email addresses.
    #[tracing::instrument(skip(self, new), fields(email = %new.email))]
    pub async fn create_user(&self, new: NewUser) -> Result<Stored<User>> {
        if new.first_name.trim().is_empty() {
            return Err(DomainError::MissingField("first_name"));
        }
        if new.last_name.trim().is_empty() {
            return Err(DomainError::MissingField("last_name"));
        }
        if !new.email.contains('@') {
            return Err(DomainError::InvalidEmail(new.email));
        }

        if self.user_by_email(&new.email).await?.is_some() {
            return Err(DomainError::DuplicateEmail(new.email));
        }

        let user = User {
            id: UserId::new(),
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            password_hash: new.password_hash,
            created_at: Utc::now(),
        };

        let rev = self
            .store
            .put_typed(
                Collection::Users,
                &user.id.to_string(),
                &user,
                PutOptions::expect_new(),
            )
            .await?;

        Ok(Stored { rev, doc: user })
    }

    /// Loads a user by identifier.
    pub async fn user_by_id(&self, id: UserId) -> Result<Option<Stored<User>>> {
        Ok(self
            .store
            .get_typed(Collection::Users, &id.to_string())
            .await?)
    }

    /// Looks a user up by email address.
    pub async fn user_by_email(&self, email: &str) -> Result<Option<Stored<User>>> {
        let raws = self
            .store
            .find_by_field(Collection::Users, "email", email)
            .await?;

        match raws.into_iter().next() {
            Some(raw) => Ok(Some(raw.into_typed()?)),
            None => Ok(None),
        }
    }
}
