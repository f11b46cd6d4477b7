//! Repository for user records.

use chrono::Utc;

use crate::error::StoreError;
use crate::models::user::{CreateUser, User};
use crate::repositories::unique_time_id;
use crate::{JsonStore, USERS_KEY};

/// Provides CRUD and energy-ledger operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Create a user record with a generated time-derived id.
    ///
    /// Rejects a duplicate email with a conflict.
    pub async fn create(store: &JsonStore, input: CreateUser) -> Result<User, StoreError> {
        let now = Utc::now();
        store
            .update_collection(USERS_KEY, move |users: &mut Vec<User>| {
                if let Some(email) = input.email.as_deref() {
                    if users.iter().any(|u| u.email.as_deref() == Some(email)) {
                        return Err(StoreError::Conflict(format!(
                            "email {email} is already registered"
                        )));
                    }
                }

                let user = User {
                    id: unique_time_id("u", now, |candidate| {
                        users.iter().any(|u| u.id == candidate)
                    }),
                    name: input.name,
                    email: input.email,
                    phone: None,
                    tier: input.tier,
                    magic_energy: input.magic_energy,
                    is_guest: input.is_guest,
                    password_hash: input.password_hash,
                    refresh_token_hash: None,
                    created_at: now,
                };
                users.push(user.clone());
                Ok(user)
            })
            .await
    }

    /// Look up a user by id.
    pub async fn find_by_id(store: &JsonStore, id: &str) -> Result<Option<User>, StoreError> {
        Ok(store
            .read_collection::<User>(USERS_KEY)
            .await?
            .into_iter()
            .find(|u| u.id == id))
    }

    /// Look up a user by id, failing when absent.
    pub async fn get(store: &JsonStore, id: &str) -> Result<User, StoreError> {
        Self::find_by_id(store, id)
            .await?
            .ok_or_else(|| StoreError::NotFound {
                entity: "user",
                id: id.to_string(),
            })
    }

    /// Look up a user by email.
    pub async fn find_by_email(store: &JsonStore, email: &str) -> Result<Option<User>, StoreError> {
        Ok(store
            .read_collection::<User>(USERS_KEY)
            .await?
            .into_iter()
            .find(|u| u.email.as_deref() == Some(email)))
    }

    /// List all user records.
    pub async fn list(store: &JsonStore) -> Result<Vec<User>, StoreError> {
        store.read_collection(USERS_KEY).await
    }

    /// Atomically verify and deduct energy from a user's balance.
    ///
    /// The check and the write happen inside one store critical section, so
    /// two concurrent debits can never both pass against a balance that
    /// only covers one of them. Returns the new balance.
    pub async fn debit_energy(
        store: &JsonStore,
        id: &str,
        cost: u32,
    ) -> Result<u32, StoreError> {
        store
            .update_collection(USERS_KEY, |users: &mut Vec<User>| {
                let user = users
                    .iter_mut()
                    .find(|u| u.id == id)
                    .ok_or_else(|| StoreError::NotFound {
                        entity: "user",
                        id: id.to_string(),
                    })?;
                if user.magic_energy < cost {
                    return Err(StoreError::InsufficientEnergy {
                        required: cost,
                        available: user.magic_energy,
                    });
                }
                user.magic_energy -= cost;
                Ok(user.magic_energy)
            })
            .await
    }

    /// Add recharge energy to a user's balance, returning the new balance.
    pub async fn credit_energy(
        store: &JsonStore,
        id: &str,
        amount: u32,
    ) -> Result<u32, StoreError> {
        store
            .update_collection(USERS_KEY, |users: &mut Vec<User>| {
                let user = users
                    .iter_mut()
                    .find(|u| u.id == id)
                    .ok_or_else(|| StoreError::NotFound {
                        entity: "user",
                        id: id.to_string(),
                    })?;
                user.magic_energy = user.magic_energy.saturating_add(amount);
                Ok(user.magic_energy)
            })
            .await
    }

    /// Replace the stored refresh-token hash, returning the updated user.
    pub async fn set_refresh_token_hash(
        store: &JsonStore,
        id: &str,
        hash: Option<String>,
    ) -> Result<User, StoreError> {
        store
            .update_collection(USERS_KEY, |users: &mut Vec<User>| {
                let user = users
                    .iter_mut()
                    .find(|u| u.id == id)
                    .ok_or_else(|| StoreError::NotFound {
                        entity: "user",
                        id: id.to_string(),
                    })?;
                user.refresh_token_hash = hash;
                Ok(user.clone())
            })
            .await
    }
}
