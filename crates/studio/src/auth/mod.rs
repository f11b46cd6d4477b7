//! Account registration, login, and sessions.
//!
//! Identity verification is real even though the store is local: passwords
//! are persisted as Argon2id hashes and sessions are issued as signed
//! access tokens plus hashed refresh tokens. Guests get a record with the
//! starting energy balance but cannot spend it until they register.

pub mod password;
pub mod token;

use manaforge_store::models::user::{CreateUser, Tier, User, UserProfile, STARTING_ENERGY};
use manaforge_store::repositories::UserRepo;
use manaforge_store::JsonStore;

use crate::error::{StudioError, StudioResult};
use self::token::{generate_access_token, generate_refresh_token, TokenConfig};

/// Display name used when registration supplies none.
const DEFAULT_DISPLAY_NAME: &str = "Wizard";

/// A freshly-issued session: the profile plus its tokens.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: UserProfile,
    /// HS256 access token for request authentication.
    pub access_token: String,
    /// Plaintext refresh token; only its hash is retained in the store.
    pub refresh_token: String,
}

/// Account operations over the user store.
pub struct Auth;

impl Auth {
    /// Register a new account and sign it in.
    ///
    /// New accounts start on the free tier with the starting energy
    /// balance. A duplicate email surfaces as a store conflict.
    pub async fn register(
        store: &JsonStore,
        config: &TokenConfig,
        name: &str,
        email: &str,
        password: &str,
    ) -> StudioResult<Session> {
        password::validate_password_strength(password).map_err(StudioError::Auth)?;
        let hash = password::hash_password(password).map_err(|e| StudioError::Auth(e.to_string()))?;

        let name = if name.trim().is_empty() {
            DEFAULT_DISPLAY_NAME.to_string()
        } else {
            name.trim().to_string()
        };

        let user = UserRepo::create(
            store,
            CreateUser {
                name,
                email: Some(email.to_string()),
                password_hash: Some(hash),
                tier: Tier::Free,
                is_guest: false,
                magic_energy: STARTING_ENERGY,
            },
        )
        .await?;

        tracing::info!(user_id = %user.id, "Account registered");
        Self::issue(store, config, user).await
    }

    /// Verify credentials and sign in.
    ///
    /// Unknown emails and wrong passwords produce the same message so the
    /// response does not reveal which accounts exist.
    pub async fn login(
        store: &JsonStore,
        config: &TokenConfig,
        email: &str,
        password: &str,
    ) -> StudioResult<Session> {
        let user = UserRepo::find_by_email(store, email)
            .await?
            .ok_or_else(invalid_credentials)?;

        let hash = user
            .password_hash
            .as_deref()
            .ok_or_else(invalid_credentials)?;

        let verified =
            password::verify_password(password, hash).map_err(|e| StudioError::Auth(e.to_string()))?;
        if !verified {
            return Err(invalid_credentials());
        }

        Self::issue(store, config, user).await
    }

    /// Create a local guest record with the starting energy balance.
    pub async fn guest(store: &JsonStore) -> StudioResult<UserProfile> {
        let user = UserRepo::create(
            store,
            CreateUser {
                name: "Guest".to_string(),
                email: None,
                password_hash: None,
                tier: Tier::Free,
                is_guest: true,
                magic_energy: STARTING_ENERGY,
            },
        )
        .await?;
        Ok(UserProfile::from(&user))
    }

    /// Exchange a refresh token for a new access token.
    pub async fn refresh(
        store: &JsonStore,
        config: &TokenConfig,
        user_id: &str,
        refresh_token: &str,
    ) -> StudioResult<String> {
        let user = UserRepo::get(store, user_id).await?;
        let stored = user
            .refresh_token_hash
            .as_deref()
            .ok_or_else(|| StudioError::Auth("no active session".to_string()))?;

        if token::hash_refresh_token(refresh_token) != stored {
            return Err(StudioError::Auth("invalid refresh token".to_string()));
        }

        generate_access_token(&user, config).map_err(|e| StudioError::Auth(e.to_string()))
    }

    /// Issue tokens for a verified user and persist the refresh hash.
    async fn issue(store: &JsonStore, config: &TokenConfig, user: User) -> StudioResult<Session> {
        let access_token =
            generate_access_token(&user, config).map_err(|e| StudioError::Auth(e.to_string()))?;
        let (refresh_token, refresh_hash) = generate_refresh_token();

        let user =
            UserRepo::set_refresh_token_hash(store, &user.id, Some(refresh_hash)).await?;

        Ok(Session {
            user: UserProfile::from(&user),
            access_token,
            refresh_token,
        })
    }
}

fn invalid_credentials() -> StudioError {
    StudioError::Auth("unknown email or wrong password".to_string())
}
