//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::{
    Admin, AdminUuid, AuthServiceError, Identity, IssuedToken, NewAdmin, NewUser, TokenOwner,
    User, generate_token, hash_token, repository::PgAuthRepository,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Register a customer account and issue its first API token.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` when the email is taken, or an error if the insert fails.
    pub async fn create_user(
        &self,
        user: NewUser,
    ) -> Result<(User, IssuedToken), AuthServiceError> {
        if user.email.trim().is_empty() || user.full_name.trim().is_empty() {
            return Err(AuthServiceError::MissingRequiredData);
        }

        let user = self.repository.create_user(&user).await?;
        let token = self.issue_api_token(TokenOwner::User(user.uuid)).await?;

        tracing::info!(user_uuid = %user.uuid, token_uuid = %token.uuid, "created user");

        Ok((user, token))
    }

    /// Register a back-office account and issue its first API token.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` when the email is taken, or an error if the insert fails.
    pub async fn create_admin(
        &self,
        admin: NewAdmin,
    ) -> Result<(Admin, IssuedToken), AuthServiceError> {
        if admin.email.trim().is_empty() || admin.name.trim().is_empty() {
            return Err(AuthServiceError::MissingRequiredData);
        }

        let admin = self.repository.create_admin(&admin).await?;
        let token = self.issue_api_token(TokenOwner::Admin(admin.uuid)).await?;

        tracing::info!(admin_uuid = %admin.uuid, token_uuid = %token.uuid, "created admin");

        Ok((admin, token))
    }

    /// Disable an administrator. Their tokens stop resolving immediately.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown admin, or an error if the update fails.
    pub async fn deactivate_admin(&self, admin: AdminUuid) -> Result<(), AuthServiceError> {
        if self.repository.deactivate_admin(admin).await? == 0 {
            return Err(AuthServiceError::NotFound);
        }

        tracing::info!(admin_uuid = %admin, "deactivated admin");

        Ok(())
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        let rows_affected = self.repository.revoke_api_token(token_uuid).await?;

        Ok(rows_affected > 0)
    }

    async fn issue_api_token(&self, owner: TokenOwner) -> Result<IssuedToken, AuthServiceError> {
        let uuid = Uuid::now_v7();
        let token = generate_token();

        self.repository
            .create_api_token(uuid, &hash_token(&token), owner)
            .await?;

        Ok(IssuedToken { uuid, token })
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError> {
        let bearer_token = bearer_token.trim();

        if bearer_token.is_empty() {
            return Err(AuthServiceError::NotFound);
        }

        self.repository
            .find_identity_by_token_hash(&hash_token(bearer_token))
            .await?
            .filter(|identity| *identity != Identity::Anonymous)
            .ok_or(AuthServiceError::NotFound)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the user or admin that owns it.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Identity, AuthServiceError>;
}
