use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::config;
use crate::database::models::user::{User, ROLE_USER};
use crate::middleware::validate::{RegisterInput, UpdateUserInput};
use crate::services::blob::{self, BlobError, BlobStore, ImageUpload};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("username already taken")]
    UsernameTaken,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Blob(#[from] BlobError),
}

const INSERT_USER_SQL: &str = "INSERT INTO \"users\" \
    (id, full_name, username, password, phone_number, campus_residence, role) \
    VALUES ($1, $2, $3, $4, $5, $6, $7) \
    RETURNING *";

const UPDATE_USER_SQL: &str = "UPDATE \"users\" \
    SET full_name = $2, username = $3, phone_number = $4, campus_residence = $5, \
        avatar = $6, avatar_public_id = $7, updated_at = now() \
    WHERE id = $1 \
    RETURNING *";

/// Account registration, credential checks, and the self-service profile
pub struct UserService {
    pool: PgPool,
    blob: Arc<dyn BlobStore>,
}

impl UserService {
    pub fn new(pool: PgPool, blob: Arc<dyn BlobStore>) -> Self {
        Self { pool, blob }
    }

    /// Create an account with a freshly hashed password and the default role
    pub async fn register(&self, input: &RegisterInput) -> Result<User, UserError> {
        let username = input.username.trim();
        if self.username_taken(username, None).await? {
            return Err(UserError::UsernameTaken);
        }

        let hash = bcrypt::hash(&input.password, bcrypt::DEFAULT_COST)?;

        let user = sqlx::query_as::<_, User>(INSERT_USER_SQL)
            .bind(Uuid::new_v4())
            .bind(input.full_name.trim())
            .bind(username)
            .bind(hash)
            .bind(input.phone_number.trim())
            .bind(input.campus_residence.trim())
            .bind(ROLE_USER)
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    /// Look up by username and verify the password hash. An unknown username
    /// and a wrong password are deliberately the same error.
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, UserError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM \"users\" WHERE username = $1")
            .bind(username.trim())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        let matches = bcrypt::verify(password, &user.password)?;
        if !matches {
            return Err(UserError::InvalidCredentials);
        }
        Ok(user)
    }

    pub async fn current(&self, id: Uuid) -> Result<User, UserError> {
        sqlx::query_as::<_, User>("SELECT * FROM \"users\" WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserError::NotFound)
    }

    /// Self-service profile update. Password and role are not reachable
    /// through this path; a new avatar replaces the old one in the blob
    /// store, with the stale reference removed fire-and-forget.
    pub async fn update(
        &self,
        id: Uuid,
        input: &UpdateUserInput,
        avatar: Option<ImageUpload>,
    ) -> Result<(), UserError> {
        let existing = self.current(id).await?;

        let username = input.username.trim();
        if self.username_taken(username, Some(id)).await? {
            return Err(UserError::UsernameTaken);
        }

        let uploaded = match avatar {
            Some(image) => {
                let folder = &config::config().blob.avatar_folder;
                Some(self.blob.upload(image, folder).await?)
            }
            None => None,
        };

        let (avatar_url, avatar_reference) = match &uploaded {
            Some(new) => (Some(new.url.clone()), Some(new.reference.clone())),
            None => (existing.avatar.clone(), existing.avatar_public_id.clone()),
        };

        let result = sqlx::query_as::<_, User>(UPDATE_USER_SQL)
            .bind(id)
            .bind(input.full_name.trim())
            .bind(username)
            .bind(input.phone_number.trim())
            .bind(input.campus_residence.trim())
            .bind(avatar_url)
            .bind(avatar_reference)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(_) => {
                if uploaded.is_some() {
                    if let Some(old_reference) = &existing.avatar_public_id {
                        blob::delete_quietly(self.blob.as_ref(), old_reference).await;
                    }
                }
                Ok(())
            }
            Err(e) => {
                if let Some(new) = uploaded {
                    blob::delete_quietly(self.blob.as_ref(), &new.reference).await;
                }
                Err(e.into())
            }
        }
    }

    async fn username_taken(
        &self,
        username: &str,
        excluding: Option<Uuid>,
    ) -> Result<bool, UserError> {
        let taken = match excluding {
            Some(id) => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM \"users\" WHERE username = $1 AND id <> $2)",
                )
                .bind(username)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM \"users\" WHERE username = $1)",
                )
                .bind(username)
                .fetch_one(&self.pool)
                .await?
            }
        };
        Ok(taken)
    }
}
