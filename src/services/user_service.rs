//! User accounts: registration, login and role management

use std::sync::Arc;

use tracing::{info, warn};

use super::validation::{self, MAX_PLACE_LEN, required_text};
use crate::errors::{CivicError, Result};
use crate::storage::{NewUser, Page, Paged, Role, SeaOrmStorage, User};
use crate::utils::password::{check_password_strength, hash_password, verify_password};

/// Argon2 是 CPU 密集型操作，放到阻塞线程池执行
async fn hash_in_background(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| CivicError::password_hash(format!("hash task failed: {}", e)))?
        .map_err(CivicError::from)
}

async fn verify_in_background(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| CivicError::password_hash(format!("verify task failed: {}", e)))?
        .map_err(CivicError::from)
}

fn check_password(password: &str) -> Result<()> {
    check_password_strength(password).map_err(CivicError::validation)
}

pub struct UserService {
    storage: Arc<SeaOrmStorage>,
}

impl UserService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// Self-service sign-up: role `user`, not verified.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let name = required_text("name", name, MAX_PLACE_LEN)?;
        let email = validation::email(email)?;
        check_password(password)?;

        if self.storage.email_exists(&email).await? {
            return Err(CivicError::conflict(format!(
                "email '{}' is already registered",
                email
            )));
        }

        let password_hash = hash_in_background(password.to_string()).await?;
        self.storage
            .insert_user(NewUser {
                name,
                email,
                password_hash,
                role: Role::User,
                is_verified: false,
            })
            .await
    }

    /// Check credentials; unknown email and wrong password look the same.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let invalid = || CivicError::unauthorized("invalid email or password");

        let email = email.trim().to_lowercase();
        let Some(credentials) = self.storage.find_user_credentials(&email).await? else {
            return Err(invalid());
        };

        if verify_in_background(password.to_string(), credentials.password_hash).await? {
            Ok(credentials.user)
        } else {
            warn!("Failed login attempt for user {}", credentials.user.id);
            Err(invalid())
        }
    }

    pub async fn get(&self, id: &str) -> Result<User> {
        self.storage
            .find_user(id)
            .await?
            .ok_or_else(|| CivicError::not_found(format!("user '{}' not found", id)))
    }

    pub async fn list(&self, page: Page) -> Result<Paged<User>> {
        let (items, total) = self.storage.list_users(page).await?;
        Ok(Paged { items, total })
    }

    /// `actor_id` is the admin performing the change.
    pub async fn update_role(&self, actor_id: &str, id: &str, role: Role) -> Result<User> {
        if actor_id == id && role != Role::Admin {
            return Err(CivicError::forbidden("admins cannot demote themselves"));
        }
        let user = self.storage.update_user_role(id, role).await?;
        info!("User {} role set to {} by {}", id, role, actor_id);
        Ok(user)
    }

    pub async fn count_with_role(&self, role: Role) -> Result<u64> {
        self.storage.count_users_with_role(role).await
    }

    pub async fn set_verified(&self, id: &str, verified: bool) -> Result<User> {
        self.storage.set_user_verified(id, verified).await
    }

    pub async fn delete(&self, actor_id: &str, id: &str) -> Result<()> {
        if actor_id == id {
            return Err(CivicError::forbidden("admins cannot delete themselves"));
        }
        if !self.storage.delete_user(id).await? {
            return Err(CivicError::not_found(format!("user '{}' not found", id)));
        }
        info!("User {} deleted by {}", id, actor_id);
        Ok(())
    }

    /// Create an admin, or promote and reset the password of an existing account.
    ///
    /// Returns the user and whether it was newly created.
    pub async fn create_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, bool)> {
        let name = required_text("name", name, MAX_PLACE_LEN)?;
        let email = validation::email(email)?;
        check_password(password)?;
        let password_hash = hash_in_background(password.to_string()).await?;

        if let Some(existing) = self.storage.find_user_credentials(&email).await? {
            let user = self
                .storage
                .promote_user_to_admin(&existing.user.id, password_hash)
                .await?;
            info!("Existing user {} promoted to admin", user.id);
            return Ok((user, false));
        }

        let user = self
            .storage
            .insert_user(NewUser {
                name,
                email,
                password_hash,
                role: Role::Admin,
                is_verified: true,
            })
            .await?;
        Ok((user, true))
    }
}
