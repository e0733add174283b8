use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder,
};
use tracing::{debug, info, warn};

use super::Catalog;
use crate::{
    entities::user,
    error::{AppError, AppResult},
    models::{DEFAULT_ROLE, UserInput, UserSummary},
};

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default().hash_password(password.as_bytes(), &salt)?.to_string())
}

impl Catalog {
    /// Stores a new user with an argon2 hash of `input.password`.
    pub async fn create_user(&self, input: UserInput) -> AppResult<UserSummary> {
        input.validate()?;
        if self.find_user(&input.username).await?.is_some() {
            warn!(username = %input.username, "username already taken");
            return Err(AppError::UsernameTaken(input.username));
        }

        let am = user::ActiveModel {
            username: Set(input.username.clone()),
            password_hash: Set(hash_password(&input.password)?),
            role: Set(input.role.unwrap_or_else(|| DEFAULT_ROLE.to_string())),
            ..Default::default()
        };

        let user = am.insert(&self.db).await.map_err(|err| {
            let err = AppError::from(err);
            if err.is_unique_violation() { AppError::UsernameTaken(input.username) } else { err }
        })?;

        info!(user_id = user.user_id, username = %user.username, role = %user.role, "user created");
        Ok(user.into())
    }

    pub async fn get_user(&self, user_id: i32) -> AppResult<UserSummary> {
        user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .map(UserSummary::from)
            .ok_or_else(|| AppError::not_found("user", user_id))
    }

    pub async fn find_user(&self, username: &str) -> AppResult<Option<UserSummary>> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .map(UserSummary::from))
    }

    pub async fn list_users(&self) -> AppResult<Vec<UserSummary>> {
        Ok(user::Entity::find()
            .order_by_asc(user::Column::UserId)
            .all(&self.db)
            .await?
            .into_iter()
            .map(UserSummary::from)
            .collect())
    }

    /// Renames the user, re-hashes the password and, when given, changes the
    /// role.
    pub async fn update_user(&self, user_id: i32, input: UserInput) -> AppResult<UserSummary> {
        input.validate()?;

        let existing = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("user", user_id))?;

        if let Some(other) = self.find_user(&input.username).await? {
            if other.user_id != user_id {
                return Err(AppError::UsernameTaken(input.username));
            }
        }

        let mut am = existing.into_active_model();
        am.username = Set(input.username);
        am.password_hash = Set(hash_password(&input.password)?);
        if let Some(role) = input.role {
            am.role = Set(role);
        }

        let user = am.update(&self.db).await?;
        debug!(user_id, "user updated");
        Ok(user.into())
    }

    pub async fn delete_user(&self, user_id: i32) -> AppResult<()> {
        let res = user::Entity::delete_by_id(user_id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::not_found("user", user_id));
        }
        info!(user_id, "user deleted");
        Ok(())
    }

    /// Checks a password against the stored hash. Unknown usernames and
    /// malformed hashes both count as a mismatch.
    pub async fn verify_password(&self, username: &str, password: &str) -> AppResult<bool> {
        let Some(user) = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?
        else {
            return Ok(false);
        };

        let Ok(parsed) = PasswordHash::new(&user.password_hash) else {
            warn!(username, "stored password hash is not a PHC string");
            return Ok(false);
        };
        Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::test_support::catalog;

    fn alice() -> UserInput {
        UserInput { username: "alice".into(), password: "s3cret".into(), role: None }
    }

    #[tokio::test]
    async fn new_users_get_the_default_role() {
        let catalog = catalog().await;
        let user = catalog.create_user(alice()).await.unwrap();
        assert_eq!(user.role, "user");
        assert!(user.created_at > 0);
    }

    #[tokio::test]
    async fn duplicate_username_fails() {
        let catalog = catalog().await;
        catalog.create_user(alice()).await.unwrap();

        let err = catalog
            .create_user(UserInput { role: Some("admin".into()), ..alice() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UsernameTaken(name) if name == "alice"));
        assert_eq!(catalog.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn engine_rejects_duplicate_username() {
        let catalog = catalog().await;
        catalog.create_user(alice()).await.unwrap();

        let raw = user::ActiveModel {
            username: Set("alice".into()),
            password_hash: Set("x".into()),
            role: Set("user".into()),
            ..Default::default()
        };
        let err = AppError::from(raw.insert(catalog.db()).await.unwrap_err());
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn password_is_hashed_and_verifiable() {
        let catalog = catalog().await;
        catalog.create_user(alice()).await.unwrap();

        let stored = user::Entity::find().one(catalog.db()).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "s3cret");
        assert!(stored.password_hash.starts_with("$argon2"));

        assert!(catalog.verify_password("alice", "s3cret").await.unwrap());
        assert!(!catalog.verify_password("alice", "wrong").await.unwrap());
        assert!(!catalog.verify_password("bob", "s3cret").await.unwrap());
    }

    #[tokio::test]
    async fn update_user_rejects_taken_name() {
        let catalog = catalog().await;
        catalog.create_user(alice()).await.unwrap();
        let bob = catalog
            .create_user(UserInput { username: "bob".into(), ..alice() })
            .await
            .unwrap();

        let err = catalog.update_user(bob.user_id, alice()).await.unwrap_err();
        assert!(matches!(err, AppError::UsernameTaken(_)));

        let renamed = catalog
            .update_user(bob.user_id, UserInput { username: "robert".into(), ..alice() })
            .await
            .unwrap();
        assert_eq!(renamed.username, "robert");
        assert_eq!(renamed.role, "user");
    }

    #[tokio::test]
    async fn delete_user_twice_is_not_found() {
        let catalog = catalog().await;
        let user = catalog.create_user(alice()).await.unwrap();
        catalog.delete_user(user.user_id).await.unwrap();
        assert!(matches!(
            catalog.delete_user(user.user_id).await,
            Err(AppError::NotFound { entity: "user", .. })
        ));
    }
}
