use crate::auth::auth_model::{AuthResponse, Credentials, NewUser, ProfileUpdate, User};
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for the auth resource.
///
/// Profile calls take the token explicitly because they run before a
/// session is established (token verification on startup).
#[async_trait]
pub trait AuthServiceTrait: Send + Sync {
    async fn register(&self, new_user: NewUser) -> Result<AuthResponse>;
    async fn login(&self, credentials: Credentials) -> Result<AuthResponse>;
    async fn get_profile(&self, token: &str) -> Result<User>;
    async fn update_profile(&self, token: &str, update: ProfileUpdate) -> Result<User>;
}

/// Trait for the user directory.
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn search_users(&self, query: &str) -> Result<Vec<User>>;
}
