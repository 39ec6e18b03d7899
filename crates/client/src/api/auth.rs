use async_trait::async_trait;
use chama_core::auth::{
    AuthResponse, AuthServiceTrait, Credentials, NewUser, ProfileUpdate, User, UserServiceTrait,
};
use chama_core::Result;
use reqwest::Method;

use crate::client::ApiClient;
use crate::types::UserEnvelope;

// ─────────────────────────────────────────────────────────────────────────────
// Auth
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl AuthServiceTrait for ApiClient {
    /// POST /api/auth/register
    async fn register(&self, new_user: NewUser) -> Result<AuthResponse> {
        Ok(self
            .post("/api/auth/register", &new_user, "Registration failed")
            .await?)
    }

    /// POST /api/auth/login
    async fn login(&self, credentials: Credentials) -> Result<AuthResponse> {
        Ok(self
            .post("/api/auth/login", &credentials, "Login failed")
            .await?)
    }

    /// GET /api/auth/profile
    async fn get_profile(&self, token: &str) -> Result<User> {
        let request = self.request_with_token(Method::GET, "/api/auth/profile", Some(token))?;
        let envelope: UserEnvelope = Self::send(request, "Failed to fetch profile").await?;
        Ok(envelope.into_inner())
    }

    /// PUT /api/auth/profile
    async fn update_profile(&self, token: &str, update: ProfileUpdate) -> Result<User> {
        let request = self
            .request_with_token(Method::PUT, "/api/auth/profile", Some(token))?
            .json(&update);
        let envelope: UserEnvelope = Self::send(request, "Profile update failed").await?;
        Ok(envelope.into_inner())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Users
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl UserServiceTrait for ApiClient {
    /// GET /api/users/search?q={query}
    async fn search_users(&self, query: &str) -> Result<Vec<User>> {
        let path = format!("/api/users/search?q={}", urlencoding::encode(query));
        Ok(self.get(&path, "Failed to search users").await?)
    }
}
