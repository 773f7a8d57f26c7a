use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;

use super::{AuthError, AuthProvider, SessionTokens};
use crate::models::AuthUser;

/// Client for a GoTrue-compatible auth service (`/auth/v1/...`).
pub struct GoTrueClient {
    http: Client,
    base_url: String,
    anon_key: String,
}

impl GoTrueClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    async fn token_grant(
        &self,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<Option<SessionTokens>, AuthError> {
        let response = self
            .http
            .post(self.url("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .json(&body)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.json().await?)),
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => Ok(None),
            status => Err(AuthError::UnexpectedStatus { status }),
        }
    }
}

#[async_trait]
impl AuthProvider for GoTrueClient {
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError> {
        let response = self
            .http
            .get(self.url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(Some(response.json().await?)),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            status => Err(AuthError::UnexpectedStatus { status }),
        }
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Option<SessionTokens>, AuthError> {
        self.token_grant("refresh_token", json!({ "refresh_token": refresh_token }))
            .await
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionTokens>, AuthError> {
        self.token_grant("password", json!({ "email": email, "password": password }))
            .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let response = self
            .http
            .post(self.url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(AuthError::UnexpectedStatus { status })
        }
    }
}
