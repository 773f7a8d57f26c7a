//! Shared fixtures: an in-memory app with a scripted auth provider.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use std::{collections::HashMap, sync::Arc, sync::Mutex};

use notes_portal::{
    app::{self, AppState},
    auth::{AuthError, AuthProvider, SessionTokens, session::CookieSettings},
    models::AuthUser,
    repository::MemoryDatabase,
};

/// Auth provider answering from fixed token tables.
#[derive(Default)]
pub struct ScriptedAuth {
    access: Mutex<HashMap<String, AuthUser>>,
    refresh: Mutex<HashMap<String, SessionTokens>>,
    passwords: Mutex<HashMap<(String, String), SessionTokens>>,
    signed_out: Mutex<Vec<String>>,
}

impl ScriptedAuth {
    pub fn grant_access(&self, token: &str, user: &AuthUser) {
        self.access
            .lock()
            .unwrap()
            .insert(token.to_string(), user.clone());
    }

    pub fn grant_refresh(&self, refresh_token: &str, tokens: SessionTokens) {
        self.refresh
            .lock()
            .unwrap()
            .insert(refresh_token.to_string(), tokens);
    }

    pub fn grant_password(&self, email: &str, password: &str, tokens: SessionTokens) {
        self.passwords
            .lock()
            .unwrap()
            .insert((email.to_string(), password.to_string()), tokens);
    }

    pub fn signed_out(&self) -> Vec<String> {
        self.signed_out.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthProvider for ScriptedAuth {
    async fn get_user(&self, access_token: &str) -> Result<Option<AuthUser>, AuthError> {
        Ok(self.access.lock().unwrap().get(access_token).cloned())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Option<SessionTokens>, AuthError> {
        Ok(self.refresh.lock().unwrap().get(refresh_token).cloned())
    }

    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionTokens>, AuthError> {
        Ok(self
            .passwords
            .lock()
            .unwrap()
            .get(&(email.to_string(), password.to_string()))
            .cloned())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.signed_out
            .lock()
            .unwrap()
            .push(access_token.to_string());
        Ok(())
    }
}

pub struct TestApp {
    pub db: Arc<MemoryDatabase>,
    pub auth: Arc<ScriptedAuth>,
    pub router: Router,
}

pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl Response {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    pub fn error_code(&self) -> Option<&str> {
        self.body["error"]["code"].as_str()
    }
}

pub fn test_app() -> TestApp {
    let db = Arc::new(MemoryDatabase::new());
    let auth = Arc::new(ScriptedAuth::default());

    let state = Arc::new(AppState {
        db: db.clone(),
        auth: auth.clone(),
        cookies: CookieSettings { secure: false },
    });

    TestApp {
        db,
        auth,
        router: app::router(state),
    }
}

pub fn new_user(email: &str) -> AuthUser {
    AuthUser {
        id: Uuid::new_v4(),
        email: Some(email.to_string()),
    }
}

impl TestApp {
    /// Provisions a user with a profile and returns their access token.
    pub async fn sign_up(&self, email: &str) -> (AuthUser, String) {
        let user = new_user(email);
        let token = format!("token-{}", user.id);

        self.db.provision_profile(user.id, None, "UTC").await;
        self.auth.grant_access(&token, &user);

        (user, token)
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Response {
            status,
            headers,
            body,
        }
    }

    pub async fn query(&self, token: Option<&str>, uri: &str) -> Response {
        self.send(request(Method::GET, uri, token, None)).await
    }

    pub async fn mutate(&self, token: Option<&str>, uri: &str, input: Value) -> Response {
        self.send(request(Method::POST, uri, token, Some(input)))
            .await
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, input: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("sb-access-token={token}"));
    }

    match input {
        Some(input) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(input.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
