//! # HTTP Implementation
//!
//! [`HttpApi`] speaks the backend's REST dialect: bearer-token auth, a
//! `{success, data}`-or-bare response envelope, and Mongo-flavored field
//! names. All shape tolerance lives in the decode path; callers only see
//! canonical model types.

use crate::api::{decode_envelope, error_message, ApiError, CanteenApi};
use crate::config::ClientConfig;
use crate::model::{CartPayload, FoodId, FoodItem, Order, OrderId, OrderStatus, User};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

/// REST client bound to one authenticated session.
#[derive(Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// Shape of the `/auth/login` and `/auth/register` responses: a token plus
/// the user document, flattened together.
#[derive(Debug, Deserialize)]
struct AuthPayload {
    token: String,
    #[serde(flatten)]
    user: User,
}

impl HttpApi {
    /// Builds a client from configuration. The token, when present, is sent
    /// as a bearer credential on every request.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.auth_token.clone(),
        }
    }

    /// `POST /auth/login` — session bootstrap. Returns a client bound to
    /// the fresh token together with the authenticated user.
    pub async fn login(
        config: &ClientConfig,
        email: &str,
        password: &str,
    ) -> Result<(HttpApi, User), ApiError> {
        let anonymous = HttpApi::new(&ClientConfig {
            auth_token: None,
            ..config.clone()
        });
        let body = anonymous
            .execute(anonymous.post("/auth/login").json(&json!({
                "email": email,
                "password": password,
            })))
            .await?;
        anonymous.into_session(body)
    }

    /// `POST /auth/register` — account creation plus session bootstrap.
    pub async fn register(
        config: &ClientConfig,
        name: &str,
        email: &str,
        password: &str,
        phone: Option<&str>,
        role: &str,
    ) -> Result<(HttpApi, User), ApiError> {
        let anonymous = HttpApi::new(&ClientConfig {
            auth_token: None,
            ..config.clone()
        });
        let body = anonymous
            .execute(anonymous.post("/auth/register").json(&json!({
                "name": name,
                "email": email,
                "password": password,
                "phone": phone,
                "role": role,
            })))
            .await?;
        anonymous.into_session(body)
    }

    fn into_session(self, body: Value) -> Result<(HttpApi, User), ApiError> {
        let auth: AuthPayload = decode_envelope(body)?;
        debug!(user = %auth.user.id, "session established");
        Ok((
            HttpApi {
                token: Some(auth.token),
                ..self
            },
            auth.user,
        ))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.get(self.url(path))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.post(self.url(path))
    }

    fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.put(self.url(path))
    }

    fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.delete(self.url(path))
    }

    /// Sends a request and applies the status-code policy: 2xx is success,
    /// anything else becomes [`ApiError::Status`] with the body's message.
    async fn execute(&self, builder: reqwest::RequestBuilder) -> Result<Value, ApiError> {
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        // Error bodies are not always JSON; parse leniently before deciding.
        let body = serde_json::from_str::<Value>(&text).unwrap_or(Value::Null);

        if !status.is_success() {
            return Err(ApiError::Status {
                code: status.as_u16(),
                message: error_message(
                    &body,
                    status.canonical_reason().unwrap_or("request failed"),
                ),
            });
        }
        if body.is_null() && !text.trim().is_empty() {
            return Err(ApiError::Decode(format!(
                "expected JSON body, got {} bytes of text",
                text.len()
            )));
        }
        Ok(body)
    }
}

#[async_trait]
impl CanteenApi for HttpApi {
    async fn list_food(&self) -> Result<Vec<FoodItem>, ApiError> {
        let body = self.execute(self.get("/food")).await?;
        decode_envelope(body)
    }

    async fn fetch_cart(&self) -> Result<CartPayload, ApiError> {
        let body = self.execute(self.get("/cart")).await?;
        decode_envelope(body)
    }

    async fn add_to_cart(&self, food: &FoodId, quantity: u32) -> Result<(), ApiError> {
        self.execute(self.post("/cart").json(&json!({
            "foodId": food,
            "quantity": quantity,
        })))
        .await?;
        Ok(())
    }

    async fn set_quantity(&self, food: &FoodId, quantity: u32) -> Result<(), ApiError> {
        self.execute(
            self.put(&format!("/cart/{food}"))
                .json(&json!({ "quantity": quantity })),
        )
        .await?;
        Ok(())
    }

    async fn remove_from_cart(&self, food: &FoodId) -> Result<(), ApiError> {
        self.execute(self.delete(&format!("/cart/{food}"))).await?;
        Ok(())
    }

    async fn create_order(&self) -> Result<Order, ApiError> {
        let body = self.execute(self.post("/orders")).await?;
        decode_envelope(body)
    }

    async fn my_orders(&self) -> Result<Vec<Order>, ApiError> {
        let body = self.execute(self.get("/orders/myorders")).await?;
        decode_envelope(body)
    }

    async fn all_orders(&self) -> Result<Vec<Order>, ApiError> {
        let body = self.execute(self.get("/orders")).await?;
        decode_envelope(body)
    }

    async fn set_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<Order, ApiError> {
        let body = self
            .execute(
                self.put(&format!("/orders/{id}/status"))
                    .json(&json!({ "status": status })),
            )
            .await?;
        decode_envelope(body)
    }

    async fn delete_order(&self, id: &OrderId) -> Result<(), ApiError> {
        self.execute(self.delete(&format!("/orders/{id}"))).await?;
        Ok(())
    }
}
