//! HTTP implementation of the backend gateway.

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use tastebud_core::{MenuItemId, OrderId, OrderStatus, RestaurantId};

use super::GatewayError;
use super::types::{
    LoginRequest, LoginResponse, MenuItem, MenuItemInput, NewOrder, Order, RegisterRequest,
    RegisterResponse, Restaurant, StatusUpdate,
};
use crate::config::ApiConfig;

/// Maximum number of body characters copied into logs.
const LOG_BODY_LIMIT: usize = 500;

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Tastebud REST API.
///
/// Every operation is a single request; failures are returned to the
/// caller untouched. Cloning shares the underlying connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    /// Base URL without a trailing slash, e.g. `https://host/api`.
    base_url: String,
}

/// How a non-success response is turned into an error.
#[derive(Clone, Copy)]
enum Failure {
    /// Auth endpoint: surface the server's message, or the fallback.
    Auth(&'static str),
    /// Surface the server's message, or the fallback.
    ServerMessage(&'static str),
    /// Fixed message; the body is discarded.
    Fixed(&'static str),
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Http` if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client: builder.build()?,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        })
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Auth` carrying the server's message (or
    /// "Login failed") if the credentials are rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, GatewayError> {
        let body = LoginRequest {
            email,
            password: password.expose_secret(),
        };
        let request = self
            .inner
            .client
            .post(self.endpoint("/auth/signin"))
            .json(&body);

        let response = Self::send(request, Failure::Auth("Login failed")).await?;
        decode(response).await
    }

    /// Register a new account.
    ///
    /// `role` is lower-cased before it is sent.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Auth` carrying the server's message (or
    /// "Registration failed") if the registration is rejected.
    #[instrument(skip(self, password), fields(email = %email, role = %role))]
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &SecretString,
        role: &str,
    ) -> Result<RegisterResponse, GatewayError> {
        let body = RegisterRequest {
            full_name,
            email,
            password: password.expose_secret(),
            role: role.to_lowercase(),
        };
        let request = self
            .inner
            .client
            .post(self.endpoint("/auth/signup"))
            .json(&body);

        let response = Self::send(request, Failure::Auth("Registration failed")).await?;
        decode_or_default(response).await
    }

    // =========================================================================
    // Restaurant Methods
    // =========================================================================

    /// List all restaurants.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Fetch` if the backend answers with a non-success status.
    #[instrument(skip(self))]
    pub async fn list_restaurants(&self) -> Result<Vec<Restaurant>, GatewayError> {
        self.get("/restaurants", "Failed to fetch restaurants").await
    }

    /// Get a single restaurant.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Fetch` if the backend answers with a non-success status.
    #[instrument(skip(self), fields(restaurant_id = %id))]
    pub async fn get_restaurant(&self, id: &RestaurantId) -> Result<Restaurant, GatewayError> {
        let path = format!("/restaurants/{}", urlencoding::encode(id.as_str()));
        self.get(&path, "Failed to fetch restaurant").await
    }

    /// Search restaurants by free-text term.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Fetch` if the backend answers with a non-success status.
    #[instrument(skip(self))]
    pub async fn search_restaurants(&self, term: &str) -> Result<Vec<Restaurant>, GatewayError> {
        let path = format!("/restaurants/search?q={}", urlencoding::encode(term));
        self.get(&path, "Failed to search restaurants").await
    }

    /// List restaurants serving a cuisine.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Fetch` if the backend answers with a non-success status.
    #[instrument(skip(self))]
    pub async fn list_restaurants_by_cuisine(
        &self,
        cuisine: &str,
    ) -> Result<Vec<Restaurant>, GatewayError> {
        let path = format!("/restaurants/cuisine/{}", urlencoding::encode(cuisine));
        self.get(&path, "Failed to fetch restaurants by cuisine")
            .await
    }

    // =========================================================================
    // Menu Methods
    // =========================================================================

    /// List a restaurant's menu.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Fetch` if the backend answers with a non-success status.
    #[instrument(skip(self))]
    pub async fn list_menu_items(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<MenuItem>, GatewayError> {
        let path = format!(
            "/restaurants/{}/menu",
            urlencoding::encode(restaurant_id.as_str())
        );
        self.get(&path, "Failed to fetch menu items").await
    }

    /// Add a dish to the owner's restaurant.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::TokenExpired` on 401, `GatewayError::Fetch` on
    /// any other non-success status.
    #[instrument(skip(self, item, token), fields(name = %item.name))]
    pub async fn create_menu_item(
        &self,
        item: &MenuItemInput,
        token: &SecretString,
    ) -> Result<MenuItem, GatewayError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("/menu-items"))
            .json(item);

        let response = Self::send(
            authorize(request, token),
            Failure::Fixed("Failed to create menu item"),
        )
        .await?;
        decode(response).await
    }

    /// Replace a dish's details.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::TokenExpired` on 401, `GatewayError::Fetch` on
    /// any other non-success status.
    #[instrument(skip(self, item, token), fields(menu_item_id = %id))]
    pub async fn update_menu_item(
        &self,
        id: &MenuItemId,
        item: &MenuItemInput,
        token: &SecretString,
    ) -> Result<MenuItem, GatewayError> {
        let path = format!("/menu-items/{}", urlencoding::encode(id.as_str()));
        let request = self.inner.client.put(self.endpoint(&path)).json(item);

        let response = Self::send(
            authorize(request, token),
            Failure::Fixed("Failed to update menu item"),
        )
        .await?;
        decode(response).await
    }

    /// Delete a dish.
    ///
    /// Returns `Ok(None)` when the backend answers `204 No Content` (or an
    /// empty body), otherwise whatever JSON it sent back.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::TokenExpired` on 401, `GatewayError::Fetch` on
    /// any other non-success status.
    #[instrument(skip(self, token), fields(menu_item_id = %id))]
    pub async fn delete_menu_item(
        &self,
        id: &MenuItemId,
        token: &SecretString,
    ) -> Result<Option<serde_json::Value>, GatewayError> {
        let path = format!("/menu-items/{}", urlencoding::encode(id.as_str()));
        let request = self.inner.client.delete(self.endpoint(&path));

        let response = Self::send(
            authorize(request, token),
            Failure::Fixed("Failed to delete menu item"),
        )
        .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&body)?))
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::TokenExpired` on 401, `GatewayError::Fetch`
    /// carrying the server's message (or "Order creation failed") otherwise.
    #[instrument(skip(self, order, token), fields(restaurant_id = %order.restaurant_id))]
    pub async fn create_order(
        &self,
        order: &NewOrder,
        token: &SecretString,
    ) -> Result<Order, GatewayError> {
        let request = self
            .inner
            .client
            .post(self.endpoint("/orders"))
            .json(order);

        let response = Self::send(
            authorize(request, token),
            Failure::ServerMessage("Order creation failed"),
        )
        .await?;
        decode(response).await
    }

    /// List the signed-in customer's orders.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::TokenExpired` on 401, `GatewayError::Fetch` on
    /// any other non-success status.
    #[instrument(skip(self, token))]
    pub async fn list_user_orders(&self, token: &SecretString) -> Result<Vec<Order>, GatewayError> {
        let request = self.inner.client.get(self.endpoint("/orders/user"));
        let response = Self::send(
            authorize(request, token),
            Failure::Fixed("Failed to fetch orders"),
        )
        .await?;
        decode(response).await
    }

    /// List orders placed with the signed-in owner's restaurant.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::TokenExpired` on 401, `GatewayError::Fetch` on
    /// any other non-success status.
    #[instrument(skip(self, token))]
    pub async fn list_restaurant_orders(
        &self,
        token: &SecretString,
    ) -> Result<Vec<Order>, GatewayError> {
        let request = self.inner.client.get(self.endpoint("/orders/restaurant"));
        let response = Self::send(
            authorize(request, token),
            Failure::Fixed("Failed to fetch restaurant orders"),
        )
        .await?;
        decode(response).await
    }

    /// Move an order to a new status.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::TokenExpired` on 401, `GatewayError::Fetch` on
    /// any other non-success status.
    #[instrument(skip(self, token))]
    pub async fn update_order_status(
        &self,
        order_id: &OrderId,
        status: OrderStatus,
        token: &SecretString,
    ) -> Result<Order, GatewayError> {
        let path = format!("/orders/{}/status", urlencoding::encode(order_id.as_str()));
        let request = self
            .inner
            .client
            .put(self.endpoint(&path))
            .json(&StatusUpdate { status });

        let response = Self::send(
            authorize(request, token),
            Failure::Fixed("Failed to update order status"),
        )
        .await?;
        decode(response).await
    }

    // =========================================================================
    // Request Helpers
    // =========================================================================

    /// Unauthenticated GET returning JSON.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        failure: &'static str,
    ) -> Result<T, GatewayError> {
        let request = self.inner.client.get(self.endpoint(path));
        let response = Self::send(request, Failure::Fixed(failure)).await?;
        decode(response).await
    }

    /// Send a request and map non-success statuses to errors.
    async fn send(request: RequestBuilder, failure: Failure) -> Result<Response, GatewayError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // 401 on a bearer call means the token is no longer accepted; on
        // the auth endpoints it just means bad credentials.
        if status == StatusCode::UNAUTHORIZED && !matches!(failure, Failure::Auth(_)) {
            debug!(status = %status, "Backend rejected bearer token");
            return Err(GatewayError::TokenExpired);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(
            status = %status,
            body = %truncate(&body),
            "Backend returned non-success status"
        );

        Err(match failure {
            Failure::Auth(fallback) => GatewayError::Auth(server_message(&body, fallback)),
            Failure::ServerMessage(fallback) => {
                GatewayError::Fetch(server_message(&body, fallback))
            }
            Failure::Fixed(message) => GatewayError::Fetch(message.to_string()),
        })
    }
}

/// Attach the bearer token to a request.
fn authorize(request: RequestBuilder, token: &SecretString) -> RequestBuilder {
    request.bearer_auth(token.expose_secret())
}

/// Decode a JSON response body.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        debug!(
            error = %e,
            body = %truncate(&body),
            "Failed to parse backend response"
        );
        GatewayError::Parse(e)
    })
}

/// Decode a JSON response body, treating an empty body as `T::default()`.
async fn decode_or_default<T: DeserializeOwned + Default>(
    response: Response,
) -> Result<T, GatewayError> {
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(&body)?)
}

/// Extract a human-readable message from an error body.
///
/// JSON bodies shaped like `{"message": "..."}` or `{"error": "..."}`
/// yield the inner string; any other non-empty body is used verbatim.
fn server_message(body: &str, fallback: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }

    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(trimmed)
    {
        for key in ["message", "error"] {
            if let Some(serde_json::Value::String(message)) = map.get(key)
                && !message.is_empty()
            {
                return message.clone();
            }
        }
    }

    trimmed.to_string()
}

fn truncate(body: &str) -> String {
    body.chars().take(LOG_BODY_LIMIT).collect()
}
