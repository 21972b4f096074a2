//! Typed client for the finance REST API.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::ApiError,
    http::{HttpRequest, HttpResponse, Method, Transport},
    models::{
        Budget, LoginRequest, LoginResponse, RegisterRequest, Resource, Transaction,
        TransactionFilters, UserInfo,
    },
    storage::TokenStore,
};

const REGISTER_PATH: &str = "auth/register/";
const LOGIN_PATH: &str = "auth/login/";
const ME_PATH: &str = "auth/me/";
const CURRENT_BUDGETS_PATH: &str = "budgets/current/";

/// Every request goes out with the stored bearer token, and every response
/// is mapped to `Result<T, ApiError>`.
///
/// A 401 on anything other than login clears both stored tokens before
/// [ApiError::AuthExpired] is returned. There is no refresh and no retry.
pub struct ApiClient<T, S> {
    transport: T,
    tokens: S,
}

impl<T: Transport, S: TokenStore> ApiClient<T, S> {
    pub fn new(transport: T, tokens: S) -> Self {
        Self { transport, tokens }
    }

    pub fn tokens(&self) -> &S {
        &self.tokens
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<serde_json::Value>,
    ) -> Result<HttpResponse, ApiError> {
        let request = HttpRequest {
            method,
            path: path.to_string(),
            query,
            body,
            bearer: self.tokens.access_token().filter(|token| !token.is_empty()),
        };

        let response = self.transport.send(request).await.inspect_err(|error| {
            warn!(method = method.as_str(), path, %error, "request failed");
        })?;
        debug!(method = method.as_str(), path, status = response.status, "response");

        if response.is_success() {
            return Ok(response);
        }

        match response.status {
            400 | 401 if path == LOGIN_PATH => Err(ApiError::InvalidCredentials),
            401 => {
                warn!(path, "access token rejected, clearing stored tokens");
                self.tokens.clear();
                Err(ApiError::AuthExpired)
            }
            status => Err(ApiError::Server {
                status,
                body: response.body,
            }),
        }
    }

    async fn fetch<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<serde_json::Value>,
    ) -> Result<R, ApiError> {
        let response = self.execute(method, path, query, body).await?;
        serde_json::from_str(&response.body).map_err(|error| ApiError::Decode(error.to_string()))
    }

    fn encode<P: Serialize>(payload: &P) -> Result<serde_json::Value, ApiError> {
        serde_json::to_value(payload).map_err(|error| ApiError::Encode(error.to_string()))
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserInfo, ApiError> {
        let body = Self::encode(request)?;
        self.fetch(Method::Post, REGISTER_PATH, Vec::new(), Some(body))
            .await
    }

    /// Log in and persist the returned token pair.
    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let body = Self::encode(request)?;
        let response: LoginResponse = self
            .fetch(Method::Post, LOGIN_PATH, Vec::new(), Some(body))
            .await?;

        self.tokens.set_tokens(&response.access, &response.refresh);
        info!(username = %response.username, "logged in");

        Ok(response)
    }

    pub async fn me(&self) -> Result<UserInfo, ApiError> {
        self.fetch(Method::Get, ME_PATH, Vec::new(), None).await
    }

    pub fn logout(&self) {
        self.tokens.clear();
        info!("logged out");
    }

    pub async fn list<R: Resource>(&self) -> Result<Vec<R>, ApiError> {
        self.fetch(Method::Get, &R::collection_path(), Vec::new(), None)
            .await
    }

    pub async fn retrieve<R: Resource>(&self, id: i64) -> Result<R, ApiError> {
        self.fetch(Method::Get, &R::item_path(id), Vec::new(), None)
            .await
    }

    pub async fn create<R: Resource>(&self, payload: &R::Create) -> Result<R, ApiError> {
        let body = Self::encode(payload)?;
        self.fetch(Method::Post, &R::collection_path(), Vec::new(), Some(body))
            .await
    }

    /// Full replace (PUT).
    pub async fn replace<R: Resource>(&self, id: i64, payload: &R::Create) -> Result<R, ApiError> {
        let body = Self::encode(payload)?;
        self.fetch(Method::Put, &R::item_path(id), Vec::new(), Some(body))
            .await
    }

    /// Partial update (PATCH).
    pub async fn update<R: Resource>(&self, id: i64, patch: &R::Patch) -> Result<R, ApiError> {
        let body = Self::encode(patch)?;
        self.fetch(Method::Patch, &R::item_path(id), Vec::new(), Some(body))
            .await
    }

    pub async fn delete<R: Resource>(&self, id: i64) -> Result<(), ApiError> {
        self.execute(Method::Delete, &R::item_path(id), Vec::new(), None)
            .await
            .map(|_| ())
    }

    pub async fn list_transactions(
        &self,
        filters: &TransactionFilters,
    ) -> Result<Vec<Transaction>, ApiError> {
        self.fetch(
            Method::Get,
            &Transaction::collection_path(),
            filters.to_query(),
            None,
        )
        .await
    }

    /// Budgets whose month is the present calendar month.
    pub async fn list_current_budgets(&self) -> Result<Vec<Budget>, ApiError> {
        self.fetch(Method::Get, CURRENT_BUDGETS_PATH, Vec::new(), None)
            .await
    }
}
