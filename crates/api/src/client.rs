//! Async REST client for the task backend. The backend owns all business
//! logic; this layer only shapes requests, attaches the cookie-based
//! session credential, and maps responses into domain types.

use reqwest::header::{HeaderMap, HeaderValue, COOKIE};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use taskdeck_core::model::{Tag, Task, TaskPayload, TaskStats};

use crate::auth::{LoginOutcome, LoginPayload, SignupPayload, UserProfile};
use crate::chat::{ChatRequest, ChatResponse};
use crate::error::{http_error, ApiError};

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url`. A persisted session cookie, when
    /// present, is replayed on every request; fresh cookies set by the
    /// server still land in the in-memory jar.
    pub fn new(base_url: &str, session_cookie: Option<&str>) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        if let Some(cookie) = session_cookie {
            let value =
                HeaderValue::from_str(cookie).map_err(|_| ApiError::InvalidSessionCookie)?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        debug!("GET /api/tasks");
        self.fetch_json(self.http.get(self.url("/api/tasks"))).await
    }

    pub async fn search_tasks(&self, query: &str) -> Result<Vec<Task>, ApiError> {
        debug!(query, "GET /api/tasks/search");
        self.fetch_json(
            self.http
                .get(self.url("/api/tasks/search"))
                .query(&[("q", query)]),
        )
        .await
    }

    pub async fn task_stats(&self) -> Result<TaskStats, ApiError> {
        debug!("GET /api/tasks/stats");
        self.fetch_json(self.http.get(self.url("/api/tasks/stats")))
            .await
    }

    pub async fn list_tags(&self) -> Result<Vec<Tag>, ApiError> {
        debug!("GET /api/tags");
        self.fetch_json(self.http.get(self.url("/api/tags"))).await
    }

    pub async fn create_task(&self, payload: &TaskPayload) -> Result<Task, ApiError> {
        debug!(title = %payload.title, "POST /api/tasks");
        self.fetch_json(self.http.post(self.url("/api/tasks")).json(payload))
            .await
    }

    pub async fn update_task(&self, id: i64, payload: &TaskPayload) -> Result<Task, ApiError> {
        debug!(id, "PUT /api/tasks/{{id}}");
        self.fetch_json(
            self.http
                .put(self.url(&format!("/api/tasks/{id}")))
                .json(payload),
        )
        .await
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), ApiError> {
        debug!(id, "DELETE /api/tasks/{{id}}");
        let response = self
            .http
            .delete(self.url(&format!("/api/tasks/{id}")))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Flips the completed flag server-side and returns the stored task.
    pub async fn toggle_status(&self, id: i64) -> Result<Task, ApiError> {
        debug!(id, "PATCH /api/tasks/{{id}}/status");
        self.fetch_json(self.http.patch(self.url(&format!("/api/tasks/{id}/status"))))
            .await
    }

    pub async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        debug!(
            conversation = request.conversation_id.as_deref().unwrap_or("<new>"),
            "POST /api/chat"
        );
        self.fetch_json(self.http.post(self.url("/api/chat")).json(request))
            .await
    }

    pub async fn signup(&self, payload: &SignupPayload) -> Result<UserProfile, ApiError> {
        debug!(email = %payload.email, "POST /api/auth/signup");
        self.fetch_json(self.http.post(self.url("/api/auth/signup")).json(payload))
            .await
    }

    /// Log in and capture the session cookie the server sets, so callers
    /// can persist it for later invocations.
    pub async fn login(&self, payload: &LoginPayload) -> Result<LoginOutcome, ApiError> {
        debug!(email = %payload.email, "POST /api/auth/login");
        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(payload)
            .send()
            .await?;
        let response = check(response).await?;

        let pairs: Vec<String> = response
            .cookies()
            .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
            .collect();
        let session_cookie = if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        };

        let profile = response.json().await?;
        Ok(LoginOutcome {
            profile,
            session_cookie,
        })
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        debug!("POST /api/auth/logout");
        let response = self.http.post(self.url("/api/auth/logout")).send().await?;
        check(response).await?;
        Ok(())
    }

    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        debug!("GET /api/auth/me");
        self.fetch_json(self.http.get(self.url("/api/auth/me"))).await
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let response = check(response).await?;
        Ok(response.json().await?)
    }
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(http_error(status, &body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/api/tasks"), "http://localhost:8000/api/tasks");
    }

    #[test]
    fn garbage_session_cookie_is_rejected() {
        let result = ApiClient::new("http://localhost:8000", Some("bad\nvalue"));
        assert!(matches!(result, Err(ApiError::InvalidSessionCookie)));
    }
}
