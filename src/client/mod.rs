pub mod envelope;

use std::{sync::Arc, time::Duration};

use reqwest::{header::ACCEPT, Method, RequestBuilder};
use secrecy::ExposeSecret;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    auth::SessionProvider,
    config::Config,
    errors::{AppError, AppResult},
};

pub use envelope::{decode_object, unwrap_data, Listing, PageMeta};

pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Builds a relative path from raw segments, percent-encoding each one
/// (filière names carry spaces and accents).
pub fn segments_path(segments: &[&str]) -> AppResult<String> {
    let mut url = reqwest::Url::parse("http://segments.invalid/")
        .map_err(|e| AppError::DecodeError(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| AppError::DecodeError("URL cannot hold path segments".to_string()))?
        .clear()
        .extend(segments);
    Ok(url.path().to_string())
}

/// Thin JSON client for the recruitment backend.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionProvider>,
}

impl ApiClient {
    pub fn new(config: &Config, session: Arc<dyn SessionProvider>) -> AppResult<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<dyn SessionProvider> {
        &self.session
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request_id = Uuid::new_v4().to_string();
        log::debug!("{} {} [{}]", method, path, request_id);

        let builder = self
            .http
            .request(method, self.url(path))
            .header(ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, request_id);

        match self.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> AppResult<Value> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                self.session.on_unauthorized();
            }
            let err = AppError::from_status(status, &body);
            log::warn!("Backend request failed: {}", err);
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get_value(&self, path: &str, query: &[(&str, String)]) -> AppResult<Value> {
        self.send(self.request(Method::GET, path).query(query)).await
    }

    /// GET a single object, unwrapping any `data` wrapper.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> AppResult<T> {
        decode_object(self.get_value(path, &[]).await?)
    }

    /// GET a list in any of the shapes the backend produces.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<Listing<T>> {
        Listing::from_value(self.get_value(path, query).await?)
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> AppResult<Value> {
        self.send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> AppResult<Value> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> AppResult<Value> {
        self.send(self.request(Method::DELETE, path)).await
    }
}
