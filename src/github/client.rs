use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::github::api::GitHubApi;
use crate::github::rate_limiter::RateLimiter;
use crate::models::{GitHubUser, Repository, SearchResponse, SearchUser};

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl GitHubClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", config.token))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static(concat!("gitcensus/", env!("CARGO_PKG_VERSION"))),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.request_delay),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// GETs `endpoint` (a path such as `/users/octocat`) and returns the JSON
    /// body.
    ///
    /// A 403 is treated as rate-limit exhaustion and returned immediately as
    /// [`Error::RateLimited`] without waiting. Any other non-200 status is
    /// [`Error::RequestFailed`]. Successful calls are followed by the fixed
    /// throttle delay.
    pub async fn request(&self, endpoint: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN {
            let wait = self.rate_limiter.seconds_until_reset(response.headers());
            tracing::warn!("Rate limit exceeded. Wait for {} seconds.", wait);
            return Err(Error::RateLimited(wait));
        }

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            let body = match serde_json::from_str::<Value>(&body) {
                Ok(json) => json.to_string(),
                Err(_) => {
                    tracing::warn!("Couldn't parse error body from {} as JSON", url);
                    body
                }
            };
            tracing::error!("Error: {} from {}: {}", status.as_u16(), url, body);
            return Err(Error::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let value = serde_json::from_str(&body)
            .map_err(|e| Error::ParseError(format!("{}: {}", url, e)))?;

        self.rate_limiter.pause().await;
        Ok(value)
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn search_users_page(&self, query: &str, page: u32, per_page: u32) -> Result<Vec<SearchUser>> {
        let params = [
            ("q", query.to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        let value = self.request("/search/users", &params).await?;
        let response: SearchResponse = decode(value, "user search")?;
        if response.incomplete_results {
            tracing::warn!("GitHub reported incomplete search results on page {}", page);
        }
        Ok(response.items)
    }

    async fn get_user(&self, login: &str) -> Result<GitHubUser> {
        let value = self.request(&format!("/users/{}", login), &[]).await?;
        if is_empty_object(&value) {
            return Err(Error::EmptyResponse(format!("user {}", login)));
        }
        decode(value, &format!("user {}", login))
    }

    async fn list_repos_page(&self, login: &str, page: u32, per_page: u32) -> Result<Vec<Repository>> {
        let params = [
            ("sort", "pushed".to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        let value = self.request(&format!("/users/{}/repos", login), &params).await?;
        if is_empty_object(&value) {
            return Ok(Vec::new());
        }
        decode(value, &format!("repositories of {}", login))
    }
}

fn is_empty_object(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T> {
    serde_json::from_value(value).map_err(|e| Error::ParseError(format!("{}: {}", what, e)))
}
