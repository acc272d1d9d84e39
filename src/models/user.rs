use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A hit from `/search/users`. Only the login is needed; details are
/// fetched separately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchUser {
    pub login: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    #[serde(default)]
    pub items: Vec<SearchUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub hireable: Option<bool>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub public_repos: u32,
    #[serde(default)]
    pub followers: u32,
    #[serde(default)]
    pub following: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Repository {
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stargazers_count: u32,
    #[serde(default)]
    pub watchers_count: u32,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub has_projects: bool,
    #[serde(default)]
    pub has_wiki: bool,
    #[serde(default)]
    pub license: Option<License>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
}
