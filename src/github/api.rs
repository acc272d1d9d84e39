use async_trait::async_trait;

use crate::error::Result;
use crate::models::{GitHubUser, Repository, SearchUser};

/// The three GitHub endpoints the collector depends on.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn search_users_page(&self, query: &str, page: u32, per_page: u32) -> Result<Vec<SearchUser>>;
    async fn get_user(&self, login: &str) -> Result<GitHubUser>;
    async fn list_repos_page(&self, login: &str, page: u32, per_page: u32) -> Result<Vec<Repository>>;
}
