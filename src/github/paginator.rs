use async_trait::async_trait;
use serde::Serialize;

use crate::error::{FailureKind, Result};
use crate::github::api::GitHubApi;
use crate::models::{Repository, SearchUser};

/// Source of numbered pages. Page numbers start at 1.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    type Item: Send;

    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<Self::Item>>;

    fn describe(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    pub per_page: u32,
    pub cap: usize,
}

impl PaginationPolicy {
    pub fn new(per_page: u32, cap: usize) -> Self {
        Self { per_page, cap }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    EmptyPage,
    ShortPage,
    CapReached,
    Interrupted { failure: FailureKind },
}

impl StopReason {
    /// True when pagination ended because the data ran out or the cap was
    /// hit, rather than because a request failed.
    pub fn is_clean(&self) -> bool {
        !matches!(self, StopReason::Interrupted { .. })
    }
}

/// Position within one paginated fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub page: u32,
    pub accumulated: usize,
}

impl PageCursor {
    pub fn new() -> Self {
        Self {
            page: 1,
            accumulated: 0,
        }
    }

    /// Records a fetched page of `count` items and decides whether to stop.
    pub fn advance(&mut self, count: usize, policy: &PaginationPolicy) -> Option<StopReason> {
        if count == 0 {
            return Some(StopReason::EmptyPage);
        }
        self.accumulated += count;
        if self.accumulated >= policy.cap {
            return Some(StopReason::CapReached);
        }
        if count < policy.per_page as usize {
            return Some(StopReason::ShortPage);
        }
        self.page += 1;
        None
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

pub struct Paginator {
    policy: PaginationPolicy,
}

impl Paginator {
    pub fn new(policy: PaginationPolicy) -> Self {
        Self { policy }
    }

    pub async fn collect<F: PageFetcher + ?Sized>(&self, fetcher: &F) -> Paginated<F::Item> {
        let mut items = Vec::new();
        let mut cursor = PageCursor::new();
        let mut pages_fetched = 0;

        if self.policy.cap == 0 {
            return Paginated {
                items,
                pages_fetched,
                stop: StopReason::CapReached,
            };
        }

        let stop = loop {
            tracing::debug!("Fetching {} page {}", fetcher.describe(), cursor.page);
            let page = match fetcher.fetch_page(cursor.page, self.policy.per_page).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        "Stopping {} at page {}: {}",
                        fetcher.describe(),
                        cursor.page,
                        e
                    );
                    break StopReason::Interrupted { failure: e.kind() };
                }
            };
            pages_fetched += 1;

            let count = page.len();
            items.extend(page);

            if let Some(stop) = cursor.advance(count, &self.policy) {
                break stop;
            }
        };

        items.truncate(self.policy.cap);
        Paginated {
            items,
            pages_fetched,
            stop,
        }
    }
}

/// User search pages for a fixed query.
pub struct UserSearch<'a, A: GitHubApi + ?Sized> {
    api: &'a A,
    query: String,
}

impl<'a, A: GitHubApi + ?Sized> UserSearch<'a, A> {
    pub fn new(api: &'a A, query: impl Into<String>) -> Self {
        Self {
            api,
            query: query.into(),
        }
    }
}

#[async_trait]
impl<'a, A: GitHubApi + ?Sized> PageFetcher for UserSearch<'a, A> {
    type Item = SearchUser;

    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<SearchUser>> {
        self.api.search_users_page(&self.query, page, per_page).await
    }

    fn describe(&self) -> String {
        format!("user search `{}`", self.query)
    }
}

/// Repository listing pages for one user.
pub struct RepoListing<'a, A: GitHubApi + ?Sized> {
    api: &'a A,
    login: String,
}

impl<'a, A: GitHubApi + ?Sized> RepoListing<'a, A> {
    pub fn new(api: &'a A, login: impl Into<String>) -> Self {
        Self {
            api,
            login: login.into(),
        }
    }
}

#[async_trait]
impl<'a, A: GitHubApi + ?Sized> PageFetcher for RepoListing<'a, A> {
    type Item = Repository;

    async fn fetch_page(&self, page: u32, per_page: u32) -> Result<Vec<Repository>> {
        self.api.list_repos_page(&self.login, page, per_page).await
    }

    fn describe(&self) -> String {
        format!("repositories of {}", self.login)
    }
}
