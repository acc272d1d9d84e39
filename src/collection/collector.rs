use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use crate::collection::report::{CollectionReport, SkippedUser, TruncatedListing};
use crate::config::{CollectorConfig, SearchCriteria};
use crate::github::paginator::{RepoListing, UserSearch};
use crate::github::{GitHubApi, Paginator, StopReason};
use crate::models::{RepoRecord, UserRecord};

/// Records gathered by one run.
#[derive(Debug, Clone, Serialize)]
pub struct Collection {
    pub users: Vec<UserRecord>,
    pub repositories: Vec<RepoRecord>,
    pub report: CollectionReport,
}

pub struct Collector<A: GitHubApi> {
    api: A,
    config: CollectorConfig,
    show_progress: bool,
}

impl<A: GitHubApi> Collector<A> {
    pub fn new(api: A, config: CollectorConfig) -> Self {
        Self {
            api,
            config,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Searches for users matching `criteria`, then fetches each user's
    /// details and repositories one after another.
    ///
    /// Fetch failures never abort the run: a user whose details cannot be
    /// fetched is skipped, and a repository listing that fails keeps the
    /// repositories gathered before the failure. Both are noted in the
    /// returned report.
    pub async fn collect(&self, criteria: &SearchCriteria) -> Collection {
        let query = criteria.query();

        // Step 1: Search
        tracing::info!("Searching users: {}", query);
        let search = Paginator::new(self.config.users)
            .collect(&UserSearch::new(&self.api, query.as_str()))
            .await;
        tracing::info!(
            "Found {} users in {} with {}+ followers",
            search.items.len(),
            criteria.location,
            criteria.min_followers
        );

        let mut report = CollectionReport::new(query, search.stop, search.items.len());
        let mut users = Vec::with_capacity(search.items.len());
        let mut repositories = Vec::new();

        let pb = self.progress_bar(search.items.len() as u64);
        let repo_paginator = Paginator::new(self.config.repos);

        for (i, hit) in search.items.iter().enumerate() {
            tracing::info!("Processing user {}: {}", i + 1, hit.login);
            pb.set_message(hit.login.clone());

            // Step 2: Details
            let details = match self.api.get_user(&hit.login).await {
                Ok(details) => details,
                Err(e) => {
                    if e.is_rate_limit() {
                        tracing::warn!("Skipping {} (rate limited): {}", hit.login, e);
                    } else {
                        tracing::warn!("Skipping {}: {}", hit.login, e);
                    }
                    report.skipped_users.push(SkippedUser {
                        login: hit.login.clone(),
                        reason: e.kind(),
                    });
                    pb.inc(1);
                    continue;
                }
            };
            let user = UserRecord::from(details);

            // Step 3: Repositories
            let listing = repo_paginator
                .collect(&RepoListing::new(&self.api, user.login.as_str()))
                .await;
            tracing::debug!(
                "{} repositories for {} ({} pages)",
                listing.items.len(),
                user.login,
                listing.pages_fetched
            );
            if let StopReason::Interrupted { failure } = listing.stop {
                report.truncated_listings.push(TruncatedListing {
                    login: user.login.clone(),
                    repos_collected: listing.items.len(),
                    reason: failure,
                });
            }
            repositories.extend(
                listing
                    .items
                    .into_iter()
                    .map(|repo| RepoRecord::new(&user.login, repo)),
            );

            users.push(user);
            pb.inc(1);
        }

        pb.finish_and_clear();

        report.users_collected = users.len();
        report.repos_collected = repositories.len();

        Collection {
            users,
            repositories,
            report,
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} users {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        pb
    }
}
