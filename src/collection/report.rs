use std::fmt;

use serde::Serialize;

use crate::error::FailureKind;
use crate::github::StopReason;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedUser {
    pub login: String,
    pub reason: FailureKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TruncatedListing {
    pub login: String,
    pub repos_collected: usize,
    pub reason: FailureKind,
}

/// What a run managed to collect, and what it had to leave out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionReport {
    pub query: String,
    pub search_stop: StopReason,
    pub candidates: usize,
    pub users_collected: usize,
    pub repos_collected: usize,
    pub skipped_users: Vec<SkippedUser>,
    pub truncated_listings: Vec<TruncatedListing>,
}

impl CollectionReport {
    pub fn new(query: impl Into<String>, search_stop: StopReason, candidates: usize) -> Self {
        Self {
            query: query.into(),
            search_stop,
            candidates,
            users_collected: 0,
            repos_collected: 0,
            skipped_users: Vec::new(),
            truncated_listings: Vec::new(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.search_stop.is_clean()
            && self.skipped_users.is_empty()
            && self.truncated_listings.is_empty()
    }

    pub fn rate_limited(&self) -> bool {
        let limited = |kind: &FailureKind| matches!(kind, FailureKind::RateLimited { .. });
        matches!(&self.search_stop, StopReason::Interrupted { failure } if limited(failure))
            || self.skipped_users.iter().any(|s| limited(&s.reason))
            || self.truncated_listings.iter().any(|t| limited(&t.reason))
    }
}

impl fmt::Display for CollectionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} users and {} repositories collected from {} search results",
            self.users_collected, self.repos_collected, self.candidates
        )?;
        if self.is_complete() {
            return Ok(());
        }
        write!(f, " (incomplete:")?;
        if let StopReason::Interrupted { failure } = &self.search_stop {
            write!(f, " search stopped early, {};", failure)?;
        }
        if !self.skipped_users.is_empty() {
            write!(f, " {} users skipped;", self.skipped_users.len())?;
        }
        if !self.truncated_listings.is_empty() {
            write!(f, " {} repository listings cut short;", self.truncated_listings.len())?;
        }
        if self.rate_limited() {
            write!(f, " rate limit hit")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_run_is_complete() {
        let mut report = CollectionReport::new("location:Pune followers:>=1", StopReason::ShortPage, 3);
        report.users_collected = 3;
        report.repos_collected = 12;
        assert!(report.is_complete());
        assert!(!report.rate_limited());
        assert_eq!(
            report.to_string(),
            "3 users and 12 repositories collected from 3 search results"
        );
    }

    #[test]
    fn test_skips_make_report_incomplete() {
        let mut report = CollectionReport::new("q", StopReason::EmptyPage, 2);
        report.users_collected = 1;
        report.skipped_users.push(SkippedUser {
            login: "ghost".to_string(),
            reason: FailureKind::RateLimited { reset_in_secs: 60 },
        });

        assert!(!report.is_complete());
        assert!(report.rate_limited());
        let summary = report.to_string();
        assert!(summary.contains("1 users skipped"), "{}", summary);
        assert!(summary.contains("rate limit hit"), "{}", summary);
    }

    #[test]
    fn test_interrupted_search_is_incomplete() {
        let report = CollectionReport::new(
            "q",
            StopReason::Interrupted {
                failure: FailureKind::RequestFailed { status: 502 },
            },
            0,
        );
        assert!(!report.is_complete());
        assert!(report.to_string().contains("search stopped early"));
    }
}
