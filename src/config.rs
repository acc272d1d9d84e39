use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::github::paginator::PaginationPolicy;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_TOKEN_FILE: &str = ".token.txt";
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: String,
    pub api_base_url: String,
    pub location: String,
    pub min_followers: u32,
    pub max_users: usize,
    pub max_repos_per_user: usize,
    pub per_page: u32,
    pub request_delay: Duration,
    pub output_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. `GITHUB_TOKEN` wins
    /// over the token file.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let github_token = match var("GITHUB_TOKEN").filter(|t| !t.trim().is_empty()) {
            Some(token) => token.trim().to_string(),
            None => {
                let path = var("GITHUB_TOKEN_FILE").unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_string());
                read_token_file(&path)?
            }
        };

        let api_base_url = var("GITHUB_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let location = var("SEARCH_LOCATION").unwrap_or_else(|| "Mumbai".to_string());

        let min_followers = parse_var(&var, "MIN_FOLLOWERS")?.unwrap_or(50);
        let max_users = parse_var(&var, "MAX_USERS")?.unwrap_or(1000);
        let max_repos_per_user = parse_var(&var, "MAX_REPOS_PER_USER")?.unwrap_or(500);
        let per_page = parse_var(&var, "PER_PAGE")?.unwrap_or(MAX_PER_PAGE);
        let request_delay = Duration::from_millis(parse_var(&var, "REQUEST_DELAY_MS")?.unwrap_or(100));

        let output_dir = var("OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let config = Self {
            github_token,
            api_base_url,
            location,
            min_followers,
            max_users,
            max_repos_per_user,
            per_page,
            request_delay,
            output_dir,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(Error::Config(format!(
                "per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.per_page
            )));
        }
        if self.location.trim().is_empty() {
            return Err(Error::Config("search location must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn api(&self) -> ApiConfig {
        ApiConfig {
            token: self.github_token.clone(),
            base_url: self.api_base_url.clone(),
            request_delay: self.request_delay,
        }
    }

    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            location: self.location.clone(),
            min_followers: self.min_followers,
        }
    }
}

/// Immutable settings for the HTTP client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub token: String,
    pub base_url: String,
    pub request_delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub location: String,
    pub min_followers: u32,
}

impl SearchCriteria {
    /// The `q` parameter for the user search endpoint.
    pub fn query(&self) -> String {
        let location = self.location.trim();
        if location.contains(char::is_whitespace) {
            format!("location:\"{}\" followers:>={}", location, self.min_followers)
        } else {
            format!("location:{} followers:>={}", location, self.min_followers)
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    pub users: PaginationPolicy,
    pub repos: PaginationPolicy,
}

impl From<&Config> for CollectorConfig {
    fn from(config: &Config) -> Self {
        Self {
            users: PaginationPolicy::new(config.per_page, config.max_users),
            repos: PaginationPolicy::new(config.per_page, config.max_repos_per_user),
        }
    }
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            users: PaginationPolicy::new(MAX_PER_PAGE, 1000),
            repos: PaginationPolicy::new(MAX_PER_PAGE, 500),
        }
    }
}

pub fn read_token_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let token = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "GITHUB_TOKEN not set and token file {} unreadable: {}",
            path.display(),
            e
        ))
    })?;
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::Config(format!("token file {} is empty", path.display())));
    }
    Ok(token.to_string())
}

fn parse_var<F, T>(var: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::Config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(None),
    }
}
