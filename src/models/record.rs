use chrono::{DateTime, Utc};
use serde::Serialize;

use super::user::{GitHubUser, Repository};

/// Tri-state hiring flag. GitHub reports `true` or `null`, so absence is
/// kept distinct from an explicit `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Hireable {
    #[serde(rename = "true")]
    Yes,
    #[serde(rename = "false")]
    No,
    #[serde(rename = "unknown")]
    Unknown,
}

impl From<Option<bool>> for Hireable {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Hireable::Yes,
            Some(false) => Hireable::No,
            None => Hireable::Unknown,
        }
    }
}

/// One row of `users.csv`. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub login: String,
    pub name: String,
    pub company: String,
    pub location: String,
    pub email: String,
    pub hireable: Hireable,
    pub bio: String,
    pub public_repos: u32,
    pub followers: u32,
    pub following: u32,
    pub created_at: DateTime<Utc>,
}

impl From<GitHubUser> for UserRecord {
    fn from(user: GitHubUser) -> Self {
        Self {
            login: user.login,
            name: user.name.unwrap_or_default(),
            company: user.company.as_deref().map(normalize_company).unwrap_or_default(),
            location: user.location.unwrap_or_default(),
            email: user.email.unwrap_or_default(),
            hireable: Hireable::from(user.hireable),
            bio: user.bio.unwrap_or_default(),
            public_repos: user.public_repos,
            followers: user.followers,
            following: user.following,
            created_at: user.created_at,
        }
    }
}

/// One row of `repositories.csv`. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoRecord {
    pub login: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub stargazers_count: u32,
    pub watchers_count: u32,
    pub language: String,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub license_name: String,
}

impl RepoRecord {
    pub fn new(owner: &str, repo: Repository) -> Self {
        Self {
            login: owner.to_string(),
            full_name: repo.full_name,
            created_at: repo.created_at,
            stargazers_count: repo.stargazers_count,
            watchers_count: repo.watchers_count,
            language: repo.language.unwrap_or_default(),
            has_projects: repo.has_projects,
            has_wiki: repo.has_wiki,
            license_name: repo.license.map(|l| l.key).unwrap_or_default(),
        }
    }
}

/// Uppercases a company name after dropping surrounding whitespace and the
/// leading `@` of an org handle. Stripping repeats until neither remains at
/// the front, which keeps the function idempotent.
pub fn normalize_company(company: &str) -> String {
    company
        .trim_start_matches(|c: char| c == '@' || c.is_whitespace())
        .trim_end()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn user(value: serde_json::Value) -> GitHubUser {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_company() {
        assert_eq!(normalize_company("@foo "), "FOO");
        assert_eq!(normalize_company("  Acme Corp  "), "ACME CORP");
        assert_eq!(normalize_company("@"), "");
        assert_eq!(normalize_company(""), "");
        assert_eq!(normalize_company("foo@bar"), "FOO@BAR");
    }

    #[test]
    fn test_user_record_defaults() {
        let record = UserRecord::from(user(json!({
            "login": "octocat",
            "name": null,
            "company": null,
            "hireable": null,
            "public_repos": 8,
            "followers": 120,
            "following": 3,
            "created_at": "2011-01-25T18:44:36Z"
        })));

        assert_eq!(record.login, "octocat");
        assert_eq!(record.name, "");
        assert_eq!(record.company, "");
        assert_eq!(record.location, "");
        assert_eq!(record.email, "");
        assert_eq!(record.bio, "");
        assert_eq!(record.hireable, Hireable::Unknown);
        assert_eq!(record.followers, 120);
    }

    #[test]
    fn test_user_record_keeps_values() {
        let record = UserRecord::from(user(json!({
            "login": "dev",
            "name": "Dev Person",
            "company": " @github ",
            "location": "Mumbai, India",
            "email": "dev@example.com",
            "hireable": true,
            "bio": "builds things",
            "created_at": "2015-06-01T00:00:00Z"
        })));

        assert_eq!(record.company, "GITHUB");
        assert_eq!(record.location, "Mumbai, India");
        assert_eq!(record.hireable, Hireable::Yes);
        assert_eq!(record.public_repos, 0);
    }

    #[test]
    fn test_hireable_is_tri_state() {
        assert_eq!(Hireable::from(Some(false)), Hireable::No);
        assert_ne!(Hireable::from(None), Hireable::No);
        assert_eq!(serde_json::to_value(Hireable::Unknown).unwrap(), "unknown");
        assert_eq!(serde_json::to_value(Hireable::Yes).unwrap(), "true");
    }

    #[test]
    fn test_repo_record_license() {
        let licensed: Repository = serde_json::from_value(json!({
            "full_name": "dev/tool",
            "created_at": "2020-02-02T10:00:00Z",
            "stargazers_count": 5,
            "watchers_count": 5,
            "language": "Rust",
            "has_projects": true,
            "has_wiki": false,
            "license": { "key": "mit", "name": "MIT License" }
        }))
        .unwrap();
        let record = RepoRecord::new("dev", licensed);
        assert_eq!(record.license_name, "mit");
        assert_eq!(record.language, "Rust");
        assert!(record.has_projects);

        let unlicensed: Repository = serde_json::from_value(json!({
            "full_name": "dev/notes",
            "created_at": "2020-02-02T10:00:00Z",
            "language": null,
            "license": null
        }))
        .unwrap();
        let record = RepoRecord::new("dev", unlicensed);
        assert_eq!(record.license_name, "");
        assert_eq!(record.language, "");
        assert_eq!(record.login, "dev");
    }

    proptest! {
        #[test]
        fn property_normalize_company_idempotent(input in "[ @a-zA-Z0-9._&\\-éß]{0,40}") {
            let once = normalize_company(&input);
            prop_assert_eq!(normalize_company(&once), once);
        }
    }
}
