//! GitHub REST adapter: fetches the desired state for each category.

use anyhow::{Context as _, Result};
use g2o_core::model::{Category, Item};
use g2o_core::sync::RemoteSource;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::cell::{Cell, OnceCell};
use std::convert::identity;
use tracing::{debug, warn};

/// Items requested per page. A shorter page is the last one.
pub const PAGE_SIZE: usize = 30;

const USER_AGENT: &str = concat!("github2omnifocus/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Deserialize)]
struct GitHubIssue {
    number: u64,
    title: String,
    html_url: String,
    url: String,
    #[serde(default)]
    labels: Vec<GitHubLabel>,
    #[serde(default)]
    milestone: Option<GitHubMilestone>,
    #[serde(default)]
    repository: Option<GitHubRepository>,
    #[serde(default)]
    repository_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct GitHubLabel {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GitHubMilestone {
    title: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GitHubRepository {
    full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct GitHubUser {
    login: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResults {
    items: Vec<GitHubIssue>,
}

#[derive(Debug, Clone, Deserialize)]
struct GitHubNotification {
    id: String,
    subject: GitHubSubject,
    repository: GitHubRepository,
}

#[derive(Debug, Clone, Deserialize)]
struct GitHubSubject {
    title: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    latest_comment_url: Option<String>,
}

/// Issue or comment; only the browser link is needed.
#[derive(Debug, Clone, Deserialize)]
struct HtmlLink {
    #[serde(default)]
    html_url: String,
}

/// What a notification points at, parsed from its subject API URL.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SubjectRef {
    owner: String,
    repo: String,
    /// Issue or PR number, or commit SHA.
    id: String,
}

impl SubjectRef {
    fn key(&self) -> String {
        format!("{}/{}#{}", self.owner, self.repo, self.id)
    }
}

/// Blocking GitHub API client for one profile.
pub struct GitHubClient {
    api_url: String,
    token: String,
    requests: Cell<usize>,
    login: OnceCell<String>,
}

impl GitHubClient {
    pub fn new(api_url: &str, token: String) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
            requests: Cell::new(0),
            login: OnceCell::new(),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.get()
    }

    /// Open issues (and PRs) assigned to the authenticated user.
    pub fn assigned_issues(&self) -> Result<Vec<Item>> {
        let issues: Vec<GitHubIssue> = self
            .get_pages("issues", &[("filter", "assigned"), ("state", "open")], identity)
            .context("failed to fetch assigned issues")?;
        Ok(issues.into_iter().filter_map(issue_to_item).collect())
    }

    /// Open PRs waiting for the authenticated user's review.
    pub fn review_requests(&self) -> Result<Vec<Item>> {
        let login = self.login()?;
        self.search_pulls(&format!("type:pr state:open review-requested:{login}"))
    }

    /// Open PRs authored by the authenticated user in unarchived repositories.
    pub fn authored_pulls(&self) -> Result<Vec<Item>> {
        let login = self.login()?;
        self.search_pulls(&format!("type:pr state:open archived:false author:{login}"))
    }

    /// Unread notifications about issues, PRs and commits.
    pub fn notifications(&self) -> Result<Vec<Item>> {
        let notifications: Vec<GitHubNotification> = self
            .get_pages("notifications", &[], identity)
            .context("failed to fetch notifications")?;

        let mut items = Vec::with_capacity(notifications.len());
        for notification in notifications {
            let Some(subject_url) = notification.subject.url.as_deref() else {
                warn!(id = %notification.id, "notification has no subject URL, skipping");
                continue;
            };
            let Some(subject) = parse_subject_url(subject_url) else {
                warn!(url = subject_url, "unrecognised notification type, skipping");
                continue;
            };

            let link_url = notification
                .subject
                .latest_comment_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .unwrap_or(subject_url);
            let link: HtmlLink = self
                .get_json(link_url, &[])
                .with_context(|| format!("failed to resolve notification link {link_url}"))?;

            items.push(notification_to_item(&notification, &subject, link.html_url));
        }
        Ok(items)
    }

    fn login(&self) -> Result<&str> {
        if let Some(login) = self.login.get() {
            return Ok(login.as_str());
        }
        let user: GitHubUser = self
            .get_json(&self.endpoint("user"), &[])
            .context("failed to look up the authenticated user")?;
        debug!(login = %user.login, "authenticated");
        Ok(self.login.get_or_init(|| user.login).as_str())
    }

    /// PR tasks carry no milestone tag, so the milestone is dropped here too.
    fn search_pulls(&self, query: &str) -> Result<Vec<Item>> {
        let issues: Vec<GitHubIssue> = self
            .get_pages("search/issues", &[("q", query)], |page: SearchResults| page.items)
            .with_context(|| format!("failed to search for `{query}`"))?;
        Ok(issues
            .into_iter()
            .filter_map(issue_to_item)
            .map(|item| Item {
                milestone: None,
                ..item
            })
            .collect())
    }

    /// Follow `page=` until a page comes back shorter than [`PAGE_SIZE`].
    fn get_pages<P, T>(
        &self,
        path: &str,
        params: &[(&str, &str)],
        unwrap_page: impl Fn(P) -> Vec<T>,
    ) -> Result<Vec<T>>
    where
        P: DeserializeOwned,
    {
        let url = self.endpoint(path);
        let per_page = PAGE_SIZE.to_string();
        let mut all = Vec::new();
        let mut page = 1_u32;

        loop {
            debug!(path, page, "fetching page");
            let page_str = page.to_string();
            let mut query = params.to_vec();
            query.push(("per_page", &per_page));
            query.push(("page", &page_str));

            let batch = unwrap_page(
                self.get_json(&url, &query)
                    .with_context(|| format!("failed to fetch {path} page {page}"))?,
            );

            let raw_len = batch.len();
            all.extend(batch);

            if raw_len < PAGE_SIZE {
                break;
            }

            page += 1;
        }

        Ok(all)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str, query: &[(&str, &str)]) -> Result<T> {
        self.requests.set(self.requests.get() + 1);

        let mut request = ureq::get(url)
            .set("Accept", "application/vnd.github+json")
            .set("User-Agent", USER_AGENT)
            .set("Authorization", &format!("Bearer {}", self.token));
        for (name, value) in query {
            request = request.query(name, value);
        }

        let response = request
            .call()
            .map_err(|err| anyhow::anyhow!("GitHub API request failed for {url}: {err}"))?;

        response
            .into_json::<T>()
            .context("failed to decode GitHub API JSON response")
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.api_url)
    }
}

impl RemoteSource for GitHubClient {
    fn fetch(&self, category: Category) -> Result<Vec<Item>> {
        match category {
            Category::Assigned => self.assigned_issues(),
            Category::Review => self.review_requests(),
            Category::Authored => self.authored_pulls(),
            Category::Notifications => self.notifications(),
        }
    }
}

/// `owner/repo` from an API URL ending in `/repos/<owner>/<repo>`.
fn repo_from_api_url(url: &str) -> Option<String> {
    let mut segments = url.trim_end_matches('/').rsplit('/');
    let repo = segments.next().filter(|s| !s.is_empty())?;
    let owner = segments.next().filter(|s| !s.is_empty())?;
    (segments.next() == Some("repos")).then(|| format!("{owner}/{repo}"))
}

/// Parse `.../<owner>/<repo>/(issues|commits|pulls)/<id>`.
fn parse_subject_url(url: &str) -> Option<SubjectRef> {
    let mut segments = url.trim_end_matches('/').rsplit('/');
    let id = segments.next().filter(|s| !s.is_empty())?;
    let kind = segments.next()?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    let owner = segments.next().filter(|s| !s.is_empty())?;

    matches!(kind, "issues" | "commits" | "pulls").then(|| SubjectRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        id: id.to_string(),
    })
}

fn issue_to_item(issue: GitHubIssue) -> Option<Item> {
    let repo = issue
        .repository
        .map(|repository| repository.full_name)
        .or_else(|| issue.repository_url.as_deref().and_then(repo_from_api_url));
    let Some(repo) = repo else {
        warn!(url = %issue.url, "issue has no repository, skipping");
        return None;
    };

    Some(Item {
        key: format!("{repo}#{}", issue.number),
        title: issue.title.trim().to_string(),
        html_url: issue.html_url,
        api_url: issue.url,
        id: String::new(),
        repo,
        labels: issue.labels.into_iter().map(|label| label.name).collect(),
        milestone: issue.milestone.map(|milestone| milestone.title),
    })
}

fn notification_to_item(
    notification: &GitHubNotification,
    subject: &SubjectRef,
    html_url: String,
) -> Item {
    Item {
        key: subject.key(),
        title: notification.subject.title.trim().to_string(),
        html_url,
        api_url: notification.subject.url.clone().unwrap_or_default(),
        id: notification.id.clone(),
        repo: notification.repository.full_name.clone(),
        labels: Vec::new(),
        milestone: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_json() -> serde_json::Value {
        serde_json::json!({
            "number": 42,
            "title": "  Crash on start \n",
            "html_url": "https://github.com/acme/widget/issues/42",
            "url": "https://api.github.com/repos/acme/widget/issues/42",
            "labels": [{"name": "bug"}, {"name": "P1"}],
            "milestone": {"title": "v2.0"},
            "repository": {"full_name": "acme/widget"},
            "repository_url": "https://api.github.com/repos/acme/widget"
        })
    }

    #[test]
    fn assigned_issue_becomes_item() {
        let issue: GitHubIssue = serde_json::from_value(issue_json()).expect("decode");
        let item = issue_to_item(issue).expect("item");
        assert_eq!(item.key, "acme/widget#42");
        assert_eq!(item.title, "Crash on start");
        assert_eq!(item.repo, "acme/widget");
        assert_eq!(item.labels, vec!["bug", "P1"]);
        assert_eq!(item.milestone.as_deref(), Some("v2.0"));
        assert_eq!(item.api_url, "https://api.github.com/repos/acme/widget/issues/42");
    }

    #[test]
    fn search_result_uses_repository_url() {
        let mut json = issue_json();
        json.as_object_mut().expect("object").remove("repository");
        let results: SearchResults =
            serde_json::from_value(serde_json::json!({ "total_count": 1, "items": [json] }))
                .expect("decode");
        let item = issue_to_item(results.items[0].clone()).expect("item");
        assert_eq!(item.key, "acme/widget#42");
    }

    #[test]
    fn issue_without_repository_is_skipped() {
        let mut json = issue_json();
        let object = json.as_object_mut().expect("object");
        object.remove("repository");
        object.remove("repository_url");
        let issue: GitHubIssue = serde_json::from_value(json).expect("decode");
        assert!(issue_to_item(issue).is_none());
    }

    #[test]
    fn null_milestone_decodes() {
        let mut json = issue_json();
        json["milestone"] = serde_json::Value::Null;
        let issue: GitHubIssue = serde_json::from_value(json).expect("decode");
        assert_eq!(issue_to_item(issue).expect("item").milestone, None);
    }

    #[test]
    fn repo_from_api_url_requires_repos_segment() {
        assert_eq!(
            repo_from_api_url("https://api.github.com/repos/acme/widget"),
            Some("acme/widget".to_string())
        );
        assert_eq!(
            repo_from_api_url("https://ghe.example.com/api/v3/repos/acme/widget/"),
            Some("acme/widget".to_string())
        );
        assert_eq!(repo_from_api_url("https://api.github.com/acme/widget"), None);
        assert_eq!(repo_from_api_url(""), None);
    }

    #[test]
    fn subject_url_accepts_issues_pulls_and_commits() {
        let issue = parse_subject_url("https://api.github.com/repos/cloudant/infra/issues/1500")
            .expect("issue");
        assert_eq!(issue.key(), "cloudant/infra#1500");

        let pull = parse_subject_url("https://api.github.com/repos/acme/widget/pulls/7").expect("pull");
        assert_eq!(pull.key(), "acme/widget#7");

        let commit = parse_subject_url(
            "https://api.github.com/repos/cloudant/infra/commits/b63a54879672ba25e6fd9c7cf5547ba118b7f6ae",
        )
        .expect("commit");
        assert_eq!(
            commit.key(),
            "cloudant/infra#b63a54879672ba25e6fd9c7cf5547ba118b7f6ae"
        );
    }

    #[test]
    fn subject_url_rejects_other_kinds() {
        assert!(parse_subject_url("https://api.github.com/repos/acme/widget/releases/9").is_none());
        assert!(parse_subject_url("https://api.github.com/repos/acme/widget/check-suites/3").is_none());
        assert!(parse_subject_url("issues/1").is_none());
        assert!(parse_subject_url("").is_none());
    }

    #[test]
    fn notification_becomes_item() {
        let notification: GitHubNotification = serde_json::from_value(serde_json::json!({
            "id": "123456",
            "subject": {
                "title": " New comment ",
                "url": "https://api.github.com/repos/acme/widget/issues/5",
                "latest_comment_url": "https://api.github.com/repos/acme/widget/issues/comments/99"
            },
            "repository": {"full_name": "acme/widget"}
        }))
        .expect("decode");
        let subject = parse_subject_url(notification.subject.url.as_deref().expect("url"))
            .expect("subject");

        let item = notification_to_item(
            &notification,
            &subject,
            "https://github.com/acme/widget/issues/5#issuecomment-99".to_string(),
        );
        assert_eq!(item.key, "acme/widget#5");
        assert_eq!(item.title, "New comment");
        assert_eq!(item.id, "123456");
        assert_eq!(item.repo, "acme/widget");
        assert!(item.labels.is_empty());
    }

    #[test]
    fn notification_without_subject_url_decodes() {
        let notification: GitHubNotification = serde_json::from_value(serde_json::json!({
            "id": "1",
            "subject": {"title": "CI failed", "url": null, "latest_comment_url": null},
            "repository": {"full_name": "acme/widget"}
        }))
        .expect("decode");
        assert!(notification.subject.url.is_none());
    }

    #[test]
    fn html_link_ignores_other_fields() {
        let link: HtmlLink = serde_json::from_value(serde_json::json!({
            "id": 99,
            "body": "looks good",
            "html_url": "https://github.com/acme/widget/pull/7#issuecomment-99"
        }))
        .expect("decode");
        assert_eq!(link.html_url, "https://github.com/acme/widget/pull/7#issuecomment-99");
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = GitHubClient::new("https://ghe.example.com/api/v3/", "t".to_string());
        assert_eq!(client.endpoint("user"), "https://ghe.example.com/api/v3/user");
        assert_eq!(client.request_count(), 0);
    }
}
