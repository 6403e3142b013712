use rmcp::schemars::{self, JsonSchema};
use serde::Deserialize;
use serde_json::Value;

use crate::config::OpenDataConfig;
use crate::render::{SECTION_SEPARATOR, clamp_limit, int_or, text_or, truncate};
use crate::upstream::UpstreamClient;

const DEFAULT_LIMIT: usize = 10;
const MAX_REPOS: usize = 50;
const MAX_SEARCH_RESULTS: usize = 30;
const MAX_ISSUES: usize = 30;
const MAX_COMMITS: usize = 20;
const MAX_COMMIT_MESSAGE_CHARS: usize = 100;

const ISSUE_STATES: [&str; 3] = ["open", "closed", "all"];

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetUserRequest {
    #[schemars(description = "GitHub login of the user")]
    pub username: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListReposRequest {
    #[schemars(description = "GitHub login of the user")]
    pub username: String,
    #[schemars(description = "Maximum number of repositories to return (default 10, capped at 50)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct RepoInfoRequest {
    #[schemars(description = "Repository owner")]
    pub owner: String,
    #[schemars(description = "Repository name")]
    pub repo: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchReposRequest {
    #[schemars(description = "Search query, e.g. 'http server language:rust'")]
    pub query: String,
    #[schemars(description = "Maximum number of results to return (default 10, capped at 30)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListIssuesRequest {
    #[schemars(description = "Repository owner")]
    pub owner: String,
    #[schemars(description = "Repository name")]
    pub repo: String,
    #[schemars(description = "Issue state filter: open, closed, or all (default open)")]
    pub state: Option<String>,
    #[schemars(description = "Maximum number of issues to return (default 10, capped at 30)")]
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ListCommitsRequest {
    #[schemars(description = "Repository owner")]
    pub owner: String,
    #[schemars(description = "Repository name")]
    pub repo: String,
    #[schemars(description = "Maximum number of commits to return (default 10, capped at 20)")]
    pub limit: Option<usize>,
}

pub async fn user(
    upstream: &UpstreamClient,
    config: &OpenDataConfig,
    request: GetUserRequest,
) -> String {
    let unable = format!("Unable to fetch user information for {}", request.username);
    let Ok(url) = config.github_base.join(&format!("users/{}", request.username)) else {
        return unable;
    };
    let Some(data) = upstream.get_github(url).await else {
        return unable;
    };

    format!(
        "\nUsername: {}\nName: {}\nBio: {}\nPublic Repos: {}\nFollowers: {}\nFollowing: {}\nLocation: {}\nCompany: {}\nBlog: {}\nCreated: {}\n",
        text_or(&data, "login", "N/A"),
        text_or(&data, "name", "N/A"),
        text_or(&data, "bio", "No bio available"),
        int_or(&data, "public_repos"),
        int_or(&data, "followers"),
        int_or(&data, "following"),
        text_or(&data, "location", "N/A"),
        text_or(&data, "company", "N/A"),
        text_or(&data, "blog", "N/A"),
        text_or(&data, "created_at", "N/A"),
    )
}

pub async fn repos(
    upstream: &UpstreamClient,
    config: &OpenDataConfig,
    request: ListReposRequest,
) -> String {
    let unable = format!("Unable to fetch repositories for {}", request.username);
    let limit = clamp_limit(request.limit, DEFAULT_LIMIT, MAX_REPOS);
    let Ok(mut url) = config
        .github_base
        .join(&format!("users/{}/repos", request.username))
    else {
        return unable;
    };
    url.query_pairs_mut()
        .append_pair("sort", "updated")
        .append_pair("per_page", &limit.to_string());

    let Some(data) = upstream.get_github(url).await else {
        return unable;
    };
    let Some(items) = data.as_array() else {
        return unable;
    };

    items
        .iter()
        .take(limit)
        .map(format_repo)
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

pub async fn repo_info(
    upstream: &UpstreamClient,
    config: &OpenDataConfig,
    request: RepoInfoRequest,
) -> String {
    let unable = format!(
        "Unable to fetch repository information for {}/{}",
        request.owner, request.repo
    );
    let Ok(url) = config
        .github_base
        .join(&format!("repos/{}/{}", request.owner, request.repo))
    else {
        return unable;
    };
    let Some(data) = upstream.get_github(url).await else {
        return unable;
    };

    let null = Value::Null;
    let license = data.get("license").unwrap_or(&null);
    format!(
        "\nRepository: {}\nDescription: {}\nLanguage: {}\nStars: {}\nForks: {}\nWatchers: {}\nOpen Issues: {}\nSize: {} KB\nDefault Branch: {}\nCreated: {}\nUpdated: {}\nLicense: {}\nURL: {}\nClone URL: {}\n",
        text_or(&data, "full_name", "N/A"),
        text_or(&data, "description", "No description"),
        text_or(&data, "language", "N/A"),
        int_or(&data, "stargazers_count"),
        int_or(&data, "forks_count"),
        int_or(&data, "watchers_count"),
        int_or(&data, "open_issues_count"),
        int_or(&data, "size"),
        text_or(&data, "default_branch", "N/A"),
        text_or(&data, "created_at", "N/A"),
        text_or(&data, "updated_at", "N/A"),
        text_or(license, "name", "N/A"),
        text_or(&data, "html_url", "N/A"),
        text_or(&data, "clone_url", "N/A"),
    )
}

pub async fn search_repos(
    upstream: &UpstreamClient,
    config: &OpenDataConfig,
    request: SearchReposRequest,
) -> String {
    let unable = format!("Unable to search repositories for query: {}", request.query);
    let limit = clamp_limit(request.limit, DEFAULT_LIMIT, MAX_SEARCH_RESULTS);
    let Ok(mut url) = config.github_base.join("search/repositories") else {
        return unable;
    };
    url.query_pairs_mut()
        .append_pair("q", &request.query)
        .append_pair("sort", "stars")
        .append_pair("order", "desc")
        .append_pair("per_page", &limit.to_string());

    let Some(data) = upstream.get_github(url).await else {
        return unable;
    };
    let Some(items) = data.get("items").and_then(Value::as_array) else {
        return unable;
    };

    items
        .iter()
        .take(limit)
        .map(format_search_hit)
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

pub async fn issues(
    upstream: &UpstreamClient,
    config: &OpenDataConfig,
    request: ListIssuesRequest,
) -> String {
    let unable = format!(
        "Unable to fetch issues for {}/{}",
        request.owner, request.repo
    );
    let limit = clamp_limit(request.limit, DEFAULT_LIMIT, MAX_ISSUES);
    // Unrecognized state filters fall back to the default rather than failing.
    let state = match request.state.as_deref() {
        Some(state) if ISSUE_STATES.contains(&state) => state,
        _ => "open",
    };
    let Ok(mut url) = config
        .github_base
        .join(&format!("repos/{}/{}/issues", request.owner, request.repo))
    else {
        return unable;
    };
    url.query_pairs_mut()
        .append_pair("state", state)
        .append_pair("per_page", &limit.to_string());

    let Some(data) = upstream.get_github(url).await else {
        return unable;
    };
    let Some(items) = data.as_array() else {
        return unable;
    };

    items
        .iter()
        .take(limit)
        .map(format_issue)
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

pub async fn commits(
    upstream: &UpstreamClient,
    config: &OpenDataConfig,
    request: ListCommitsRequest,
) -> String {
    let unable = format!(
        "Unable to fetch commits for {}/{}",
        request.owner, request.repo
    );
    let limit = clamp_limit(request.limit, DEFAULT_LIMIT, MAX_COMMITS);
    let Ok(mut url) = config
        .github_base
        .join(&format!("repos/{}/{}/commits", request.owner, request.repo))
    else {
        return unable;
    };
    url.query_pairs_mut()
        .append_pair("per_page", &limit.to_string());

    let Some(data) = upstream.get_github(url).await else {
        return unable;
    };
    let Some(items) = data.as_array() else {
        return unable;
    };

    items
        .iter()
        .take(limit)
        .map(format_commit)
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

fn format_repo(repo: &Value) -> String {
    format!(
        "\nName: {}\nDescription: {}\nLanguage: {}\nStars: {}\nForks: {}\nUpdated: {}\nURL: {}\n",
        text_or(repo, "name", "N/A"),
        text_or(repo, "description", "No description"),
        text_or(repo, "language", "N/A"),
        int_or(repo, "stargazers_count"),
        int_or(repo, "forks_count"),
        text_or(repo, "updated_at", "N/A"),
        text_or(repo, "html_url", "N/A"),
    )
}

fn format_search_hit(repo: &Value) -> String {
    format!(
        "\nName: {}\nDescription: {}\nLanguage: {}\nStars: {}\nForks: {}\nURL: {}\n",
        text_or(repo, "full_name", "N/A"),
        text_or(repo, "description", "No description"),
        text_or(repo, "language", "N/A"),
        int_or(repo, "stargazers_count"),
        int_or(repo, "forks_count"),
        text_or(repo, "html_url", "N/A"),
    )
}

fn format_issue(issue: &Value) -> String {
    let null = Value::Null;
    let labels = issue
        .get("labels")
        .and_then(Value::as_array)
        .map(|labels| {
            labels
                .iter()
                .filter_map(|label| label.get("name").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();
    let author = issue.get("user").unwrap_or(&null);

    format!(
        "\n#{}: {}\nState: {}\nAuthor: {}\nLabels: {}\nCreated: {}\nURL: {}\n",
        int_or(issue, "number"),
        text_or(issue, "title", "No title"),
        text_or(issue, "state", "N/A"),
        text_or(author, "login", "N/A"),
        if labels.is_empty() {
            "None"
        } else {
            labels.as_str()
        },
        text_or(issue, "created_at", "N/A"),
        text_or(issue, "html_url", "N/A"),
    )
}

fn format_commit(item: &Value) -> String {
    let null = Value::Null;
    let commit = item.get("commit").unwrap_or(&null);
    let author = commit.get("author").unwrap_or(&null);
    let sha: String = text_or(item, "sha", "N/A").chars().take(8).collect();
    let message = truncate(
        text_or(commit, "message", "No message"),
        MAX_COMMIT_MESSAGE_CHARS,
    );

    format!(
        "\nSHA: {}\nMessage: {}\nAuthor: {}\nDate: {}\nURL: {}\n",
        sha,
        message,
        text_or(author, "name", "N/A"),
        text_or(author, "date", "N/A"),
        text_or(item, "html_url", "N/A"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn format_issue_joins_labels_or_renders_none() {
        let issue = json!({
            "number": 7,
            "title": "Broken build",
            "state": "open",
            "user": {"login": "octocat"},
            "labels": [{"name": "bug"}, {"name": "ci"}],
        });
        let text = format_issue(&issue);
        assert!(text.contains("#7: Broken build"));
        assert!(text.contains("Labels: bug, ci"));

        let bare = json!({"labels": []});
        assert!(format_issue(&bare).contains("Labels: None"));
    }

    #[test]
    fn format_commit_truncates_long_messages() {
        let long_message = "m".repeat(150);
        let item = json!({
            "sha": "0123456789abcdef",
            "commit": {"message": long_message, "author": {"name": "Ada"}},
        });
        let text = format_commit(&item);
        assert!(text.contains("SHA: 01234567\n"));
        assert!(text.contains(&format!("Message: {}...", "m".repeat(100))));
        assert!(text.contains("Author: Ada"));

        let short = json!({"sha": "abc", "commit": {"message": "tiny fix"}});
        assert!(format_commit(&short).contains("Message: tiny fix\n"));
    }
}
