//! Canned GraphQL search responses for the leaderboard BDD tests.

use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, Request, ResponseTemplate};

/// Search string the collector sends for `repository` with no date window.
pub(crate) fn search_string(repository: &str) -> String {
    format!("repo:{repository} is:pr")
}

/// A `/graphql` mock answering only searches for `repository`.
pub(crate) fn search_mock(repository: &str, body: &Value) -> Mock {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "variables": { "searchQuery": search_string(repository) }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
}

/// A final search page holding `nodes`.
pub(crate) fn search_page(nodes: &[Value]) -> Value {
    json!({
        "data": {
            "rateLimit": { "limit": 5000, "remaining": 4990, "resetAt": "2024-01-01T00:00:00Z" },
            "search": {
                "pageInfo": { "hasNextPage": false, "endCursor": null },
                "nodes": nodes
            }
        }
    })
}

pub(crate) fn graphql_error(kind: &str, message: &str) -> Value {
    json!({
        "data": null,
        "errors": [{ "type": kind, "message": message }]
    })
}

fn login(user: &str) -> Value {
    json!({ "login": user })
}

/// Pull request node created at 09:00 on 2024-01-01.
pub(crate) fn pull_request(
    number: u64,
    author: &str,
    additions: u64,
    merged_at: Option<&str>,
) -> Value {
    json!({
        "number": number,
        "createdAt": "2024-01-01T09:00:00Z",
        "mergedAt": merged_at,
        "author": login(author),
        "additions": additions,
        "deletions": 0,
        "labels": { "nodes": [] },
        "reviews": { "nodes": [] },
        "comments": { "nodes": [] },
        "reviewThreads": { "nodes": [] }
    })
}

/// Three pull requests by `author`; the first is approved and commented on by
/// `reviewer`, the first two are merged after one and three hours.
pub(crate) fn reviewed_pull_requests(author: &str, reviewer: &str) -> Vec<Value> {
    let mut first = pull_request(1, author, 10, Some("2024-01-01T10:00:00Z"));
    first["reviews"] = json!({ "nodes": [{ "author": login(reviewer), "state": "APPROVED" }] });
    first["comments"] = json!({
        "nodes": [{ "author": login(reviewer), "createdAt": "2024-01-01T09:30:00Z" }]
    });
    vec![
        first,
        pull_request(2, author, 2, Some("2024-01-01T12:00:00Z")),
        pull_request(3, author, 6, None),
    ]
}

/// A merged pull request labelled `Release` with changes requested by
/// `reviewer` in a review thread.
pub(crate) fn released_pull_request(author: &str, reviewer: &str) -> Value {
    let mut node = pull_request(7, author, 5, Some("2024-01-01T10:30:00Z"));
    node["deletions"] = json!(5);
    node["labels"] = json!({ "nodes": [{ "name": "Release" }] });
    node["reviews"] = json!({
        "nodes": [{ "author": login(reviewer), "state": "CHANGES_REQUESTED" }]
    });
    node["reviewThreads"] = json!({
        "nodes": [{
            "comments": {
                "nodes": [{ "author": login(reviewer), "createdAt": "2024-01-01T09:10:00Z" }]
            }
        }]
    });
    node
}

/// Counts the searches among `requests` that targeted `repository`.
pub(crate) fn searches_for(requests: &[Request], repository: &str) -> usize {
    let expected = search_string(repository);
    requests
        .iter()
        .filter_map(|request| request.body_json::<Value>().ok())
        .filter(|body| body["variables"]["searchQuery"].as_str() == Some(expected.as_str()))
        .count()
}

/// Cells of the first table row whose user column equals `user`.
pub(crate) fn row_cells(report: &str, user: &str) -> Option<Vec<String>> {
    report
        .lines()
        .map(|line| {
            line.split('|')
                .map(str::trim)
                .filter(|cell| !cell.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .find(|cells| cells.first().is_some_and(|first| first == user))
}
