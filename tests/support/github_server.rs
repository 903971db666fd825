//! Wiremock stand-in for the GitHub REST endpoints the sync bot calls.

use serde_json::{Value, json};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::runtime::SharedRuntime;

/// Account owning every repository served by the mock.
pub const OWNER: &str = "acme";

const PATCH_MEDIA_TYPE: &str = "application/vnd.github.v3.patch";

/// Current patch content of pull request `number`.
pub fn patch_for(number: u64) -> String {
    format!(
        "From {number:040x} Mon Sep 17 00:00:00 2001\n\
         From: Octo Cat <octo@example.org>\n\
         Subject: [PATCH] Change {number}\n"
    )
}

/// Patch URL GitHub reports for pull request `number`.
pub fn patch_url(repository: &str, number: u64) -> String {
    format!("https://github.com/{OWNER}/{repository}/pull/{number}.patch")
}

fn api_pull(repository: &str, number: u64) -> Value {
    let html_url = format!("https://github.com/{OWNER}/{repository}/pull/{number}");
    json!({
        "number": number,
        "title": format!("Change {number}"),
        "body": "Fixes the frobnicator.\n\nBug: T123456",
        "state": "open",
        "html_url": html_url,
        "patch_url": patch_url(repository, number),
        "user": { "login": "octocat" }
    })
}

/// Serves `numbers` as the open pull requests of `repository`, together with
/// their patches, the author's profile and the comment endpoints.
pub fn mount_repository(
    runtime: &SharedRuntime,
    server: &MockServer,
    repository: &str,
    numbers: &[u64],
) {
    let pulls_path = format!("/repos/{OWNER}/{repository}/pulls");
    let listing: Vec<Value> = numbers
        .iter()
        .map(|number| api_pull(repository, *number))
        .collect();

    let mut mocks = vec![
        Mock::given(method("GET"))
            .and(path(pulls_path.as_str()))
            .and(query_param("state", "open"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing)),
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "octocat",
                "name": "Octo Cat",
                "email": "octo@example.org"
            }))),
    ];
    for number in numbers {
        mocks.push(
            Mock::given(method("GET"))
                .and(path(format!("{pulls_path}/{number}")))
                .and(header("accept", PATCH_MEDIA_TYPE))
                .respond_with(ResponseTemplate::new(200).set_body_string(patch_for(*number))),
        );
        mocks.push(
            Mock::given(method("POST"))
                .and(path(format!(
                    "/repos/{OWNER}/{repository}/issues/{number}/comments"
                )))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": number }))),
        );
    }

    for mock in mocks {
        runtime.block_on(mock.mount(server));
    }
}

/// Bodies of the comments posted on pull request `number`.
pub fn comments_on(
    runtime: &SharedRuntime,
    server: &MockServer,
    repository: &str,
    number: u64,
) -> Vec<String> {
    let comments_path = format!("/repos/{OWNER}/{repository}/issues/{number}/comments");
    let requests = runtime
        .block_on(server.received_requests())
        .unwrap_or_default();

    requests
        .iter()
        .filter(|request| {
            request.method.as_str() == "POST" && request.url.path() == comments_path
        })
        .filter_map(|request| serde_json::from_slice::<Value>(&request.body).ok())
        .filter_map(|body| body.get("body").and_then(Value::as_str).map(str::to_owned))
        .collect()
}
