use std::time::Duration;

use reqwest::{
    blocking::Client,
    header::{CONTENT_TYPE, REFERER},
};
use serde::Deserialize;

use crate::sync::{Submission, SubmissionSource, SyncError};

const QUERY: &str = "
query getRecentSubmissions($username: String!, $limit: Int) {
  recentSubmissionList(username: $username, limit: $limit) {
    title
    titleSlug
    timestamp
    statusDisplay
    lang
  }
}";

const TIMEOUT: Duration = Duration::from_secs(15);

/// Fetches recent submissions from the LeetCode GraphQL API.
#[derive(Debug, Clone)]
pub struct LeetCodeClient {
    client: Client,
    endpoint: String,
}

impl LeetCodeClient {
    /// Create a client for the given GraphQL endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SyncError> {
        let client = Client::builder()
            .timeout(TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(SyncError::Client)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl SubmissionSource for LeetCodeClient {
    fn recent_submissions(&self, username: &str, limit: u32) -> Result<Vec<Submission>, SyncError> {
        let body = serde_json::json!({
            "query": QUERY,
            "variables": {
                "username": username,
                "limit": limit,
            },
        });

        tracing::debug!("Requesting {limit} recent submissions for {username}");

        let response: GraphQlResponse = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(REFERER, "https://leetcode.com")
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;

        response.into_submissions()
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Data>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Data {
    recent_submission_list: Option<Vec<Submission>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

impl GraphQlResponse {
    fn into_submissions(self) -> Result<Vec<Submission>, SyncError> {
        if !self.errors.is_empty() {
            let messages: Vec<_> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(SyncError::Api(messages.join("; ")));
        }

        Ok(self
            .data
            .and_then(|data| data.recent_submission_list)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_submission_list() {
        let body = r#"{
            "data": {
                "recentSubmissionList": [
                    {
                        "title": "Two Sum",
                        "titleSlug": "two-sum",
                        "timestamp": "1704445200",
                        "statusDisplay": "Accepted",
                        "lang": "rust"
                    },
                    {
                        "title": "Add Two Numbers",
                        "titleSlug": "add-two-numbers",
                        "timestamp": "1704441600",
                        "statusDisplay": "Wrong Answer",
                        "lang": "python3"
                    }
                ]
            }
        }"#;

        let response: GraphQlResponse = serde_json::from_str(body).unwrap();
        let submissions = response.into_submissions().unwrap();

        assert_eq!(submissions.len(), 2);
        assert_eq!(submissions[0].title_slug, "two-sum");
        assert!(submissions[0].is_accepted());
        assert!(!submissions[1].is_accepted());
        assert_eq!(submissions[1].lang, "python3");
    }

    #[test]
    fn unknown_user_is_empty() {
        let body = r#"{"data": {"recentSubmissionList": null}}"#;
        let response: GraphQlResponse = serde_json::from_str(body).unwrap();
        assert!(response.into_submissions().unwrap().is_empty());
    }

    #[test]
    fn graphql_errors_are_reported() {
        let body = r#"{"data": null, "errors": [{"message": "rate limited"}]}"#;
        let response: GraphQlResponse = serde_json::from_str(body).unwrap();
        let error = response.into_submissions().unwrap_err();
        assert_eq!(error.to_string(), "LeetCode returned errors: rate limited");
    }
}
