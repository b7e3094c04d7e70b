//! GitHub REST endpoints.
//!
//! The trait below is the whole client definition. Everything that
//! implements it is generated by `build.rs` and included at the bottom of
//! this file.

use restgen::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A GitHub account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub login: String,
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

/// A repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: u64,
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub stargazers_count: u64,
}

/// An issue or pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: IssueState,
}

/// Body of `POST /repos/{owner}/{repo}/issues`.
#[derive(Debug, Clone, Serialize)]
pub struct NewIssue {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// Body of `PATCH`-style issue updates, sent with `PUT` here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssueUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueState>,
}

/// Query of the issue listing.
#[derive(Debug, Clone, Default, QueryParams)]
pub struct IssueFilter {
    pub state: Option<IssueState>,
    pub labels: Option<String>,
    #[alias("sort")]
    pub sort_by: Option<IssueSort>,
    #[alias("direction")]
    pub sort_direction: Option<SortDirection>,
}

/// Issue state as GitHub spells it.
#[generate_serializer]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    #[alias("open")]
    Open,
    #[alias("closed")]
    Closed,
    #[alias("all")]
    All,
}

/// What issue listings are sorted by.
#[generate_serializer]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSort {
    #[alias("created")]
    Created,
    #[alias("updated")]
    Updated,
    #[alias("comments")]
    Comments,
}

#[generate_serializer]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    #[alias("asc")]
    Ascending,
    #[alias("desc")]
    Descending,
}

/// Errors from the endpoints that report their own error type.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub request failed: {0}")]
    Client(#[from] ClientError),
}

/// The GitHub REST API, as far as this crate needs it.
#[api_client]
#[allow(async_fn_in_trait)]
pub trait GithubApi {
    /// `GET /users/{login}`
    #[get("/users/{login}")]
    fn user(&self, login: &str) -> Task<'_, User>;

    /// `GET /repos/{owner}/{repo}`
    #[get("/repos/{owner}/{repo}")]
    fn repository(&self, owner: &str, repo: &str) -> Task<'_, Repository>;

    /// `GET /repos/{owner}/{repo}/issues`
    #[get("/repos/{owner}/{repo}/issues")]
    fn issues(
        &self,
        owner: &str,
        repo: &str,
        filter: &IssueFilter,
        page: u32,
        per_page: u32,
    ) -> Task<'_, Vec<Issue>>;

    /// `POST /repos/{owner}/{repo}/issues`
    #[post("/repos/{owner}/{repo}/issues")]
    fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        #[body] issue: &NewIssue,
        cancel: Option<CancellationToken>,
    ) -> Task<'_, Issue>;

    /// `PUT /repos/{owner}/{repo}/issues/{number}`
    #[put("/repos/{owner}/{repo}/issues/{number}")]
    async fn update_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        #[body] update: &IssueUpdate,
    ) -> Result<Issue, GithubError>;

    /// `PUT /user/starred/{owner}/{repo}`
    #[put("/user/starred/{owner}/{repo}")]
    fn star(
        &self,
        owner: &str,
        repo: &str,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// `DELETE /repos/{owner}/{repo}/subscription`, blocking.
    #[delete("/repos/{owner}/{repo}/subscription")]
    fn unsubscribe(&self, owner: &str, repo: &str) -> Result<(), ClientError>;

    /// `PUT /notifications`; failures are only logged.
    #[put("/notifications")]
    async fn mark_notifications_read(&self);
}

include!(concat!(env!("OUT_DIR"), "/restgen/github.GithubApi.client.rs"));
include!(concat!(env!("OUT_DIR"), "/restgen/github.IssueState.serializer.rs"));
include!(concat!(env!("OUT_DIR"), "/restgen/github.IssueSort.serializer.rs"));
include!(concat!(env!("OUT_DIR"), "/restgen/github.SortDirection.serializer.rs"));
