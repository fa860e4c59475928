//! GitHub API Client
//!
//! Module for managing interactions with the GitHub REST API

use std::collections::BTreeSet;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use crate::config::{LabelRecord, RepoConfig};
use crate::error::{Error, Result};

/// GitHub REST API version sent with every request
pub const API_VERSION: &str = "2022-11-28";

/// Page size for every paginated listing
pub const PER_PAGE: u32 = 100;

/// GitHub Label Information
///
/// Represents a label as returned by the GitHub API, metadata included
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteLabel {
    /// Label ID
    pub id: u64,

    #[serde(default)]
    pub node_id: String,

    /// Label API URL
    #[serde(default)]
    pub url: String,

    /// Label name
    pub name: String,

    /// Label color (6-digit hexadecimal, without #)
    pub color: String,

    /// Label description
    pub description: Option<String>,

    /// Whether this is a default label
    #[serde(default)]
    pub default: bool,
}

impl From<RemoteLabel> for LabelRecord {
    fn from(remote: RemoteLabel) -> Self {
        LabelRecord::new(
            remote.name,
            remote.color,
            remote.description.unwrap_or_default(),
        )
    }
}

/// A label attached to an issue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IssueLabel {
    pub name: String,
}

/// Present on issues that are pull requests
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PullRequestMarker {
    #[serde(default)]
    pub html_url: Option<String>,
}

/// An issue or pull request
///
/// GitHub lists pull requests through the issues endpoint; they differ only by
/// the `pull_request` marker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Issue {
    pub html_url: String,

    #[serde(default)]
    pub pull_request: Option<PullRequestMarker>,

    #[serde(default)]
    pub labels: Vec<IssueLabel>,
}

impl Issue {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// The pull request URL for pull requests, the issue URL otherwise
    pub fn canonical_url(&self) -> &str {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.html_url.as_deref())
            .unwrap_or(&self.html_url)
    }
}

/// Issue state filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IssueState {
    #[default]
    All,
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

/// Filter for [`LabelService::list_issues`]
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    /// Only issues carrying all of these labels
    pub labels: Option<BTreeSet<String>>,

    pub state: IssueState,
}

impl IssueFilter {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("state", self.state.as_str().to_string())];
        if let Some(labels) = self.labels.as_ref().filter(|labels| !labels.is_empty()) {
            let joined: Vec<&str> = labels.iter().map(String::as_str).collect();
            query.push(("labels", joined.join(",")));
        }
        query
    }
}

#[derive(Debug, Serialize)]
struct CreateLabelRequest<'a> {
    name: &'a str,
    color: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateLabelRequest<'a> {
    new_name: &'a str,
    color: &'a str,
    description: &'a str,
}

/// Label Service
///
/// Remote operations the reconciler and usage scanner depend on
#[async_trait]
pub trait LabelService: Send + Sync {
    /// All labels of the repository, metadata stripped
    ///
    /// # Returns
    /// Every label across all pages, in the order GitHub returns them
    ///
    /// # Errors
    /// Returns `AuthOrNotFound` on any non-success page, `NetworkTimeout` when
    /// a request times out
    async fn list_labels(&self) -> Result<Vec<LabelRecord>>;

    /// Create a label
    ///
    /// # Arguments
    /// - `label`: Label to create
    ///
    /// # Returns
    /// The created label as GitHub stored it
    ///
    /// # Errors
    /// Returns `Validation` if GitHub rejects the label (e.g. it already exists)
    async fn create_label(&self, label: &LabelRecord) -> Result<RemoteLabel>;

    /// Update the label currently named `current_name`
    ///
    /// `label.name` becomes the new name, which renames the label when it
    /// differs from `current_name`.
    ///
    /// # Arguments
    /// - `current_name`: Name of the label on the repository
    /// - `label`: Desired name, color, and description
    ///
    /// # Errors
    /// Returns `Validation` if GitHub rejects the update
    async fn update_label(&self, current_name: &str, label: &LabelRecord) -> Result<RemoteLabel>;

    /// Delete a label
    ///
    /// # Arguments
    /// - `name`: Name of the label to delete
    ///
    /// # Errors
    /// Returns `NotFound` with the status when the label was not deleted,
    /// including when it is already absent (404)
    async fn delete_label(&self, name: &str) -> Result<()>;

    /// All issues and pull requests matching `filter`
    ///
    /// # Arguments
    /// - `filter`: Label and state filter; the default matches every issue
    async fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>>;
}

/// GitHub API Client
///
/// Client responsible for interactions with the GitHub API
pub struct GitHubClient {
    http: Client,
    api_url: Url,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Create a new GitHub client
    ///
    /// # Arguments
    /// - `config`: Token, repository, API base URL, and request timeout
    ///
    /// # Errors
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client cannot be built
    pub fn new(config: &RepoConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| Error::config("Access token contains invalid characters"))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("x-github-api-version", HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .user_agent(concat!("ghlabel/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            api_url: config.api_url.clone(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
        })
    }

    /// `owner/repo`
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Build `/repos/{owner}/{repo}/{segments..}`, encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::config(format!("Invalid API URL: {}", self.api_url)))?
            .pop_if_empty()
            .extend(["repos", self.owner.as_str(), self.repo.as_str()])
            .extend(segments);
        Ok(url)
    }

    fn transport_error(&self, url: &Url, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::NetworkTimeout {
                url: url.to_string(),
            }
        } else {
            Error::Http(err)
        }
    }

    /// Fetch every page of a listing until an empty page comes back
    ///
    /// Any failure aborts the whole listing.
    async fn fetch_all<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&'static str, String)],
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            debug!(url = %url, page, "Fetching page");
            let response = self
                .http
                .get(url.clone())
                .query(query)
                .query(&[("page", page), ("per_page", PER_PAGE)])
                .send()
                .await
                .map_err(|e| self.transport_error(&url, e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(Error::AuthOrNotFound {
                    repository: self.repository(),
                    status: status.as_u16(),
                });
            }

            let batch: Vec<T> = response
                .json()
                .await
                .map_err(|e| self.transport_error(&url, e))?;
            if batch.is_empty() {
                break;
            }

            items.extend(batch);
            page += 1;
        }

        Ok(items)
    }

    /// Turn a non-`expected` response into a validation error for `name`
    async fn expect_status(
        &self,
        url: &Url,
        response: Response,
        expected: StatusCode,
        name: &str,
    ) -> Result<RemoteLabel> {
        let status = response.status();
        if status != expected {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Validation {
                name: name.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| self.transport_error(url, e))
    }
}

#[async_trait]
impl LabelService for GitHubClient {
    async fn list_labels(&self) -> Result<Vec<LabelRecord>> {
        info!(repository = %self.repository(), "Fetching list of github labels");
        let url = self.endpoint(&["labels"])?;
        let labels: Vec<RemoteLabel> = self.fetch_all(url, &[]).await?;
        Ok(labels.into_iter().map(LabelRecord::from).collect())
    }

    async fn create_label(&self, label: &LabelRecord) -> Result<RemoteLabel> {
        let url = self.endpoint(&["labels"])?;
        let body = CreateLabelRequest {
            name: &label.name,
            color: &label.color,
            description: &label.description,
        };

        let response = self
            .http
            .post(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let created = self
            .expect_status(&url, response, StatusCode::CREATED, &label.name)
            .await?;
        info!(label = %label.name, "Label added");
        Ok(created)
    }

    async fn update_label(&self, current_name: &str, label: &LabelRecord) -> Result<RemoteLabel> {
        let url = self.endpoint(&["labels", current_name])?;
        let body = UpdateLabelRequest {
            new_name: &label.name,
            color: &label.color,
            description: &label.description,
        };

        let response = self
            .http
            .patch(url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let updated = self
            .expect_status(&url, response, StatusCode::OK, &label.name)
            .await?;
        info!(label = %current_name, new_name = %label.name, "Label updated");
        Ok(updated)
    }

    async fn delete_label(&self, name: &str) -> Result<()> {
        let url = self.endpoint(&["labels", name])?;
        let response = self
            .http
            .delete(url.clone())
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        if status != StatusCode::NO_CONTENT {
            return Err(Error::NotFound {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        info!(label = %name, "Label deleted");
        Ok(())
    }

    async fn list_issues(&self, filter: &IssueFilter) -> Result<Vec<Issue>> {
        info!(repository = %self.repository(), "Fetching list of github issues");
        let url = self.endpoint(&["issues"])?;
        self.fetch_all(url, &filter.query()).await
    }
}
