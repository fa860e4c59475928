//! # ghlabel
//!
//! Set up GitHub repository labels from yaml/json config files
//!
//! ## Features
//! - Create, update, and remove labels to match the config
//! - Labels still attached to issues or pull requests are never removed
//!   unless forced
//! - Strict mode mirroring the config exactly
//! - Preview (dry-run) mode
//! - Starter label templates

pub mod config;
pub mod dump;
pub mod error;
pub mod github;
pub mod sync;
pub mod usage;

pub use config::{LabelRecord, RepoConfig};
pub use error::{Error, Result};
pub use github::{GitHubClient, LabelService};
pub use sync::{LabelReconciler, ReconciliationPlan, SetupOptions, SetupReport};
pub use usage::UsageIndex;

use std::path::Path;

/// Set up the labels of one repository from a labels directory
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use ghlabel::{RepoConfig, SetupOptions};
///
/// #[tokio::main]
/// async fn main() -> ghlabel::Result<()> {
///     let config = RepoConfig::new("your_github_token", "owner", "repo")?;
///     let options = SetupOptions {
///         preview: true,
///         ..Default::default()
///     };
///
///     let report = ghlabel::setup_repository_labels(&config, Path::new("labels"), &options).await?;
///     println!("Would create {} labels", report.plan.to_create.len());
///     Ok(())
/// }
/// ```
pub async fn setup_repository_labels(
    config: &RepoConfig,
    labels_dir: &Path,
    options: &SetupOptions,
) -> Result<SetupReport> {
    let client = GitHubClient::new(config)?;
    LabelReconciler::new(client)
        .setup(labels_dir, options)
        .await
}
