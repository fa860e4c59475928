//! Label Usage Scanning
//!
//! Finds which labels are attached to issues or pull requests, so that labels
//! still in use are not deleted by accident

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::Result;
use crate::github::{Issue, IssueFilter, LabelService};

/// Label name -> URLs of the issues and pull requests referencing it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageIndex {
    urls: BTreeMap<String, BTreeSet<String>>,
}

impl UsageIndex {
    /// Build an index from a list of issues
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut index = Self::default();
        for issue in issues {
            let url = issue.canonical_url();
            for label in &issue.labels {
                index.record(&label.name, url);
            }
        }
        index
    }

    /// Record that `label` is referenced by `url`
    pub fn record(&mut self, label: &str, url: &str) {
        self.urls
            .entry(label.to_string())
            .or_default()
            .insert(url.to_string());
    }

    /// URLs referencing `label`, if any
    pub fn urls(&self, label: &str) -> Option<&BTreeSet<String>> {
        self.urls.get(label)
    }

    /// Number of labels in use
    pub fn len(&self) -> usize {
        self.urls.len()
    }
}

/// Scan every issue and pull request, open or closed, for attached labels
///
/// # Errors
/// Returns an error if listing issues fails; the scan is never partial
pub async fn scan_usage<S: LabelService + ?Sized>(service: &S) -> Result<UsageIndex> {
    let issues = service.list_issues(&IssueFilter::default()).await?;
    let pull_requests = issues.iter().filter(|i| i.is_pull_request()).count();
    let index = UsageIndex::from_issues(&issues);
    debug!(
        issues = issues.len() - pull_requests,
        pull_requests,
        labels_in_use = index.len(),
        "Scanned issues for label usage"
    );

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{IssueLabel, PullRequestMarker};

    fn issue(url: &str, labels: &[&str]) -> Issue {
        Issue {
            html_url: url.to_string(),
            pull_request: None,
            labels: labels
                .iter()
                .map(|name| IssueLabel {
                    name: name.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_index_groups_urls_by_label() {
        let issues = vec![
            issue("https://github.com/o/r/issues/1", &["bug", "triage"]),
            issue("https://github.com/o/r/issues/2", &["bug"]),
            issue("https://github.com/o/r/issues/3", &[]),
        ];

        let index = UsageIndex::from_issues(&issues);
        assert_eq!(index.len(), 2);
        assert!(index.urls("docs").is_none());
        assert_eq!(index.urls("bug").map(BTreeSet::len), Some(2));
        assert_eq!(index.urls("triage").map(BTreeSet::len), Some(1));
    }

    #[test]
    fn test_pull_requests_use_their_own_url() {
        let mut pr = issue("https://github.com/o/r/issues/7", &["review"]);
        pr.pull_request = Some(PullRequestMarker {
            html_url: Some("https://github.com/o/r/pull/7".to_string()),
        });

        let index = UsageIndex::from_issues(&[pr]);
        let urls = index.urls("review").unwrap();
        assert!(urls.contains("https://github.com/o/r/pull/7"));
        assert!(!urls.contains("https://github.com/o/r/issues/7"));
    }

    #[test]
    fn test_label_names_are_case_sensitive() {
        let index = UsageIndex::from_issues(&[issue("https://github.com/o/r/issues/1", &["Bug"])]);
        assert!(index.urls("Bug").is_some());
        assert!(index.urls("bug").is_none());
    }
}
