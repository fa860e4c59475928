//! Label Reconciliation
//!
//! Computes and applies the create/update/remove plan that brings the
//! repository labels in line with the label config, without deleting labels
//! that are still in use

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{dedupe_labels, load_desired_labels, load_remove_list, LabelRecord};
use crate::error::{Error, Result};
use crate::github::LabelService;
use crate::usage::{scan_usage, UsageIndex};

/// Which labels are considered for removal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemovalScope {
    /// The remove list, explicitly named labels, and (in strict mode) every
    /// remote label the config does not mention
    #[default]
    Configured,

    /// Every label currently on the repository
    All,

    /// Nothing is removed
    Skip,
}

/// Options for one setup run
#[derive(Debug, Clone, Default)]
pub struct SetupOptions {
    /// Remove remote labels that the config does not mention
    pub strict: bool,

    /// Compute and report the plan without changing anything
    pub preview: bool,

    /// Remove labels even when issues or pull requests use them
    pub force: bool,

    pub removal: RemovalScope,

    /// Labels to add on top of the config files
    pub add_labels: Vec<LabelRecord>,

    /// Labels to remove on top of the remove list
    pub remove_labels: BTreeSet<String>,
}

/// Loaded state: everything a plan is computed from
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Labels currently on the repository
    pub remote: Vec<LabelRecord>,

    /// Labels from the config files
    pub desired: Vec<LabelRecord>,

    /// Names from the `_remove` file
    pub remove_list: BTreeSet<String>,
}

impl Snapshot {
    pub fn remote_names(&self) -> BTreeSet<&str> {
        self.remote.iter().map(|label| label.name.as_str()).collect()
    }

    /// Config labels plus the extra labels in `options`
    pub fn desired_labels(&self, options: &SetupOptions) -> Vec<LabelRecord> {
        let mut labels = self.desired.clone();
        labels.extend(options.add_labels.iter().cloned());
        dedupe_labels(labels)
    }

    /// Names that should be removed before the usage check
    ///
    /// Only names present on the repository are returned.
    pub fn removal_candidates(&self, options: &SetupOptions) -> BTreeSet<String> {
        let remote = self.remote_names();
        let mut candidates: BTreeSet<String> = BTreeSet::new();

        match options.removal {
            RemovalScope::Skip => {}
            RemovalScope::All => {
                candidates.extend(remote.iter().map(|name| name.to_string()));
            }
            RemovalScope::Configured => {
                candidates.extend(self.remove_list.iter().cloned());
                candidates.extend(options.remove_labels.iter().cloned());

                if options.strict {
                    let desired: BTreeSet<String> = self
                        .desired_labels(options)
                        .into_iter()
                        .map(|label| label.name)
                        .collect();
                    candidates.extend(
                        remote
                            .iter()
                            .filter(|name| !desired.contains(**name))
                            .map(|name| name.to_string()),
                    );
                }
            }
        }

        candidates.retain(|name| {
            let present = remote.contains(name.as_str());
            if !present {
                debug!(label = %name, "Label not on the repository, nothing to remove");
            }
            present
        });
        candidates
    }
}

/// An update of an existing label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelUpdate {
    /// Name of the label on the repository, used as the lookup key
    pub current_name: String,

    /// The label as it is now
    pub current: LabelRecord,

    /// The label as it should be; a different name renames it
    pub desired: LabelRecord,
}

/// Diffed state: what a run will do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationPlan {
    pub to_create: Vec<LabelRecord>,

    pub to_update: Vec<LabelUpdate>,

    /// Removals that will execute
    pub to_remove: BTreeSet<String>,

    /// Removal candidates kept because issues or pull requests use them,
    /// with the URLs referencing each
    pub unsafe_to_remove: BTreeMap<String, BTreeSet<String>>,
}

impl ReconciliationPlan {
    /// Compute the plan
    ///
    /// `usage` is ignored when `options.force` is set.
    pub fn build(
        snapshot: &Snapshot,
        options: &SetupOptions,
        candidates: BTreeSet<String>,
        usage: &UsageIndex,
    ) -> Self {
        let mut plan = Self::default();

        for name in candidates {
            match usage.urls(&name) {
                Some(urls) if !options.force => {
                    plan.unsafe_to_remove.insert(name, urls.clone());
                }
                _ => {
                    plan.to_remove.insert(name);
                }
            }
        }

        // Removed names are free to be recreated in the same run
        let surviving: HashMap<&str, &LabelRecord> = snapshot
            .remote
            .iter()
            .filter(|label| !plan.to_remove.contains(&label.name))
            .map(|label| (label.name.as_str(), label))
            .collect();

        for desired in snapshot.desired_labels(options) {
            match surviving.get(desired.name.as_str()) {
                None => plan.to_create.push(desired),
                Some(current) if desired.differs_from(current) => {
                    plan.to_update.push(LabelUpdate {
                        current_name: current.name.clone(),
                        current: (*current).clone(),
                        desired,
                    });
                }
                Some(_) => {}
            }
        }

        plan
    }

    /// Whether the plan changes nothing
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_remove.is_empty()
    }
}

/// Kind of mutating action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Remove,
    Create,
    Update,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Action::Remove => "remove",
            Action::Create => "add",
            Action::Update => "update",
        };
        f.write_str(verb)
    }
}

/// A single action rejected by GitHub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub action: Action,
    pub name: String,
    pub reason: String,
}

/// Setup result
#[derive(Debug, Clone, Default)]
pub struct SetupReport {
    pub plan: ReconciliationPlan,

    /// Whether this was a preview
    pub preview: bool,

    pub removed: Vec<String>,

    pub created: Vec<String>,

    pub updated: Vec<String>,

    /// Actions that failed; the run continued past each of them
    pub failures: Vec<ItemFailure>,
}

impl SetupReport {
    /// A report for a plan that was only displayed
    pub fn preview(plan: ReconciliationPlan) -> Self {
        Self {
            plan,
            preview: true,
            ..Default::default()
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn record<T>(&mut self, action: Action, name: &str, outcome: Result<T>) -> Result<()> {
        match outcome {
            Ok(_) => {
                let done = match action {
                    Action::Remove => &mut self.removed,
                    Action::Create => &mut self.created,
                    Action::Update => &mut self.updated,
                };
                done.push(name.to_string());
                Ok(())
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) => {
                warn!(label = %name, %action, error = %e, "Label action failed");
                self.failures.push(ItemFailure {
                    action,
                    name: name.to_string(),
                    reason: e.to_string(),
                });
                Ok(())
            }
        }
    }
}

/// Label Reconciler
///
/// Drives one setup run against a [`LabelService`]
pub struct LabelReconciler<S> {
    service: S,
}

impl<S: LabelService> LabelReconciler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Load the config from `labels_dir` and fetch the repository labels
    ///
    /// # Errors
    /// Returns an error if the config is invalid or the labels cannot be listed
    pub async fn snapshot(&self, labels_dir: &Path) -> Result<Snapshot> {
        let desired = load_desired_labels(labels_dir)?;
        let remove_list = load_remove_list(labels_dir)?;
        let remote = self.service.list_labels().await?;
        debug!(
            remote = remote.len(),
            desired = desired.len(),
            remove_list = remove_list.len(),
            "Loaded label snapshot"
        );

        Ok(Snapshot {
            remote,
            desired,
            remove_list,
        })
    }

    /// Compute the plan for `snapshot`
    ///
    /// Issues are only scanned when something is to be removed without
    /// `force`.
    ///
    /// # Errors
    /// Returns an error if the usage scan fails
    pub async fn plan(
        &self,
        snapshot: &Snapshot,
        options: &SetupOptions,
    ) -> Result<ReconciliationPlan> {
        let candidates = snapshot.removal_candidates(options);

        let usage = if !candidates.is_empty() && !options.force {
            scan_usage(&self.service).await?
        } else {
            UsageIndex::default()
        };

        Ok(ReconciliationPlan::build(
            snapshot, options, candidates, &usage,
        ))
    }

    /// Execute `plan`: remove, then create, then update
    ///
    /// Rejected items are recorded and skipped. A label that is already gone
    /// when it is deleted counts as removed.
    ///
    /// # Errors
    /// Returns the first fatal error (timeout, auth), aborting the run
    pub async fn apply(&self, plan: ReconciliationPlan) -> Result<SetupReport> {
        let mut report = SetupReport::default();

        for name in &plan.to_remove {
            let outcome = match self.service.delete_label(name).await {
                Err(Error::NotFound { status: 404, .. }) => {
                    info!(label = %name, "Label already absent from the repository");
                    Ok(())
                }
                other => other,
            };
            report.record(Action::Remove, name, outcome)?;
        }

        for label in &plan.to_create {
            let outcome = self.service.create_label(label).await;
            report.record(Action::Create, &label.name, outcome)?;
        }

        for update in &plan.to_update {
            let outcome = self
                .service
                .update_label(&update.current_name, &update.desired)
                .await;
            report.record(Action::Update, &update.desired.name, outcome)?;
        }

        info!(
            removed = report.removed.len(),
            created = report.created.len(),
            updated = report.updated.len(),
            failed = report.failures.len(),
            "Label setup completed"
        );

        report.plan = plan;
        Ok(report)
    }

    /// Run a full setup: snapshot, plan, then preview or apply
    ///
    /// # Errors
    /// Returns an error on any fatal failure
    pub async fn setup(&self, labels_dir: &Path, options: &SetupOptions) -> Result<SetupReport> {
        let snapshot = self.snapshot(labels_dir).await?;
        let plan = self.plan(&snapshot, options).await?;

        if options.preview {
            return Ok(SetupReport::preview(plan));
        }

        self.apply(plan).await
    }
}
