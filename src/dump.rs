//! Starter Label Templates
//!
//! Writes ready-to-edit label config files for `ghlabel setup`

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::config::LabelFileFormat;
use crate::error::Result;

/// A label as written to a starter file
///
/// Colors keep their `#` prefix; the loader strips it.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct TemplateLabel {
    pub name: &'static str,

    pub color: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

const fn label(
    name: &'static str,
    color: &'static str,
    description: Option<&'static str>,
) -> TemplateLabel {
    TemplateLabel {
        name,
        color,
        description,
    }
}

/// GitHub's stock labels, replaced by the starter set
pub const REMOVE_LABELS: &[&str] = &[
    "bug",
    "dependencies",
    "documentation",
    "duplicate",
    "enhancement",
    "github_actions",
    "help wanted",
    "invalid",
    "python",
    "question",
    "wontfix",
];

const DEFAULT_LABELS: &[TemplateLabel] = &[label(
    "good first issue",
    "#7057ff",
    Some("Good for newcomers."),
)];

const PRIORITY_LABELS: &[TemplateLabel] = &[
    label("Priority: Critical", "#7c0a02", None),
    label("Priority: High", "#b22222", None),
    label("Priority: Medium", "#ff8597", None),
    label("Priority: Low", "#ffccc9", None),
];

const TYPE_LABELS: &[TemplateLabel] = &[
    label("Type: Bug", "#ff9900", Some("Something isn't working.")),
    label(
        "Type: Documentation",
        "#ff9900",
        Some("Improvements or additions to documentation."),
    ),
    label(
        "Type: Feature Request",
        "#ff9900",
        Some("Issue describes a feature or enhancement we'd like to implement."),
    ),
    label(
        "Type: Question",
        "#ff9900",
        Some("This issue doesn't require code. A question needs an answer."),
    ),
    label(
        "Type: Refactor/Clean-up",
        "#ff9900",
        Some("Issues related to reorganization/clean-up of data or code (e.g. for maintainability)."),
    ),
    label("Type: Suggestion", "#ff9900", None),
];

const STATE_LABELS: &[TemplateLabel] = &[
    label(
        "State: Blocked",
        "#e07bf9",
        Some("Work has stopped, waiting for something (Info, Dependent fix, etc. See comments)."),
    ),
    label(
        "State: In Review",
        "#e07bf9",
        Some("This issue is waiting for review to finish."),
    ),
    label(
        "State: Work In Progress",
        "#e07bf9",
        Some("This issue is being actively worked on."),
    ),
];

const CLOSE_LABELS: &[TemplateLabel] = &[
    label("Close: Answered", "#cdd1d5", None),
    label(
        "Close: Backlog",
        "#cdd1d5",
        Some("Issues are stale/expired; sent to backlog for later re-evaluation."),
    ),
    label(
        "Close: Duplicate",
        "#cdd1d5",
        Some("This issue or pull request already exists (see comments for pointer to it)."),
    ),
    label("Close: Not Actionable", "#cdd1d5", None),
    label(
        "Close: Not Reproducible",
        "#cdd1d5",
        Some("Closed because we cannot reproduce the issue."),
    ),
    label(
        "Close: Will Not Fix",
        "#cdd1d5",
        Some("Closed because we have decided not to address this (e.g. out of scope)."),
    ),
];

const NEEDS_LABELS: &[TemplateLabel] = &[
    label(
        "Needs: Breakdown",
        "#0052cc",
        Some("This big issue needs a checklist or subissues to describe a breakdown of work."),
    ),
    label("Needs: Designs", "#0052cc", None),
    label(
        "Needs: Detail",
        "#0052cc",
        Some("Submitter needs to provide more detail for this issue to be assessed (see comments)."),
    ),
    label(
        "Needs: Feedback",
        "#0052cc",
        Some("A proposed feature or bug resolution needs feedback prior to forging ahead."),
    ),
    label(
        "Needs: Help",
        "#0052cc",
        Some("Issues, typically substantial ones, that need a dedicated developer to take them on."),
    ),
    label(
        "Needs: Investigation",
        "#0052cc",
        Some("This issue/PR needs a root-cause analysis to determine a solution."),
    ),
    label(
        "Needs: Response",
        "#0052cc",
        Some("Issues which require feedback from staff members."),
    ),
    label(
        "Needs: Review",
        "#0052cc",
        Some("This issue/PR needs to be reviewed in order to be closed or merged (see comments)"),
    ),
    label(
        "Needs: Revisiting",
        "#0052cc",
        Some("Archived (usually noisy dependencies)."),
    ),
    label(
        "Needs: Submitter Input",
        "#0052cc",
        Some("Waiting on input from the creator of the issue/pr."),
    ),
    label("Needs: Testing", "#0052cc", None),
    label(
        "Needs: Triage",
        "#0052cc",
        Some("This issue needs triage. The team needs to decide who should own it, what to do, by when."),
    ),
];

const AFFECTS_LABELS: &[TemplateLabel] = &[
    label(
        "Affects: Infra",
        "#fbbc9d",
        Some("Related to configuration, automation, CI, etc."),
    ),
    label("Affects: Project Management", "#fbbc9d", None),
];

const GAME_AFFECTS_LABELS: &[TemplateLabel] = &[
    label(
        "Affects: Game Assets",
        "#fbbc9d",
        Some("Issues relating directly to art and game assets."),
    ),
    label(
        "Affects: Game Logic/Controls",
        "#fbbc9d",
        Some("Issues relating directly to game logic and controls."),
    ),
    label(
        "Affects: Game Performance",
        "#fbbc9d",
        Some("Issues relating directly to squeezing game performance."),
    ),
    label(
        "Affects: Game Rendering",
        "#fbbc9d",
        Some("Issues relating directly to game rendering."),
    ),
    label(
        "Affects: Player Experience",
        "#fbbc9d",
        Some("Issues relating directly to game design & player experience."),
    ),
];

/// Kind of project the starter labels are for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Template {
    #[default]
    App,
    Game,
    Web,
}

impl Template {
    /// Label groups in file order, keyed by group name
    pub fn groups(self) -> Vec<(&'static str, Vec<TemplateLabel>)> {
        let mut affects = AFFECTS_LABELS.to_vec();
        if self == Template::Game {
            affects.extend_from_slice(GAME_AFFECTS_LABELS);
        }

        vec![
            ("default", DEFAULT_LABELS.to_vec()),
            ("priority", PRIORITY_LABELS.to_vec()),
            ("type", TYPE_LABELS.to_vec()),
            ("state", STATE_LABELS.to_vec()),
            ("close", CLOSE_LABELS.to_vec()),
            ("needs", NEEDS_LABELS.to_vec()),
            ("affects", affects),
        ]
    }
}

/// Options for [`dump_labels`]
#[derive(Debug, Clone, Copy)]
pub struct DumpOptions {
    /// Delete every file in the directory first
    pub new: bool,

    pub format: LabelFileFormat,

    pub template: Template,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            new: true,
            format: LabelFileFormat::Yaml,
            template: Template::App,
        }
    }
}

/// Create `dir` and delete the regular files inside it
fn init_dir(dir: &Path) -> Result<()> {
    info!(dir = %dir.display(), "Initializing labels dir");
    std::fs::create_dir_all(dir)?;

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

fn render<T: Serialize + ?Sized>(value: &T, format: LabelFileFormat) -> Result<String> {
    Ok(match format {
        LabelFileFormat::Yaml => serde_yaml::to_string(value)?,
        LabelFileFormat::Json => serde_json::to_string_pretty(value)? + "\n",
    })
}

/// Write the starter label files into `dir`
///
/// # Returns
/// Paths of the files written, the remove list first
///
/// # Errors
/// If the directory cannot be prepared or a file cannot be written
pub fn dump_labels(dir: &Path, options: DumpOptions) -> Result<Vec<PathBuf>> {
    if options.new {
        init_dir(dir)?;
    } else {
        std::fs::create_dir_all(dir)?;
    }

    let ext = options.format.extension();
    let mut written = Vec::new();

    let remove_path = dir.join(format!("_remove_labels.{ext}"));
    debug!(file = %remove_path.display(), "Dumping labels");
    std::fs::write(&remove_path, render(REMOVE_LABELS, options.format)?)?;
    written.push(remove_path);

    for (group, labels) in options.template.groups() {
        let path = dir.join(format!("{group}_labels.{ext}"));
        debug!(file = %path.display(), "Dumping labels");
        std::fs::write(&path, render(&labels, options.format)?)?;
        written.push(path);
    }

    info!(files = written.len(), "Finished dumping of labels");
    Ok(written)
}
