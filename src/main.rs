//! ghlabel CLI
//!
//! Command line tool for setting up GitHub repository labels

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use dialoguer::Confirm;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ghlabel::{
    config::{
        parse_label_arg, parse_label_names, resolve_repo_config, CredentialArgs, DotEnv,
        LabelFileFormat,
    },
    dump::{dump_labels, DumpOptions, Template},
    sync::{RemovalScope, SetupReport},
    GitHubClient, LabelReconciler, LabelRecord, LabelService, ReconciliationPlan, RepoConfig,
    Result, SetupOptions,
};

/// ghlabel CLI
///
/// Set up GitHub labels from yaml/json config files
#[derive(Parser)]
#[command(
    name = "ghlabel",
    version,
    about = "Setup Github Labels from a yaml/json config file",
    long_about = "Add, update, and remove GitHub repository labels from yaml/json config files. \
    Labels still attached to issues or pull requests are kept unless removal is forced."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug mode and show logs
    #[arg(short = 'D', long, global = true)]
    debug: bool,
}

/// Repository credentials; each falls back to the environment, then `.env`
#[derive(Args, Debug, Default)]
struct RepoArgs {
    /// GitHub access token [env: GITHUB_TOKEN]
    #[arg(value_name = "TOKEN")]
    token: Option<String>,

    /// Repository owner [env: GITHUB_REPO_OWNER]
    #[arg(value_name = "REPO_OWNER")]
    repo_owner: Option<String>,

    /// Repository name [env: GITHUB_REPO_NAME]
    #[arg(value_name = "REPO_NAME")]
    repo_name: Option<String>,
}

impl From<RepoArgs> for CredentialArgs {
    fn from(args: RepoArgs) -> Self {
        CredentialArgs {
            token: args.token,
            owner: args.repo_owner,
            repo: args.repo_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RemoveAllArg {
    Disable,
    Enable,
    Silent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ExtArg {
    Yaml,
    Json,
}

impl From<ExtArg> for LabelFileFormat {
    fn from(ext: ExtArg) -> Self {
        match ext {
            ExtArg::Yaml => LabelFileFormat::Yaml,
            ExtArg::Json => LabelFileFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AppArg {
    App,
    Game,
    Web,
}

impl From<AppArg> for Template {
    fn from(app: AppArg) -> Self {
        match app {
            AppArg::App => Template::App,
            AppArg::Game => Template::Game,
            AppArg::Web => Template::Web,
        }
    }
}

#[derive(Args, Debug)]
struct SetupArgs {
    #[command(flatten)]
    repo: RepoArgs,

    /// Directory where to find labels
    #[arg(short = 'd', long, default_value = "labels")]
    directory: PathBuf,

    /// Dry run and preview result before adding/removing labels from repo
    #[arg(short, long)]
    preview: bool,

    /// Strictly mirror Github labels from labels config
    #[arg(short, long)]
    strict: bool,

    /// Add more Github labels (JSON list of label objects)
    #[arg(short = 'a', long)]
    add_labels: Option<String>,

    /// Remove more Github labels (comma separated names)
    #[arg(short = 'r', long)]
    remove_labels: Option<String>,

    /// Remove all Github labels
    #[arg(short = 'R', long, value_enum, default_value_t = RemoveAllArg::Disable)]
    remove_all: RemoveAllArg,

    /// Remove labels even if they are in use on issues or pull requests
    #[arg(short = 'f', long = "force-remove")]
    force: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Add/Remove Github labels from config files
    Setup(SetupArgs),

    /// Generate starter labels config files
    Dump {
        /// Directory where to write labels
        #[arg(short = 'd', long, default_value = "labels")]
        dir: PathBuf,

        /// Keep existing files in the labels dir
        #[arg(short = 'N', long)]
        keep_old_labels: bool,

        /// Label file extension
        #[arg(short = 'e', long, value_enum, default_value_t = ExtArg::Yaml)]
        ext: ExtArg,

        /// App to determine label template
        #[arg(short = 'a', long, value_enum, default_value_t = AppArg::App)]
        app: AppArg,
    },

    /// Display current labels
    List {
        #[command(flatten)]
        repo: RepoArgs,

        /// Output format
        #[arg(long, default_value = "table", value_parser = ["table", "json", "yaml"])]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(e) = run(cli.command).await {
        eprintln!("\n  [{}]: {}\n", "Error".red(), e);
        std::process::exit(1);
    }
}

/// Logs go to stderr; `RUST_LOG` overrides the `--debug` flag
fn init_tracing(debug: bool) {
    let default_directive = if debug { "ghlabel=debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Setup(args) => run_setup(args).await,
        Commands::Dump {
            dir,
            keep_old_labels,
            ext,
            app,
        } => run_dump(dir, keep_old_labels, ext, app),
        Commands::List { repo, format } => run_list(repo, format).await,
    }
}

fn load_repo_config(repo: RepoArgs) -> Result<RepoConfig> {
    let dotenv = DotEnv::load(&DotEnv::default_path())?;
    resolve_repo_config(repo.into(), |key| std::env::var(key).ok(), &dotenv)
}

/// Map `--remove-all` to a removal scope, asking before removing everything
fn removal_scope(remove_all: RemoveAllArg, preview: bool) -> Result<RemovalScope> {
    Ok(match remove_all {
        RemoveAllArg::Disable => RemovalScope::Configured,
        RemoveAllArg::Silent => RemovalScope::All,
        RemoveAllArg::Enable if preview => RemovalScope::All,
        RemoveAllArg::Enable => {
            println!(
                "[{}] This action will {} all labels in the repository.",
                "WARNING".yellow(),
                "remove".red()
            );
            let confirmed = Confirm::new()
                .with_prompt("Are you sure you want to continue?")
                .default(false)
                .interact()?;
            if confirmed {
                RemovalScope::All
            } else {
                RemovalScope::Skip
            }
        }
    })
}

/// Execute setup command
async fn run_setup(args: SetupArgs) -> Result<()> {
    let config = load_repo_config(args.repo)?;

    let add_labels = args
        .add_labels
        .as_deref()
        .map(parse_label_arg)
        .transpose()?
        .unwrap_or_default();
    let remove_labels = args
        .remove_labels
        .as_deref()
        .map(parse_label_names)
        .unwrap_or_default();

    let options = SetupOptions {
        strict: args.strict,
        preview: args.preview,
        force: args.force,
        removal: removal_scope(args.remove_all, args.preview)?,
        add_labels,
        remove_labels,
    };

    let reconciler = LabelReconciler::new(GitHubClient::new(&config)?);
    let report = reconciler.setup(&args.directory, &options).await?;

    let mut out = std::io::stdout().lock();
    if report.preview {
        display_preview(&mut out, &config.slug(), &report.plan)?;
    } else {
        display_applied(&mut out, &report)?;
    }
    display_unsafe_to_remove(&mut out, &report.plan)?;
    drop(out);

    if report.has_failures() {
        eprintln!("  {} Some labels could not be set up:", "✗".red());
        for failure in &report.failures {
            eprintln!(
                "    - {} `{}`: {}",
                failure.action,
                failure.name,
                failure.reason.red()
            );
        }
        std::process::exit(1);
    }

    if !report.preview {
        println!(
            "{} setup github labels from config to repo `{}`.",
            "Successfully".green(),
            config.slug()
        );
    }

    Ok(())
}

/// Execute dump command
fn run_dump(dir: PathBuf, keep_old_labels: bool, ext: ExtArg, app: AppArg) -> Result<()> {
    let options = DumpOptions {
        new: !keep_old_labels,
        format: ext.into(),
        template: app.into(),
    };
    dump_labels(&dir, options)?;

    println!(
        "{} dumped labels config to `{}`.",
        "Successfully".green(),
        dir.display()
    );
    Ok(())
}

/// Execute list command
async fn run_list(repo: RepoArgs, format: String) -> Result<()> {
    let config = load_repo_config(repo)?;
    let client = GitHubClient::new(&config)?;
    let labels = client.list_labels().await?;

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&labels)?),
        "yaml" => print!("{}", serde_yaml::to_string(&labels)?),
        _ => {
            println!(
                "{:<30} {:<8} {:<50}",
                "Name".cyan(),
                "Color".cyan(),
                "Description".cyan()
            );
            println!("{}", "─".repeat(90));

            for label in labels {
                println!(
                    "{:<30} {:<8} {:<50}",
                    label.name,
                    format!("#{}", label.color),
                    label.description
                );
            }
        }
    }

    Ok(())
}

fn describe(label: &LabelRecord) -> String {
    if label.description.is_empty() {
        format!("{} (#{})", label.name, label.color)
    } else {
        format!("{} (#{}): {}", label.name, label.color, label.description)
    }
}

/// Render what a setup run would do
fn display_preview<W: Write>(
    out: &mut W,
    repository: &str,
    plan: &ReconciliationPlan,
) -> Result<()> {
    writeln!(
        out,
        "\n  {}{}{}\n",
        "Preview [".bold().green(),
        repository,
        "]".bold().green()
    )?;

    writeln!(out, "  will {} the following labels:", "remove".red())?;
    if plan.to_remove.is_empty() {
        writeln!(out, "    None")?;
    }
    for name in &plan.to_remove {
        writeln!(out, "    - {}", name)?;
    }
    writeln!(out)?;

    writeln!(out, "  will {} the following labels:", "add".cyan())?;
    if plan.to_create.is_empty() {
        writeln!(out, "    None")?;
    }
    for label in &plan.to_create {
        writeln!(out, "    - {}", describe(label))?;
    }
    writeln!(out)?;

    writeln!(out, "  will {} the following labels:", "update".yellow())?;
    if plan.to_update.is_empty() {
        writeln!(out, "    None")?;
    }
    for update in &plan.to_update {
        writeln!(out, "    {}", format!("- {}", describe(&update.current)).red())?;
        writeln!(out, "    {}", format!("+ {}", describe(&update.desired)).green())?;
    }
    writeln!(out)?;
    Ok(())
}

/// Render what a setup run did
fn display_applied<W: Write>(out: &mut W, report: &SetupReport) -> Result<()> {
    writeln!(out)?;
    for name in &report.removed {
        writeln!(out, "  {} Label `{}`", "Removed".red(), name)?;
    }
    for name in &report.created {
        writeln!(out, "  {} Label `{}`", "Added".cyan(), name)?;
    }
    for name in &report.updated {
        writeln!(out, "  {} Label `{}`", "Updated".yellow(), name)?;
    }
    if report.removed.is_empty() && report.created.is_empty() && report.updated.is_empty() {
        writeln!(out, "  {} No changes required", "✓".green())?;
    }
    writeln!(out)?;
    Ok(())
}

/// Render labels kept because issues or pull requests use them
fn display_unsafe_to_remove<W: Write>(out: &mut W, plan: &ReconciliationPlan) -> Result<()> {
    if plan.unsafe_to_remove.is_empty() {
        return Ok(());
    }

    writeln!(out, "  The following labels are not {}:", "removed".red())?;
    for (name, urls) in &plan.unsafe_to_remove {
        let urls: Vec<&str> = urls.iter().map(String::as_str).collect();
        writeln!(out, "    - {} [{}]", name, urls.join(", "))?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use ghlabel::sync::LabelUpdate;
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_setup_flags() {
        let cli = Cli::try_parse_from([
            "ghlabel", "-D", "setup", "tok", "owner", "repo", "-d", "my-labels", "-p", "-s",
            "-f", "-r", "bug,wontfix", "-R", "silent",
        ])
        .unwrap();
        assert!(cli.debug);

        let Commands::Setup(args) = cli.command else {
            panic!("expected setup command");
        };
        assert_eq!(args.repo.token.as_deref(), Some("tok"));
        assert_eq!(args.repo.repo_owner.as_deref(), Some("owner"));
        assert_eq!(args.repo.repo_name.as_deref(), Some("repo"));
        assert_eq!(args.directory, PathBuf::from("my-labels"));
        assert!(args.preview && args.strict && args.force);
        assert_eq!(args.remove_labels.as_deref(), Some("bug,wontfix"));
        assert_eq!(args.remove_all, RemoveAllArg::Silent);
    }

    #[test]
    fn test_parse_setup_defaults() {
        let cli = Cli::try_parse_from(["ghlabel", "setup"]).unwrap();
        let Commands::Setup(args) = cli.command else {
            panic!("expected setup command");
        };
        assert!(args.repo.token.is_none());
        assert_eq!(args.directory, PathBuf::from("labels"));
        assert!(!args.preview && !args.strict && !args.force);
        assert_eq!(args.remove_all, RemoveAllArg::Disable);
    }

    #[test]
    fn test_parse_dump_flags() {
        let cli =
            Cli::try_parse_from(["ghlabel", "dump", "-N", "-e", "json", "-a", "game"]).unwrap();
        let Commands::Dump {
            dir,
            keep_old_labels,
            ext,
            app,
        } = cli.command
        else {
            panic!("expected dump command");
        };
        assert_eq!(dir, PathBuf::from("labels"));
        assert!(keep_old_labels);
        assert_eq!(ext, ExtArg::Json);
        assert_eq!(app, AppArg::Game);
    }

    #[test]
    fn test_removal_scope_without_prompt() {
        assert_eq!(
            removal_scope(RemoveAllArg::Disable, false).unwrap(),
            RemovalScope::Configured
        );
        assert_eq!(
            removal_scope(RemoveAllArg::Silent, false).unwrap(),
            RemovalScope::All
        );
        assert_eq!(
            removal_scope(RemoveAllArg::Enable, true).unwrap(),
            RemovalScope::All
        );
    }

    #[test]
    fn test_run_dump_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("labels");
        run_dump(target.clone(), false, ExtArg::Yaml, AppArg::App).unwrap();
        assert!(target.join("_remove_labels.yaml").exists());
    }

    fn sample_plan() -> ReconciliationPlan {
        ReconciliationPlan {
            to_create: vec![LabelRecord::new("feature", "#0000ff", "New feature")],
            to_update: vec![LabelUpdate {
                current_name: "bug".to_string(),
                current: LabelRecord::new("bug", "ff0000", ""),
                desired: LabelRecord::new("bug", "00ff00", ""),
            }],
            to_remove: BTreeSet::from(["old".to_string()]),
            unsafe_to_remove: BTreeMap::from([(
                "stale".to_string(),
                BTreeSet::from(["https://github.com/o/r/issues/1".to_string()]),
            )]),
        }
    }

    fn render<F>(display: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut out = Vec::new();
        display(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_display_preview_lists_each_section() {
        let text = render(|out| display_preview(out, "owner/repo", &sample_plan()));
        assert!(text.contains("owner/repo"));
        assert_eq!(text.matches("the following labels:").count(), 3);
        assert!(text.contains("    - old\n"));
        assert!(text.contains("    - feature (#0000ff): New feature\n"));
        assert!(text.contains("- bug (#ff0000)"));
        assert!(text.contains("+ bug (#00ff00)"));
        assert!(!text.contains("None"));
    }

    #[test]
    fn test_display_preview_empty_plan() {
        let text =
            render(|out| display_preview(out, "owner/repo", &ReconciliationPlan::default()));
        assert_eq!(text.matches("    None\n").count(), 3);
    }

    #[test]
    fn test_display_unsafe_to_remove() {
        let text = render(|out| display_unsafe_to_remove(out, &sample_plan()));
        assert!(text.contains("    - stale [https://github.com/o/r/issues/1]\n"));

        let empty =
            render(|out| display_unsafe_to_remove(out, &ReconciliationPlan::default()));
        assert!(empty.is_empty());
    }

    #[test]
    fn test_display_applied() {
        let report = SetupReport {
            plan: sample_plan(),
            removed: vec!["old".to_string()],
            created: vec!["feature".to_string()],
            updated: vec!["bug".to_string()],
            ..Default::default()
        };
        let text = render(|out| display_applied(out, &report));
        assert!(text.contains("Label `old`"));
        assert!(text.contains("Label `feature`"));
        assert!(text.contains("Label `bug`"));
        assert!(!text.contains("No changes required"));

        let unchanged = render(|out| display_applied(out, &SetupReport::default()));
        assert!(unchanged.contains("No changes required"));
    }

    #[test]
    fn test_describe_label() {
        assert_eq!(
            describe(&LabelRecord::new("bug", "ff0000", "")),
            "bug (#ff0000)"
        );
        assert_eq!(
            describe(&LabelRecord::new("bug", "ff0000", "Broken")),
            "bug (#ff0000): Broken"
        );
    }
}
