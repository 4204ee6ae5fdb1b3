use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use mailframe_columns::{
    ATTR_ALIGN, ATTR_BACKGROUND, ATTR_COUNT, ATTR_PADDING, ColumnEditor, LayoutPolicy,
    column_group_block, column_traits, group_traits,
};
use mailframe_core::{Document, HtmlOptions, TreeHost, to_html};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use web_time::Instant;

use crate::error::{CliError, Result};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "MAILFRAME_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "mailframe",
    about = "Render and inspect mailframe column sections",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the email HTML of a freshly built column section.
    Render(RenderArgs),

    /// Print the group and column trait descriptors as JSON.
    Traits(TraitsArgs),

    /// Load and validate a layout policy file.
    #[command(name = "check-policy")]
    CheckPolicy(CheckPolicyArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct RenderArgs {
    /// Number of columns (clamped to the policy's range).
    #[arg(long)]
    pub columns: Option<String>,

    /// Vertical alignment: top, middle or bottom.
    #[arg(long)]
    pub align: Option<String>,

    /// Padding inside each column, in pixels.
    #[arg(long)]
    pub padding: Option<String>,

    /// Background color of every column.
    #[arg(long)]
    pub background: Option<String>,

    /// Layout policy file (.toml or .json).
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Emit data-gjs-type so the markup can be loaded back into the editor.
    #[arg(long)]
    pub with_types: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct TraitsArgs {
    /// Layout policy file (.toml or .json).
    #[arg(long)]
    pub policy: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct CheckPolicyArgs {
    /// Policy file to check.
    pub file: PathBuf,
}

/// Install the stderr log subscriber, filtered by `MAILFRAME_LOG`
/// (default `warn`). A second call is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run_from_env() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    let output = match cli.command {
        Commands::Render(args) => render(&args)?,
        Commands::Traits(args) => traits_json(&args)?,
        Commands::CheckPolicy(args) => check_policy(&args.file)?,
    };
    println!("{output}");
    Ok(())
}

/// Load a policy, picking the format from the file extension.
pub fn load_policy(path: &Path) -> Result<LayoutPolicy> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let loaded = match extension.as_deref() {
        Some("toml") => LayoutPolicy::from_toml_file(path),
        Some("json") => LayoutPolicy::from_json_file(path),
        _ => {
            return Err(CliError::UnsupportedPolicyFormat {
                path: path.to_path_buf(),
            });
        }
    };
    loaded.map_err(|source| CliError::policy(path, source))
}

fn policy_or_default(path: Option<&Path>) -> Result<LayoutPolicy> {
    path.map_or_else(|| Ok(LayoutPolicy::default()), load_policy)
}

/// Build a column section in a scratch document, the same way the editor
/// does when the block is dropped and its traits are edited, and export it.
pub fn render(args: &RenderArgs) -> Result<String> {
    let policy = policy_or_default(args.policy.as_deref())?;
    let settle = policy.group_debounce().max(policy.column_debounce());
    let mut doc = Document::new();
    let mut editor = ColumnEditor::new(policy);
    let t0 = Instant::now();

    let root = doc.root();
    let group = doc
        .append_child(root, column_group_block(editor.layout().policy()))
        .ok_or_else(|| CliError::invalid("document root rejected the column block"))?;
    editor.handle_events(&mut doc, t0);

    let edits = [
        (ATTR_COUNT, &args.columns),
        (ATTR_ALIGN, &args.align),
        (ATTR_PADDING, &args.padding),
        (ATTR_BACKGROUND, &args.background),
    ];
    for (name, raw) in edits {
        if let Some(raw) = raw {
            let written = editor.layout().set_trait(&mut doc, group, name, raw);
            debug!(trait_name = name, raw = %raw, ?written, "trait set");
        }
    }
    editor.handle_events(&mut doc, t0);
    let done = editor.tick(&mut doc, t0 + settle + Duration::from_millis(1));
    debug!(operations = done.len(), "section settled");

    let options = HtmlOptions::default().with_component_types(args.with_types);
    Ok(to_html(&doc, group, &options))
}

/// Group and column trait descriptors as pretty JSON.
pub fn traits_json(args: &TraitsArgs) -> Result<String> {
    let policy = policy_or_default(args.policy.as_deref())?;
    let value = serde_json::json!({
        "group": group_traits(&policy),
        "column": column_traits(),
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Validate a policy file and echo the effective policy as TOML.
pub fn check_policy(path: &Path) -> Result<String> {
    let policy = load_policy(path)?;
    let toml = policy
        .to_toml_string()
        .map_err(|source| CliError::policy(path, source))?;
    Ok(format!("# {} is valid\n{toml}", path.display()))
}
