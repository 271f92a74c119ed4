use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use jxdiff_diff::apply_patch_to;
use jxdiff_export::{to_csv, to_html_report, to_json_patch, to_unified_diff};
use jxdiff_types::{ChangeKind, DiffResult, DiffTreeNode, PatchOperation};
use jxdiff_worker::{DiffDispatcher, DispatchOutcome};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::cli::*;
use crate::config::CliConfig;

const DEFAULT_LEFT_TITLE: &str = "Source A";
const DEFAULT_RIGHT_TITLE: &str = "Source B";

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    match cli.command {
        Command::Diff(args) => cmd_diff(args, &config).await,
        Command::Apply(args) => cmd_apply(args),
    }
}

async fn cmd_diff(args: DiffArgs, config: &CliConfig) -> anyhow::Result<()> {
    let left_raw = read_input(&args.left)?;
    let right_raw = read_input(&args.right)?;
    let left = parse_document(&left_raw, &args.left)?;
    let right = parse_document(&right_raw, &args.right)?;

    let mut dispatch = config.dispatch_config();
    if args.unordered {
        dispatch.options.array_order_matters = false;
    }
    if args.ignore_type_diff {
        dispatch.options.ignore_type_diff = true;
    }
    debug!(options = ?dispatch.options, "comparing {} and {}", args.left.display(), args.right.display());

    let dispatcher = DiffDispatcher::new(dispatch);
    let payload = left_raw.len() + right_raw.len();
    let response = match dispatcher.submit_sized(left, right, payload).await? {
        DispatchOutcome::Completed(response) => response,
        DispatchOutcome::Superseded { id } => bail!("diff request {id} was superseded"),
    };
    let compute_ms = response.compute_time;
    let (result, tree) = match (response.diff_result, response.diff_tree, response.error) {
        (Some(result), Some(tree), _) => (result, tree),
        (_, _, Some(failure)) => bail!("diff failed: {}", failure.message),
        _ => bail!("diff worker returned no result"),
    };
    info!(compute_ms, changes = result.stats.total_changes(), "diff finished");

    let file_name = args
        .left
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file.json".into());
    let text = match args.export {
        ExportKind::Summary => render_summary(&result),
        ExportKind::Patch => to_json_patch(&result)?,
        ExportKind::Csv => to_csv(&result),
        ExportKind::Unified => to_unified_diff(&left_raw, &right_raw, &file_name),
        ExportKind::Html => to_html_report(
            &result,
            args.left_title.as_deref().unwrap_or(DEFAULT_LEFT_TITLE),
            args.right_title.as_deref().unwrap_or(DEFAULT_RIGHT_TITLE),
        ),
        ExportKind::Tree => render_json::<DiffTreeNode>(&tree)?,
        ExportKind::Changes => render_json::<DiffResult>(&result)?,
    };
    write_output(args.output.as_deref(), &text)
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let document = parse_document(&read_input(&args.document)?, &args.document)?;
    let patch_raw = read_input(&args.patch)?;
    let patch: Vec<PatchOperation> = from_json(&patch_raw)
        .with_context(|| format!("{} is not a JSON Patch", args.patch.display()))?;

    let patched = apply_patch_to(&document, &patch)?;
    info!(operations = patch.len(), "patch applied");
    write_output(args.output.as_deref(), &render_json(&patched)?)
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

/// Empty input stands for a `null` document.
fn parse_document(raw: &str, path: &Path) -> anyhow::Result<Value> {
    if raw.trim().is_empty() {
        return Ok(Value::Null);
    }
    from_json(raw).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Deserialize without serde_json's nesting limit, growing the stack on
/// demand so deeply nested input cannot overflow it.
fn from_json<T: DeserializeOwned>(raw: &str) -> serde_json::Result<T> {
    let mut de = serde_json::Deserializer::from_str(raw);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

fn render_json<T: serde::Serialize>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn render_summary(result: &DiffResult) -> String {
    let stats = &result.stats;
    if result.is_identical() {
        return format!("{} No differences.\n", "✓".green().bold());
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} added, {} removed, {} modified, {} unchanged",
        stats.added.to_string().green().bold(),
        stats.removed.to_string().red().bold(),
        stats.modified.to_string().yellow().bold(),
        stats.unchanged.to_string().dimmed(),
    );
    for change in result.changed() {
        let path = if change.path.is_empty() { "/" } else { change.path.as_str() };
        let _ = match change.kind {
            ChangeKind::Added => writeln!(out, "  {} {} {}", "+".green().bold(), path.bold(), short(change.new_value.as_ref()).green()),
            ChangeKind::Removed => writeln!(out, "  {} {} {}", "-".red().bold(), path.bold(), short(change.old_value.as_ref()).red()),
            ChangeKind::Modified => writeln!(
                out,
                "  {} {} {} → {}",
                "~".yellow().bold(),
                path.bold(),
                short(change.old_value.as_ref()).red(),
                short(change.new_value.as_ref()).green(),
            ),
            ChangeKind::Unchanged => Ok(()),
        };
    }
    out
}

/// Compact single-line rendering of a change value.
fn short(value: Option<&Value>) -> String {
    const MAX: usize = 60;
    let text = value.map(Value::to_string).unwrap_or_default();
    if text.chars().count() <= MAX {
        return text;
    }
    let mut cut: String = text.chars().take(MAX - 1).collect();
    cut.push('…');
    cut
}

fn write_output(path: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("cannot write {}", path.display()))?;
            println!("{} Wrote {}", "✓".green().bold(), path.display().to_string().bold());
        }
        None if text.ends_with('\n') => print!("{text}"),
        None => println!("{text}"),
    }
    Ok(())
}
