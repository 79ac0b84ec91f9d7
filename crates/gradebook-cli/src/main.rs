use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use gradebook_analysis::observation::observe_tool_use;
use gradebook_analysis::oracle::{CommandOracle, GuardedOracle, OraclePolicy, ReasoningOracle};
use gradebook_analysis::parsers::parse_file;
use gradebook_analysis::reporting::{self, create_reporter, Grouping};
use gradebook_analysis::rules::record_shape::find_shape_violations;
use gradebook_analysis::{evaluate_file, RuleSettings};
use gradebook_core::config::{CliOverrides, GradebookConfig};
use gradebook_core::errors::{GradebookError, GradebookErrorCode};
use gradebook_core::{EvalResult, EvalRun, EvalRunRecord, TokenUsage};
use gradebook_storage::Ledger;

#[derive(Parser)]
#[command(name = "gradebook")]
#[command(about = "Grade generated Python against style rules and track pass rates by revision", long_about = None)]
struct Cli {
    /// Ledger database path (overrides config).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Directory holding gradebook.toml; relative ledger paths resolve here.
    #[arg(long, global = true)]
    config_root: Option<PathBuf>,
    /// Shell command used as the reasoning oracle (overrides config).
    #[arg(long, global = true)]
    oracle: Option<String>,
    /// Per-attempt oracle timeout in seconds.
    #[arg(long, global = true)]
    oracle_timeout: Option<u64>,
    /// Disable ANSI colors in console reports.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade one file and print the rule outcomes as JSON.
    Check {
        file: PathBuf,
        /// Also list each map-typed signature on stderr.
        #[arg(long)]
        explain: bool,
    },
    /// Grade one file and append the run to the ledger.
    Record {
        file: PathBuf,
        /// Revision id the candidate was generated at.
        #[arg(long)]
        revision: String,
        /// File holding the working-copy diff; omitted means an empty diff.
        #[arg(long)]
        diff_file: Option<PathBuf>,
        /// Model identifier (defaults to the configured default model).
        #[arg(long)]
        model: Option<String>,
        /// Wall-clock duration of the run, in seconds.
        #[arg(long, default_value_t = 0.0)]
        duration: f64,
        #[arg(long, default_value_t = 0)]
        input_tokens: i64,
        #[arg(long, default_value_t = 0)]
        cache_read_tokens: i64,
        #[arg(long, default_value_t = 0)]
        cache_creation_tokens: i64,
        #[arg(long, default_value_t = 0)]
        output_tokens: i64,
        /// The agent invoked the service-writing skill.
        #[arg(long)]
        used_skill: bool,
        /// Working directory recorded with the run (defaults to the current one).
        #[arg(long)]
        cwd: Option<PathBuf>,
    },
    /// List stored runs, newest first.
    List {
        #[arg(long)]
        revision: Option<String>,
    },
    /// Print one stored run as JSON.
    Show { id: i64 },
    /// Delete one stored run.
    Delete { id: i64 },
    /// Delete every stored run.
    Clear,
    /// Per-rule pass rates.
    Stats {
        #[arg(long, value_enum, default_value_t = GroupBy::Revision)]
        by: GroupBy,
        #[arg(long, default_value = "console")]
        format: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupBy {
    Revision,
    Model,
}

impl From<GroupBy> for Grouping {
    fn from(by: GroupBy) -> Self {
        match by {
            GroupBy::Revision => Grouping::Revision,
            GroupBy::Model => Grouping::Model,
        }
    }
}

fn main() -> ExitCode {
    gradebook_core::tracing::init_tracing();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match error_code(&e) {
                Some(code) => eprintln!("error: [{code}] {e:#}"),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Stable code of the first library error in the chain, if any.
///
/// Library errors enter the chain as [`GradebookError`].
fn error_code(err: &anyhow::Error) -> Option<&'static str> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<GradebookError>())
        .map(GradebookError::error_code)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let root = match &cli.config_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let overrides = CliOverrides {
        ledger_path: cli.db.clone(),
        oracle_command: cli.oracle.clone(),
        oracle_timeout_secs: cli.oracle_timeout,
        report_color: cli.no_color.then_some(false),
    };
    let config = GradebookConfig::load(&root, Some(&overrides)).map_err(GradebookError::from)?;

    match &cli.command {
        Commands::Check { file, explain } => cmd_check(&config, file, *explain),
        Commands::Record {
            file,
            revision,
            diff_file,
            model,
            duration,
            input_tokens,
            cache_read_tokens,
            cache_creation_tokens,
            output_tokens,
            used_skill,
            cwd,
        } => {
            let usage = TokenUsage {
                input_tokens: *input_tokens,
                cache_read_input_tokens: *cache_read_tokens,
                cache_creation_input_tokens: *cache_creation_tokens,
                output_tokens: *output_tokens,
            };
            let request = RecordRequest {
                file,
                revision,
                diff_file: diff_file.as_deref(),
                model: model.as_deref(),
                duration: *duration,
                usage,
                used_skill: *used_skill,
                cwd: cwd.as_deref(),
            };
            with_ledger(&config, &root, |ledger| cmd_record(&config, ledger, request))
        }
        Commands::List { revision } => {
            with_ledger(&config, &root, |ledger| cmd_list(ledger, revision.as_deref()))
        }
        Commands::Show { id } => with_ledger(&config, &root, |ledger| cmd_show(ledger, *id)),
        Commands::Delete { id } => with_ledger(&config, &root, |ledger| cmd_delete(ledger, *id)),
        Commands::Clear => with_ledger(&config, &root, cmd_clear),
        Commands::Stats { by, format } => {
            with_ledger(&config, &root, |ledger| cmd_stats(&config, ledger, *by, format))
        }
    }
}

/// Open the configured ledger, run `f`, and close it even if `f` failed.
fn with_ledger<F>(config: &GradebookConfig, root: &Path, f: F) -> anyhow::Result<()>
where
    F: FnOnce(&Ledger) -> anyhow::Result<()>,
{
    let path = config.ledger.effective_path();
    let path = if path.is_absolute() {
        path
    } else {
        root.join(path)
    };
    let ledger = Ledger::open(&path);
    let outcome = f(&ledger);
    let closed = ledger.close().map_err(GradebookError::from);
    outcome?;
    closed.with_context(|| format!("closing ledger {}", path.display()))
}

fn build_oracle(config: &GradebookConfig) -> Option<GuardedOracle> {
    let command = config.oracle.command.as_deref()?;
    let inner: Arc<dyn ReasoningOracle> = Arc::new(CommandOracle::new(command));
    Some(GuardedOracle::new(
        inner,
        OraclePolicy::from_config(&config.oracle),
    ))
}

fn grade(config: &GradebookConfig, file: &Path) -> EvalResult {
    let settings = RuleSettings::from_config(&config.rules);
    let oracle = build_oracle(config);
    let mut result = EvalResult::new();
    evaluate_file(
        file,
        &settings,
        oracle.as_ref().map(|o| o as &dyn ReasoningOracle),
        &mut result,
    );
    result
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

fn cmd_check(config: &GradebookConfig, file: &Path, explain: bool) -> anyhow::Result<()> {
    let result = grade(config, file);
    println!("{}", serde_json::to_string_pretty(&result.to_map())?);

    if explain {
        match parse_file(file) {
            Ok(tree) => {
                let settings = RuleSettings::from_config(&config.rules);
                for violation in find_shape_violations(&tree, &settings) {
                    eprintln!("{}: {violation}", file.display());
                }
            }
            Err(e) => eprintln!("{}: {}", file.display(), e.coded_string()),
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// record
// ---------------------------------------------------------------------------

struct RecordRequest<'a> {
    file: &'a Path,
    revision: &'a str,
    diff_file: Option<&'a Path>,
    model: Option<&'a str>,
    duration: f64,
    usage: TokenUsage,
    used_skill: bool,
    cwd: Option<&'a Path>,
}

fn cmd_record(
    config: &GradebookConfig,
    ledger: &Ledger,
    request: RecordRequest<'_>,
) -> anyhow::Result<()> {
    let mut result = grade(config, request.file);
    if request.used_skill {
        observe_tool_use(
            &mut result,
            "Skill",
            &serde_json::json!({ "skill": "writing-python-services" }),
        );
    }

    let diff = match request.diff_file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading diff {}", path.display()))?,
        None => String::new(),
    };
    let working_directory = match request.cwd {
        Some(cwd) => cwd.to_path_buf(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    let run = EvalRun {
        wall_clock_time: request.duration,
        input_tokens: request.usage.total_input(),
        output_tokens: request.usage.output_tokens,
        eval_results: result.to_map(),
        revision: request.revision.to_string(),
        diff,
        working_directory: working_directory.display().to_string(),
        timestamp: chrono::Local::now().naive_local(),
        model: request
            .model
            .unwrap_or_else(|| config.ledger.effective_default_model())
            .to_string(),
    };

    let id = ledger.append(&run).map_err(GradebookError::from)?;
    println!("{id}");
    Ok(())
}

// ---------------------------------------------------------------------------
// list / show / delete / clear
// ---------------------------------------------------------------------------

fn cmd_list(ledger: &Ledger, revision: Option<&str>) -> anyhow::Result<()> {
    let records = match revision {
        Some(revision) => ledger.list_by_revision(revision),
        None => ledger.list_all(),
    }
    .map_err(GradebookError::from)?;
    if records.is_empty() {
        println!("No eval runs found.");
        return Ok(());
    }
    for record in &records {
        println!("{}", list_line(record));
    }
    Ok(())
}

fn list_line(record: &EvalRunRecord) -> String {
    let run = &record.run;
    let passed = run.eval_results.values().filter(|p| **p).count();
    let revision: String = run.revision.chars().take(12).collect();
    format!(
        "{:>6}  {}  {:<12}  {:<28}  {}/{}{}",
        record.id,
        run.timestamp.format("%Y-%m-%d %H:%M:%S"),
        revision,
        run.model,
        passed,
        run.eval_results.len(),
        if run.has_diff() { "" } else { "  (no diff)" },
    )
}

fn cmd_show(ledger: &Ledger, id: i64) -> anyhow::Result<()> {
    let Some(record) = ledger.get(id).map_err(GradebookError::from)? else {
        bail!("no eval run with id {id}");
    };
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

fn cmd_delete(ledger: &Ledger, id: i64) -> anyhow::Result<()> {
    if !ledger.delete(id).map_err(GradebookError::from)? {
        bail!("no eval run with id {id}");
    }
    println!("Deleted eval run {id}");
    Ok(())
}

fn cmd_clear(ledger: &Ledger) -> anyhow::Result<()> {
    let removed = ledger.clear().map_err(GradebookError::from)?;
    println!("Removed {removed} eval run(s)");
    Ok(())
}

// ---------------------------------------------------------------------------
// stats
// ---------------------------------------------------------------------------

fn cmd_stats(
    config: &GradebookConfig,
    ledger: &Ledger,
    by: GroupBy,
    format: &str,
) -> anyhow::Result<()> {
    let Some(reporter) = create_reporter(format, &config.report) else {
        bail!(
            "unknown report format `{format}` (available: {})",
            reporting::available_formats().join(", ")
        );
    };
    let records = ledger.list_all().map_err(GradebookError::from)?;
    let summary = reporting::summarize(&records, by.into());
    let report = reporter.generate(&summary).map_err(anyhow::Error::msg)?;
    print!("{report}");
    if !report.ends_with('\n') {
        println!();
    }
    Ok(())
}
