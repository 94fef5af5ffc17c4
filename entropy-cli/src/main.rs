use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use entropy_core::{
    ActivityLog, Project, ScoreBreakdown, SessionMode, Task, TriageRequest, analytics,
    complete_task, explain, portfolio, project_metrics, prune_orphan_logs, triage,
};
use entropy_ingest::{load_activity_logs_json, load_projects_json, load_tasks_json};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

mod config;
mod logging;
mod render;
mod state;
mod store;

use config::{Config, load_config};
use store::StoreClient;

#[derive(Parser, Debug)]
#[command(
    name = "entropy",
    version,
    about = "Entropy: rank tasks by decay, tier, deadlines and session mode"
)]
struct Cli {
    /// Debug logging to stderr (ENTROPY_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct Source {
    /// Rows exported from the store (JSON array, or .csv for tasks)
    #[arg(long, conflicts_with = "remote")]
    file: Option<PathBuf>,

    /// Fetch rows from the store configured in config.toml
    #[arg(long)]
    remote: bool,
}

#[derive(clap::Args, Debug)]
struct Clock {
    /// Evaluate at this local time ("YYYY-MM-DD HH:MM", configured timezone)
    #[arg(long)]
    at: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank active tasks into focus objectives and an admin batch
    Triage {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        clock: Clock,

        /// Session mode: deep-work, low-energy, creative, admin
        #[arg(long)]
        mode: Option<SessionMode>,

        /// Minutes available; only tasks that fit are considered
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        time: Option<u32>,

        /// Ignore the configured default time budget
        #[arg(long, conflicts_with = "time")]
        no_limit: bool,

        /// Focus items to print (default: display.limit)
        #[arg(long)]
        limit: Option<usize>,

        /// Show how each score was built
        #[arg(long)]
        explain: bool,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Project health across the portfolio
    Portfolio {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        clock: Clock,

        #[arg(long)]
        json: bool,
    },

    /// Compute what completing a task changes (activity log, project touch, successor)
    Complete {
        /// Task rows (JSON or CSV)
        #[arg(long)]
        file: PathBuf,

        /// Task id to complete
        #[arg(long)]
        id: String,

        #[arg(long)]
        mode: Option<SessionMode>,

        #[command(flatten)]
        clock: Clock,
    },

    /// Two-week activity metrics for one project
    Analytics {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        clock: Clock,

        /// Project id
        #[arg(long)]
        project: String,

        #[arg(long)]
        json: bool,
    },

    /// Drop activity logs whose task no longer exists
    PruneLogs {
        /// Activity log rows (JSON)
        #[arg(long)]
        file: PathBuf,
    },

    /// Manage ~/.entropy/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Serialize)]
struct ScoredTask<'a> {
    #[serde(flatten)]
    task: &'a Task,
    score: Option<f64>,
}

#[derive(Serialize)]
struct TriageJson<'a> {
    mode: SessionMode,
    time_available: Option<u32>,
    evaluated_at: DateTime<Utc>,
    focus: Vec<ScoredTask<'a>>,
    admin: Vec<ScoredTask<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    breakdowns: Option<&'a [ScoreBreakdown]>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = load_config()?;
                println!("# {}\n", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },

        Command::Triage {
            source,
            clock,
            mode,
            time,
            no_limit,
            limit,
            explain: show_explain,
            json,
        } => {
            let cfg = load_config()?;
            let (now, tz) = resolve_clock(&cfg, &clock)?;

            let time_available = if no_limit {
                None
            } else {
                time.or(cfg.engine.time_available)
            };
            let request = TriageRequest::new(mode.unwrap_or(cfg.engine.mode))
                .with_time_available(time_available);

            let tasks: Vec<Task> = load_tasks(&cfg, &source, now)
                .await?
                .into_iter()
                .filter(Task::is_active)
                .collect();
            info!(tasks = tasks.len(), mode = %request.mode, "triage");

            let result = triage(&tasks, &request, now)?;
            let breakdowns = result
                .focus
                .iter()
                .chain(result.admin.iter())
                .map(|t| explain(t, request.mode, now))
                .collect::<Result<Vec<_>, _>>()?;

            if json {
                let out = TriageJson {
                    mode: request.mode,
                    time_available: request.time_available,
                    evaluated_at: now,
                    focus: scored(&result.focus, &breakdowns),
                    admin: scored(&result.admin, &breakdowns),
                    breakdowns: show_explain.then_some(breakdowns.as_slice()),
                };
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!(
                    "{}",
                    render::render_triage(&render::TriageView {
                        triage: &result,
                        request: &request,
                        breakdowns: &breakdowns,
                        now,
                        tz,
                        limit: limit.unwrap_or(cfg.display.limit),
                        explain: show_explain,
                    })
                );
            }
        }

        Command::Portfolio { source, clock, json } => {
            let cfg = load_config()?;
            let (now, _) = resolve_clock(&cfg, &clock)?;
            let projects = load_projects(&cfg, &source, now).await?;
            let health = portfolio(&projects, now);

            if json {
                println!("{}", serde_json::to_string_pretty(&health)?);
            } else {
                print!("{}", render::render_portfolio(&health));
            }
        }

        Command::Complete { file, id, mode, clock } => {
            let cfg = load_config()?;
            let (now, _) = resolve_clock(&cfg, &clock)?;
            let tasks = load_tasks_file(&file, now)?;
            let Some(task) = tasks.iter().find(|t| t.id == id) else {
                bail!("task '{}' not found in {}", id, file.display());
            };

            let completion = complete_task(task, mode.unwrap_or(cfg.engine.mode), now)?;
            info!(task = %id, successor = completion.successor.is_some(), "completed");
            println!("{}", serde_json::to_string_pretty(&completion)?);
        }

        Command::Analytics {
            source,
            clock,
            project,
            json,
        } => {
            let cfg = load_config()?;
            let (now, tz) = resolve_clock(&cfg, &clock)?;
            let logs = load_logs(&cfg, &source, &project, now).await?;
            let metrics = project_metrics(&logs, &project, now, tz);

            if json {
                println!("{}", serde_json::to_string_pretty(&metrics)?);
            } else {
                print!("{}", render::render_metrics(&project, &metrics));
            }
        }

        Command::PruneLogs { file } => {
            let logs = load_activity_logs_json(&state::read_input(&file)?)
                .with_context(|| format!("parsing {}", file.display()))?;
            let (kept, removed) = prune_orphan_logs(logs);
            eprintln!("Removed {removed} orphaned logs; {} kept.", kept.len());
            println!("{}", serde_json::to_string_pretty(&kept)?);
        }
    }

    Ok(())
}

fn scored<'a>(list: &'a [Task], breakdowns: &[ScoreBreakdown]) -> Vec<ScoredTask<'a>> {
    list.iter()
        .map(|t| ScoredTask {
            task: t,
            score: breakdowns.iter().find(|b| b.task_id == t.id).map(|b| b.score),
        })
        .collect()
}

/// Sample "now" once per invocation (or take it from `--at`).
fn resolve_clock(cfg: &Config, clock: &Clock) -> Result<(DateTime<Utc>, Tz)> {
    let tz = entropy_core::time::parse_timezone(&cfg.display.timezone)?;
    let now = match clock.at.as_deref() {
        Some(local) => entropy_core::time::parse_local_to_utc(local, &cfg.display.timezone)
            .context("--at")?,
        None => Utc::now(),
    };
    Ok((now, tz))
}

fn load_tasks_file(path: &Path, now: DateTime<Utc>) -> Result<Vec<Task>> {
    if state::is_csv(path) {
        let rows = entropy_ingest::read_task_rows_csv(path)?;
        return entropy_ingest::map_task_rows(&rows, now);
    }
    load_tasks_json(&state::read_input(path)?, now).with_context(|| format!("parsing {}", path.display()))
}

async fn load_tasks(cfg: &Config, source: &Source, now: DateTime<Utc>) -> Result<Vec<Task>> {
    match (&source.file, source.remote) {
        (Some(path), _) => load_tasks_file(path, now),
        (None, true) => {
            let rows = StoreClient::from_config(&cfg.store)?.active_tasks().await?;
            entropy_ingest::map_task_rows(&rows, now)
        }
        (None, false) => bail!("pass --file <rows.json|rows.csv> or --remote"),
    }
}

async fn load_projects(cfg: &Config, source: &Source, now: DateTime<Utc>) -> Result<Vec<Project>> {
    match (&source.file, source.remote) {
        (Some(path), _) => load_projects_json(&state::read_input(path)?, now)
            .with_context(|| format!("parsing {}", path.display())),
        (None, true) => StoreClient::from_config(&cfg.store)?
            .projects()
            .await?
            .iter()
            .map(|r| entropy_ingest::map_project_row(r, now))
            .collect(),
        (None, false) => bail!("pass --file <projects.json> or --remote"),
    }
}

async fn load_logs(cfg: &Config, source: &Source, project_id: &str, now: DateTime<Utc>) -> Result<Vec<ActivityLog>> {
    match (&source.file, source.remote) {
        (Some(path), _) => load_activity_logs_json(&state::read_input(path)?)
            .with_context(|| format!("parsing {}", path.display())),
        (None, true) => {
            let since = now - Duration::days(analytics::ANALYTICS_WINDOW_DAYS);
            let rows = StoreClient::from_config(&cfg.store)?
                .activity_logs(project_id, &since.to_rfc3339())
                .await?;
            Ok(rows.iter().filter_map(entropy_ingest::map_activity_row).collect())
        }
        (None, false) => bail!("pass --file <activity_logs.json> or --remote"),
    }
}
