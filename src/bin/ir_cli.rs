//! Request Tracker Command Line Interface
//!
//! Inspect a saved backend snapshot with the same filtering, grouping and
//! statistics the tracker views use.
//!
//! # Usage
//!
//! ```bash
//! # Pending CPRs of project D1, grouped by project
//! ir_cli --snapshot snapshot.json list --project D1 --type cpr --status pending
//!
//! # Dashboard counters as JSON
//! ir_cli --snapshot snapshot.json -o json stats
//!
//! # Shorten identifiers
//! ir_cli format-id BADYA-CON-D6A1-IR-ST-007
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use ir_tracker::{logging, ApiEndpoint, RecordsTab, Session, Snapshot, TrackerConfig};
use request_engine::{
    apply_filters_with, compute_stats, format_display_number, format_identifier,
    group_by_project, ir_dept_code, merge_activity, normalize_dept, timestamp, type_label,
    FilterOptions, FilterSpec, RequestStats,
};
use request_types::RequestRecord;

#[derive(Parser)]
#[command(name = "ir_cli")]
#[command(version)]
#[command(about = "Inspect IR / CPR request snapshots")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "pretty", value_enum)]
    format: OutputFormat,

    /// Tracker configuration file
    #[arg(long, global = true, env = "IR_TRACKER_CONFIG")]
    config: Option<PathBuf>,

    /// Snapshot of backend list bodies
    #[arg(long, short, global = true, env = "IR_TRACKER_SNAPSHOT")]
    snapshot: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter and search records, grouped by project
    List {
        #[arg(long)]
        project: Option<String>,

        /// Department code: ARCH, ST, ELECT, MEP, SURV, REV
        #[arg(long)]
        department: Option<String>,

        /// ir, cpr or revision
        #[arg(long = "type")]
        request_type: Option<String>,

        /// pending or completed
        #[arg(long)]
        status: Option<String>,

        /// today, week or month
        #[arg(long)]
        date_range: Option<String>,

        /// dc or engineer
        #[arg(long)]
        archived_by: Option<String>,

        #[arg(long)]
        user: Option<String>,

        /// Scope to a tab of the stored session: personal, department, all
        #[arg(long, requires = "session")]
        tab: Option<String>,

        /// Stored session file
        #[arg(long)]
        session: Option<PathBuf>,

        /// Only archived records
        #[arg(long)]
        archived: bool,

        /// Order project headings alphabetically
        #[arg(long)]
        sorted: bool,

        /// Free-text query
        query: Option<String>,
    },

    /// Counters over the snapshot
    Stats,

    /// Most recent requests and revisions
    Recent {
        /// Feed length (defaults to the configured limit)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Values available for each filter axis
    Options,

    /// Shorten backend identifiers
    FormatId {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Classify department names
    Dept {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Resolved backend endpoint URLs
    Endpoints,
}

// =============================================================================
// MAIN
// =============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = TrackerConfig::resolve(cli.config.as_deref())
        .context("loading configuration")
        .and_then(|config| {
            logging::init(&config.log_filter);
            run(&cli, &config)
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::json!({ "error": format!("{e:#}") }));
            } else {
                eprintln!("{}: {:#}", "error".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &TrackerConfig) -> anyhow::Result<()> {
    match &cli.command {
        Commands::List {
            project,
            department,
            request_type,
            status,
            date_range,
            archived_by,
            user,
            tab,
            session,
            archived,
            sorted,
            query,
        } => {
            let mut spec = match (tab, session) {
                (Some(tab), Some(path)) => {
                    let tab: RecordsTab = tab.parse()?;
                    Session::load(path)?.scope(tab)
                }
                _ => FilterSpec::new(),
            };
            let axes = [
                ("project", project),
                ("department", department),
                ("type", request_type),
                ("status", status),
                ("dateRange", date_range),
                ("archivedBy", archived_by),
                ("user", user),
            ];
            for (axis, value) in axes {
                if let Some(value) = value {
                    spec.set(axis, value)?;
                }
            }
            let snapshot = load_snapshot(cli)?;
            let records = if *archived {
                snapshot.archive.clone()
            } else {
                snapshot.all()
            };
            cmd_list(
                &records,
                &spec,
                query.as_deref().unwrap_or(""),
                *sorted,
                config,
                cli.format,
            )
        }
        Commands::Stats => cmd_stats(&load_snapshot(cli)?, cli.format),
        Commands::Recent { limit } => cmd_recent(
            &load_snapshot(cli)?,
            limit.unwrap_or(config.recent_activity_limit),
            config,
            cli.format,
        ),
        Commands::Options => cmd_options(&load_snapshot(cli)?.all(), cli.format),
        Commands::FormatId { ids } => cmd_format_id(ids, cli.format),
        Commands::Dept { names } => cmd_dept(names, cli.format),
        Commands::Endpoints => cmd_endpoints(config, cli.format),
    }
}

fn load_snapshot(cli: &Cli) -> anyhow::Result<Snapshot> {
    let Some(path) = &cli.snapshot else {
        bail!("no snapshot given (use --snapshot or IR_TRACKER_SNAPSHOT)");
    };
    Snapshot::load(path).with_context(|| format!("loading snapshot {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_list(
    records: &[RequestRecord],
    spec: &FilterSpec,
    query: &str,
    sorted: bool,
    config: &TrackerConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let ctx = config.eval_context();
    let matched = apply_filters_with(records, spec, query, &ctx);
    let groups = group_by_project(&matched);
    let groups = if sorted { groups.sorted() } else { groups };

    match format {
        OutputFormat::Json => print_json(&groups),
        OutputFormat::Pretty => {
            for group in groups.iter() {
                println!(
                    "{} {}",
                    group.project.cyan().bold(),
                    format!("({})", group.len()).dimmed()
                );
                for record in &group.records {
                    let status = if record.is_done {
                        "done".green()
                    } else {
                        "pending".yellow()
                    };
                    let sent = record
                        .reference_date()
                        .map(|d| timestamp::format_short_date(d, ctx.offset()))
                        .unwrap_or_default();
                    println!(
                        "  {:<22} {:<13} {:<8} {:<7} {}",
                        format_display_number(record).bold(),
                        type_label(record),
                        status,
                        sent,
                        record.description
                    );
                }
            }
            println!(
                "{} {} of {} records",
                "OK".green(),
                matched.len(),
                records.len()
            );
            Ok(())
        }
    }
}

fn cmd_stats(snapshot: &Snapshot, format: OutputFormat) -> anyhow::Result<()> {
    let active = compute_stats(snapshot.active());
    let archive = compute_stats(&snapshot.archive);
    let dashboard = snapshot.dashboard();

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "active": active,
            "archive": archive,
            "dashboard": dashboard,
        })),
        OutputFormat::Pretty => {
            print_stats("Active", &active);
            print_stats("Archive", &archive);
            Ok(())
        }
    }
}

fn print_stats(title: &str, stats: &RequestStats) {
    println!("{}", title.bold());
    println!("  total       {}", stats.total);
    println!(
        "  by type     IR {}  CPR {}  revisions {} (IR {}, CPR {})",
        stats.ir, stats.cpr, stats.revisions, stats.ir_revisions, stats.cpr_revisions
    );
    println!(
        "  status      {} completed, {} pending",
        stats.completed.to_string().green(),
        stats.pending.to_string().yellow()
    );
    println!(
        "  archived by dc {}, engineer {}",
        stats.archived_by_dc, stats.archived_by_engineer
    );
}

fn cmd_recent(
    snapshot: &Snapshot,
    limit: usize,
    config: &TrackerConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let ctx = config.eval_context();
    let feed = merge_activity(&snapshot.requests, &snapshot.revisions, limit, &ctx);

    match format {
        OutputFormat::Json => print_json(&feed),
        OutputFormat::Pretty => {
            for entry in &feed {
                println!(
                    "{:<16} {:<22} {:<13} {}",
                    timestamp::format_relative(&entry.at.to_rfc3339(), &ctx).dimmed(),
                    format_display_number(entry.record).bold(),
                    type_label(entry.record),
                    entry.record.user
                );
            }
            Ok(())
        }
    }
}

fn cmd_options(records: &[RequestRecord], format: OutputFormat) -> anyhow::Result<()> {
    let options = FilterOptions::collect(records);
    match format {
        OutputFormat::Json => print_json(&options),
        OutputFormat::Pretty => {
            let join = |items: Vec<String>| items.join(", ");
            println!("{:<12} {}", "projects".bold(), options.projects.join(", "));
            println!(
                "{:<12} {}",
                "departments".bold(),
                join(options.departments.iter().map(ToString::to_string).collect())
            );
            println!(
                "{:<12} {}",
                "archived by".bold(),
                join(options.archived_by.iter().map(ToString::to_string).collect())
            );
            println!("{:<12} {}", "users".bold(), options.users.join(", "));
            Ok(())
        }
    }
}

fn cmd_format_id(ids: &[String], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(
            &ids.iter()
                .map(|id| serde_json::json!({ "id": id, "display": format_identifier(id) }))
                .collect::<Vec<_>>(),
        ),
        OutputFormat::Pretty => {
            for id in ids {
                println!("{} -> {}", id.dimmed(), format_identifier(id).bold());
            }
            Ok(())
        }
    }
}

fn cmd_dept(names: &[String], format: OutputFormat) -> anyhow::Result<()> {
    let rows: Vec<_> = names
        .iter()
        .map(|name| (name, normalize_dept(name), ir_dept_code(name)))
        .collect();
    match format {
        OutputFormat::Json => print_json(
            &rows
                .iter()
                .map(|(name, code, numbering)| {
                    serde_json::json!({ "name": name, "code": code, "numberingCode": numbering })
                })
                .collect::<Vec<_>>(),
        ),
        OutputFormat::Pretty => {
            for (name, code, numbering) in &rows {
                println!(
                    "{:<24} {:<6} {}",
                    name,
                    code.to_string().bold(),
                    format!("(numbering {numbering})").dimmed()
                );
            }
            Ok(())
        }
    }
}

fn cmd_endpoints(config: &TrackerConfig, format: OutputFormat) -> anyhow::Result<()> {
    let rows = ApiEndpoint::FIXED
        .iter()
        .map(|e| Ok((e.method(), config.endpoint_url(e)?)))
        .collect::<anyhow::Result<Vec<_>>>()?;
    match format {
        OutputFormat::Json => print_json(
            &rows
                .iter()
                .map(|(method, url)| serde_json::json!({ "method": method, "url": url.as_str() }))
                .collect::<Vec<_>>(),
        ),
        OutputFormat::Pretty => {
            for (method, url) in &rows {
                println!("{:<7} {}", method.bold(), url);
            }
            Ok(())
        }
    }
}
