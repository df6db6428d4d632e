// Command-line front-end for the impact dashboard engine.
//
// Each command loads the three datasets once, filters expectations by the
// selected initiative, and prints markdown previews. `report` also writes
// the card table and summary to disk.
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::info;

use impact_dashboard::cache::DatasetCache;
use impact_dashboard::loader::DatasetPaths;
use impact_dashboard::output::{preview_table, write_csv, write_json};
use impact_dashboard::rationale::RationaleBook;
use impact_dashboard::reports::{
    build_kpi_overview, chart_rows, evidence_panel, performance_table, summary_report, trend_chart,
};
use impact_dashboard::series::{
    filter_by_initiative, find_expectation, initiatives, initiatives_with_metric,
};
use impact_dashboard::types::{Datasets, Expectation, MetricCardRow};
use impact_dashboard::{format_int, DashboardConfig, Engine};

#[derive(Debug, Parser)]
#[command(name = "impact-dashboard")]
#[command(about = "Initiative progress, trend projections, and evidence grades")]
struct Cli {
    /// Directory holding Expectations.csv, Performance.csv, Evidence.csv.
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,
    #[arg(long)]
    expectations: Option<PathBuf>,
    #[arg(long)]
    performance: Option<PathBuf>,
    #[arg(long)]
    evidence: Option<PathBuf>,
    /// Engine configuration (horizon year, classifier overrides).
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value = "metric_rationale.json")]
    rationale: PathBuf,
    /// Initiative ID to focus on; "All" or absent shows every initiative.
    #[arg(long)]
    initiative: Option<String>,
    /// Last year of the trend projection.
    #[arg(long)]
    horizon: Option<i32>,
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List initiative IDs.
    Initiatives,
    /// KPI cards grouped by category.
    Cards,
    /// On-track / at-risk / off-track counts.
    Summary,
    /// Trend, projection, and performance table for one metric.
    Trend {
        #[arg(long)]
        metric: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Evidence grade and supporting items for one metric.
    Evidence {
        #[arg(long)]
        metric: String,
    },
    /// Metric rationale listing.
    Methodology,
    /// Write cards.csv and summary.json.
    Report {
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

struct Session {
    data: std::sync::Arc<Datasets>,
    engine: Engine,
    initiative: Option<String>,
}

impl Session {
    fn filtered(&self) -> Vec<&Expectation> {
        filter_by_initiative(&self.data.expectations, self.initiative.as_deref())
    }

    /// First expectation for `metric` within the selected initiative. With no
    /// initiative selected the metric must belong to exactly one.
    fn expectation_for(&self, metric: &str) -> Result<&Expectation> {
        let id = match &self.initiative {
            Some(id) => id.clone(),
            None => {
                let owners = initiatives_with_metric(&self.data.expectations, metric);
                match owners.as_slice() {
                    [] => bail!("no expectation for metric {metric:?}"),
                    [only] => {
                        println!("Initiative: {only}");
                        only.clone()
                    }
                    many => bail!(
                        "metric {metric:?} is tracked by several initiatives ({}); pass --initiative",
                        many.join(", ")
                    ),
                }
            }
        };
        find_expectation(&self.data.expectations, &id, metric)
            .with_context(|| format!("no expectation for metric {metric:?} in initiative {id}"))
    }
}

fn dataset_paths(cli: &Cli) -> DatasetPaths {
    let defaults = DatasetPaths::in_dir(&cli.data_dir);
    DatasetPaths {
        expectations: cli.expectations.clone().unwrap_or(defaults.expectations),
        performance: cli.performance.clone().unwrap_or(defaults.performance),
        evidence: cli.evidence.clone().unwrap_or(defaults.evidence),
    }
}

fn open_session(cli: &Cli) -> Result<Session> {
    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => DashboardConfig::default(),
    };
    if let Some(h) = cli.horizon {
        config.horizon_year = h;
    }

    let paths = dataset_paths(cli);
    let mut cache = DatasetCache::new();
    let (data, report) = cache
        .get_or_load(&paths)
        .context("failed to load datasets")?;
    println!(
        "Loaded {} expectations, {} observations, {} evidence records.",
        format_int(report.expectation_rows as u64),
        format_int(report.observation_rows as u64),
        format_int(report.evidence_rows as u64)
    );
    if report.null_baselines + report.null_targets > 0 {
        println!(
            "Note: {} blank baselines and {} blank 2030 targets; those metrics show no progress.",
            report.null_baselines, report.null_targets
        );
    }

    let initiative = cli.initiative.clone().filter(|i| i != "All");
    if let Some(id) = &initiative {
        if !data.expectations.iter().any(|e| &e.initiative_id == id) {
            bail!("unknown initiative {id:?}");
        }
    }
    Ok(Session {
        data,
        engine: config.engine(),
        initiative,
    })
}

fn handle_initiatives(session: &Session) {
    println!("\nInitiatives:");
    for id in initiatives(&session.data.expectations) {
        println!("  {}", id);
    }
    println!();
}

fn card_rows(session: &Session) -> Vec<MetricCardRow> {
    build_kpi_overview(&session.filtered(), &session.data.performance, &session.engine)
        .iter()
        .flat_map(|g| g.cards.iter().map(|c| c.to_row(&session.engine)))
        .collect()
}

fn handle_cards(session: &Session, rationale: &RationaleBook) {
    let groups = build_kpi_overview(&session.filtered(), &session.data.performance, &session.engine);
    for group in &groups {
        let rows: Vec<MetricCardRow> = group.cards.iter().map(|c| c.to_row(&session.engine)).collect();
        preview_table(&group.name, group.description, &rows, rows.len());
        for card in &group.cards {
            let r = rationale.get(&card.metric_name);
            if r.is_documented() {
                println!(
                    "  {}: {}",
                    card.metric_name,
                    r.rationale.as_deref().unwrap_or_default()
                );
            }
        }
    }
}

fn handle_summary(session: &Session) {
    let s = summary_report(
        &session.filtered(),
        &session.data.performance,
        session.initiative.as_deref(),
        &session.engine,
    );
    println!("\nSummary Statistics ({})", s.initiative);
    println!("  Total Metrics: {}", s.total_metrics);
    println!("  On Track:      {}", s.on_track);
    println!("  At Risk:       {}", s.at_risk);
    println!("  Off Track:     {}", s.off_track);
    println!("  No Data:       {}\n", s.no_data);
}

fn handle_trend(session: &Session, metric: &str, out: Option<&Path>) -> Result<()> {
    let exp = session.expectation_for(metric)?;
    let engine = &session.engine;
    let Some(chart) = trend_chart(&session.data, exp, engine) else {
        println!("No performance data available for this metric\n");
        return Ok(());
    };
    let note = format!("projected to {}", engine.horizon_year);
    preview_table(
        &format!("{} - Trend and Projection", metric),
        Some(note.as_str()),
        &chart_rows(&chart, metric, engine),
        usize::MAX,
    );
    let table = performance_table(&session.data.performance, &exp.initiative_id, metric, engine);
    preview_table("Performance Data Table", None, &table, table.len());
    if let Some(path) = out {
        write_json(path, &chart)?;
        println!("(Chart data exported to {})\n", path.display());
    }
    Ok(())
}

fn handle_evidence(session: &Session, metric: &str) -> Result<()> {
    let exp = session.expectation_for(metric)?;
    match evidence_panel(&session.data, &exp.initiative_id, metric) {
        Some(panel) => {
            println!("\nEvidence Grade: {}", panel.grade);
            println!("Average Confidence: {}", panel.avg_confidence);
            let rows = panel.rows();
            preview_table("Supporting Evidence", None, &rows, rows.len());
            for item in panel.items.iter().filter(|i| i.is_link) {
                println!("  source: {}", item.summary);
            }
        }
        None => println!("No evidence data available for this metric\n"),
    }
    Ok(())
}

fn handle_methodology(rationale: &RationaleBook) {
    println!("\nMetric Rationale");
    if rationale.is_empty() {
        println!("Metric rationale file not found. Create metric_rationale.json for detailed explanations.\n");
        return;
    }
    for (metric, r) in rationale.iter() {
        println!("\n{}", metric);
        println!("  Rationale: {}", r.rationale.as_deref().unwrap_or("N/A"));
        println!("  Target Rationale: {}", r.target_rationale.as_deref().unwrap_or("N/A"));
        println!("  Data Availability: {}", r.data_availability.as_deref().unwrap_or("N/A"));
    }
    println!();
}

fn handle_report(session: &Session, out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let cards = card_rows(session);
    let cards_path = out_dir.join("cards.csv");
    write_csv(&cards_path, &cards)?;
    preview_table("KPI Overview", None, &cards, 5);
    println!("(Full table exported to {})\n", cards_path.display());

    let summary = summary_report(
        &session.filtered(),
        &session.data.performance,
        session.initiative.as_deref(),
        &session.engine,
    );
    let summary_path = out_dir.join("summary.json");
    write_json(&summary_path, &summary)?;
    info!("wrote {} and {}", cards_path.display(), summary_path.display());
    println!(
        "Summary Stats ({}): on_track={} at_risk={} off_track={} total={}\n",
        summary_path.display(),
        summary.on_track,
        summary.at_risk,
        summary.off_track,
        summary.total_metrics
    );
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level)).init();

    if let Command::Methodology = cli.command {
        handle_methodology(&RationaleBook::load(&cli.rationale));
        return Ok(());
    }

    let session = open_session(&cli)?;
    match &cli.command {
        Command::Initiatives => handle_initiatives(&session),
        Command::Cards => handle_cards(&session, &RationaleBook::load(&cli.rationale)),
        Command::Summary => handle_summary(&session),
        Command::Trend { metric, out } => handle_trend(&session, metric, out.as_deref())?,
        Command::Evidence { metric } => handle_evidence(&session, metric)?,
        Command::Report { out_dir } => handle_report(&session, out_dir)?,
        Command::Methodology => {}
    }
    Ok(())
}
