use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rf_client::{ClientError, ClientResult, SimApi};
use rf_core::RemoteId;
use rf_pipeline::{PipelineConfig, ResultsSession, ResultsSnapshot};

mod snapshot;

use snapshot::SnapshotApi;

#[derive(Parser)]
#[command(name = "rf-cli")]
#[command(about = "ResultFlow CLI - results aggregation over recorded backend snapshots", long_about = None)]
struct Cli {
    /// Directory holding recorded backend payloads
    #[arg(short, long, default_value = "snapshots")]
    data: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the simulation-type and metric catalogs
    Catalogs,
    /// Resolve, filter, and aggregate results for an order
    Results {
        /// Order id (raw route input; non-numeric values are rejected)
        order: String,
        /// Metric id to chart (defaults to the first catalog entry)
        #[arg(short, long)]
        metric: Option<String>,
        /// Comma-separated sim-type ids to include
        #[arg(long)]
        sim_types: Option<String>,
        /// Lower value bound (inclusive)
        #[arg(long)]
        min_value: Option<String>,
        /// Upper value bound (inclusive)
        #[arg(long)]
        max_value: Option<String>,
        /// Lower iteration bound (inclusive)
        #[arg(long)]
        min_iteration: Option<String>,
        /// Upper iteration bound (inclusive)
        #[arg(long)]
        max_iteration: Option<String>,
        /// Print the snapshot as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Export the downsampled chart series as CSV
    Export {
        /// Order id
        order: String,
        /// Metric id to export (defaults to the first catalog entry)
        #[arg(short, long)]
        metric: Option<String>,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ClientResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let api = Arc::new(SnapshotApi::new(cli.data));

    match cli.command {
        Commands::Catalogs => cmd_catalogs(api.as_ref()).await,
        Commands::Results {
            order,
            metric,
            sim_types,
            min_value,
            max_value,
            min_iteration,
            max_iteration,
            json,
        } => {
            let mut session = build_session(api, &order, metric, sim_types);
            if let Some(raw) = min_value {
                session.set_value_min(raw);
            }
            if let Some(raw) = max_value {
                session.set_value_max(raw);
            }
            if let Some(raw) = min_iteration {
                session.set_iteration_min(raw);
            }
            if let Some(raw) = max_iteration {
                session.set_iteration_max(raw);
            }

            let snapshot = session.refresh().await;
            if json {
                print_json(&snapshot)
            } else {
                print_tables(&snapshot);
                Ok(())
            }
        }
        Commands::Export {
            order,
            metric,
            output,
        } => {
            let mut session = build_session(api, &order, metric, None);
            let snapshot = session.refresh().await;
            cmd_export(&snapshot, output.as_deref())
        }
    }
}

fn build_session(
    api: Arc<SnapshotApi>,
    order: &str,
    metric: Option<String>,
    sim_types: Option<String>,
) -> ResultsSession {
    let mut session = ResultsSession::new(api as Arc<dyn SimApi>, PipelineConfig::default());
    session.set_order(order);
    if let Some(raw) = metric {
        session.set_metric(raw);
    }
    if let Some(raw) = sim_types {
        for part in raw.split(',') {
            if let Ok(id) = RemoteId::parse(part) {
                session.toggle_sim_type(id);
            }
        }
    }
    session
}

async fn cmd_catalogs(api: &SnapshotApi) -> ClientResult<()> {
    let sim_types = api.sim_type_catalog().await?;
    let metrics = api.metric_catalog().await?;

    if sim_types.is_empty() {
        println!("No simulation types recorded");
    } else {
        println!("Simulation types:");
        for def in sim_types {
            println!("  {} - {}", def.id, def.name);
        }
    }

    if metrics.is_empty() {
        println!("No metrics recorded");
    } else {
        println!("Metrics:");
        for def in metrics {
            println!("  {} - {}", def.id, def.name);
        }
    }
    Ok(())
}

fn print_tables(snapshot: &ResultsSnapshot) {
    println!("Order {}", snapshot.display_order);

    if let Some(err) = &snapshot.error {
        println!("✗ {err}");
        println!("  (re-run the command to retry; cached stages are reused)");
    }

    let metric_label = RemoteId::parse(&snapshot.metric)
        .ok()
        .and_then(|id| snapshot.metric_label(id).map(str::to_string))
        .unwrap_or_else(|| snapshot.metric.clone());
    println!("Metric: {metric_label}");

    if !snapshot.available_sim_types.is_empty() {
        println!("Sim types:");
        for def in &snapshot.available_sim_types {
            let marker = if snapshot.selected_sim_types.contains(&def.id) {
                "*"
            } else {
                " "
            };
            println!("  {marker} {} - {}", def.id, def.name);
        }
    }

    println!("Filtered records: {}", snapshot.filtered.len());
    println!("Chart points:     {}", snapshot.trend.len());

    if snapshot.averages.is_empty() {
        if snapshot.is_empty() {
            println!("No records matched the current filters");
        }
    } else {
        println!("\nAverage value by sim type:");
        for avg in &snapshot.averages {
            println!("  {:<24} {:>12.2}", avg.sim_type, avg.value);
        }
    }
}

fn print_json(snapshot: &ResultsSnapshot) -> ClientResult<()> {
    let payload = serde_json::json!({
        "displayOrder": snapshot.display_order,
        "state": format!("{:?}", snapshot.state),
        "error": snapshot.error.as_ref().map(|err| err.to_string()),
        "filteredResults": snapshot.filtered,
        "trendData": snapshot.trend,
        "avgBySimType": snapshot.averages,
    });
    let rendered = serde_json::to_string_pretty(&payload)
        .map_err(|err| ClientError::Decode(err.to_string()))?;
    println!("{rendered}");
    Ok(())
}

fn cmd_export(snapshot: &ResultsSnapshot, output: Option<&std::path::Path>) -> ClientResult<()> {
    if let Some(err) = &snapshot.error {
        println!("✗ {err}");
    }

    // Build CSV
    let mut csv = String::from("iteration,sim_type,value\n");
    for point in &snapshot.trend {
        csv.push_str(&format!(
            "{},{},{}\n",
            point.iteration, point.sim_type, point.value
        ));
    }

    // Write to file or stdout
    if let Some(path) = output {
        std::fs::write(path, csv).map_err(|err| ClientError::Transport(err.to_string()))?;
        println!(
            "✓ Exported {} chart points to {}",
            snapshot.trend.len(),
            path.display()
        );
    } else {
        print!("{csv}");
    }

    Ok(())
}
