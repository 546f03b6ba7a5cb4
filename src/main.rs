use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use order_ledger::application::service::OrderService;
use order_ledger::config::LedgerConfig;
use order_ledger::domain::clock::SystemClock;
use order_ledger::domain::ports::OrderStoreBox;
use order_ledger::infrastructure::in_memory::InMemoryOrderStore;
use order_ledger::interfaces::csv::event_reader::EventReader;
use order_ledger::interfaces::csv::order_writer::OrderWriter;
use order_ledger::telemetry;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input order events CSV file
    input: PathBuf,

    /// Output format for the final order report
    #[arg(long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Seconds between background expiry sweeps
    #[arg(long, default_value_t = 60)]
    sweep_interval_secs: u64,

    /// Lifetime in seconds of a newly created order
    #[arg(long, default_value_t = 1800)]
    order_ttl_secs: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    let cli = Cli::parse();

    let config = LedgerConfig {
        sweep_interval: Duration::from_secs(cli.sweep_interval_secs),
        order_ttl: Duration::from_secs(cli.order_ttl_secs),
    };
    let store: OrderStoreBox = Box::new(InMemoryOrderStore::new());
    let service = OrderService::init(store, Arc::new(SystemClock), config).into_diagnostic()?;

    let file = File::open(cli.input).into_diagnostic()?;
    let reader = EventReader::new(file);
    for event_result in reader.events() {
        match event_result {
            Ok(event) => {
                if let Err(e) = service.apply(event).await {
                    warn!(error = %e, "Error processing order event");
                }
            }
            Err(e) => {
                warn!(error = %e, "Error reading order event");
            }
        }
    }

    let orders = service.shutdown().await.into_diagnostic()?;

    let stdout = io::stdout();
    match cli.format {
        OutputFormat::Csv => {
            let mut writer = OrderWriter::new(stdout.lock());
            writer.write_orders(orders).into_diagnostic()?;
        }
        OutputFormat::Json => {
            let mut out = stdout.lock();
            serde_json::to_writer_pretty(&mut out, &orders).into_diagnostic()?;
            writeln!(out).into_diagnostic()?;
        }
    }

    Ok(())
}
