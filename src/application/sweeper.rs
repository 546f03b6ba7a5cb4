use super::ledger::{OrderLedger, SweepReport};
use crate::error::{LedgerError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

enum SweepCommand {
    Tick(oneshot::Sender<SweepReport>),
    Shutdown,
}

/// Handle to the background task that expires stale pending orders.
///
/// The task sweeps the ledger once per `period`, starting one period after
/// [`ExpirySweeper::start`]. [`ExpirySweeper::tick`] forces a sweep on the same
/// task, and [`ExpirySweeper::shutdown`] stops it. Dropping the handle also
/// stops the task once the command channel closes.
pub struct ExpirySweeper {
    commands: mpsc::Sender<SweepCommand>,
    handle: JoinHandle<()>,
}

impl ExpirySweeper {
    /// Spawns the sweep loop on the current tokio runtime.
    ///
    /// `period` must be non-zero.
    pub fn start(ledger: Arc<OrderLedger>, period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(LedgerError::ValidationError(
                "Sweep interval must be greater than zero".to_string(),
            ));
        }
        let (commands, receiver) = mpsc::channel(8);
        let handle = tokio::spawn(run(ledger, period, receiver));
        Ok(Self { commands, handle })
    }

    /// Runs a sweep now and waits for its report.
    pub async fn tick(&self) -> Result<SweepReport> {
        let (respond_to, response) = oneshot::channel();
        self.commands
            .send(SweepCommand::Tick(respond_to))
            .await
            .map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())
    }

    /// Stops the sweep loop and waits for the task to finish.
    pub async fn shutdown(self) -> Result<()> {
        // The loop may already be gone; joining below still reports panics.
        let _ = self.commands.send(SweepCommand::Shutdown).await;
        self.handle
            .await
            .map_err(|e| LedgerError::InternalError(Box::new(e)))
    }
}

fn stopped() -> LedgerError {
    LedgerError::InternalError(Box::new(std::io::Error::other("expiry sweeper is not running")))
}

async fn run(ledger: Arc<OrderLedger>, period: Duration, mut commands: mpsc::Receiver<SweepCommand>) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    info!(period_secs = period.as_secs(), "Expiry sweeper started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let report = ledger.sweep().await;
                log_report(&report);
            }
            command = commands.recv() => match command {
                Some(SweepCommand::Tick(respond_to)) => {
                    let report = ledger.sweep().await;
                    log_report(&report);
                    let _ = respond_to.send(report);
                }
                Some(SweepCommand::Shutdown) | None => break,
            },
        }
    }

    info!("Expiry sweeper stopped");
}

fn log_report(report: &SweepReport) {
    if report.failed > 0 {
        warn!(
            expired = report.expired,
            failed = report.failed,
            "Sweep finished with failures"
        );
    } else if report.expired > 0 {
        debug!(
            examined = report.examined,
            expired = report.expired,
            skipped = report.skipped,
            "Sweep expired orders"
        );
    }
}
