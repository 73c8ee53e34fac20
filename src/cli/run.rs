use chrono::Local;
use tabled::Table;

use crate::{
    Res,
    config::{self, Settings},
    error, info,
    job::{Job, RunOutcome, RunSummary},
    management::{PropertyStore, RunLock},
    sheet::CsvSheet,
    warning,
};

pub async fn run() {
    match run_once().await {
        Ok(summary) => report(&summary),
        Err(e) => error!("Run failed: {}", e),
    }
}

/// Executes one run under the run lock.
///
/// Properties are loaded before the job and saved after it, whether the job
/// succeeded or not, so a refreshed token is never lost.
pub async fn run_once() -> Res<RunSummary> {
    let _lock = RunLock::acquire(config::lock_path()).await?;

    let store = PropertyStore::new(config::properties_path());
    let mut props = store.load().await?;

    let settings = Settings::from_env();
    let sheet = CsvSheet::new(settings.sheet_path.clone());
    let mut job = Job::from_settings(&settings, sheet);

    let result = job.run(&mut props, Local::now()).await;

    if let Err(e) = store.persist(&props).await {
        warning!("Failed to save properties: {}", e);
    }

    Ok(result?)
}

pub fn report(summary: &RunSummary) {
    match &summary.outcome {
        RunOutcome::Recorded { tracks, announced } => {
            info!("{} tracks recorded, {} new since yesterday", tracks, announced.len());
            if !announced.is_empty() {
                println!("{}", Table::new(announced));
            }
        }
        RunOutcome::Skipped(status) => {
            warning!("Playlist was not recorded (HTTP {})", status);
        }
    }
    info!("Next run at {}", summary.next_run.at);
}
