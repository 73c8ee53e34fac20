use chrono::Utc;
use tokio::time::sleep;

use crate::{
    cli::run::{report, run_once},
    config, error, info,
    management::TriggerStore,
    schedule, warning,
};

/// Fires the pending one-shot trigger and keeps the chain going.
///
/// Every run registers its successor, so the loop only has to wait for
/// whatever trigger is pending. Without a pending trigger the job runs
/// immediately to arm the chain. If a run fails and leaves nothing pending
/// the watcher exits.
pub async fn watch() {
    let store = TriggerStore::new(config::trigger_path());

    loop {
        match store.load().await {
            Ok(Some(trigger)) => {
                let wait = schedule::until_due(&trigger, Utc::now());
                if !wait.is_zero() {
                    info!("Waiting for the run at {}", trigger.at);
                    sleep(wait).await;
                }
            }
            Ok(None) => info!("No run is scheduled, running now"),
            Err(e) => error!("Cannot read the pending trigger. Err: {}", e),
        }

        // one-shot: the trigger is spent before the run registers the next
        if let Err(e) = store.clear().await {
            error!("Cannot consume the pending trigger. Err: {}", e);
        }

        match run_once().await {
            Ok(summary) => report(&summary),
            Err(e) => {
                warning!("Run failed: {}", e);
                match store.load().await {
                    Ok(Some(_)) => {}
                    Ok(None) => error!("No next run is scheduled, stopping."),
                    Err(e) => error!("Cannot read the pending trigger. Err: {}", e),
                }
            }
        }
    }
}
