use chrono::{DateTime, Local, TimeZone, Utc};

use crate::{
    management::{TriggerError, TriggerStore},
    types::Trigger,
};

/// Handler name recorded in triggers for the daily run.
pub const RUN_HANDLER: &str = "run";

/// Re-arms the daily run as a chain of one-shot triggers.
pub struct Scheduler {
    store: TriggerStore,
    hour: u32,
}

impl Scheduler {
    pub fn new(store: TriggerStore, hour: u32) -> Self {
        Self { store, hour }
    }

    /// Registers the next run for the day after `today` at the configured
    /// hour, replacing any pending trigger.
    pub async fn schedule_next<Tz: TimeZone>(
        &self,
        today: &DateTime<Tz>,
    ) -> Result<Trigger, TriggerError> {
        let at = next_run_at(today, self.hour).ok_or_else(|| {
            TriggerError::InvalidTime(format!(
                "{:02}:00 on the day after {} does not exist",
                self.hour,
                today.date_naive()
            ))
        })?;

        let trigger = Trigger {
            handler: RUN_HANDLER.to_string(),
            at: at.fixed_offset(),
            created_at: Local::now().fixed_offset(),
        };
        self.store.persist(&trigger).await?;
        Ok(trigger)
    }
}

/// `hour`:00:00 on the calendar day after `today`, in `today`'s time zone.
///
/// Returns `None` if that wall-clock time does not exist there. When it
/// occurs twice the earlier instant is used.
pub fn next_run_at<Tz: TimeZone>(today: &DateTime<Tz>, hour: u32) -> Option<DateTime<Tz>> {
    let tomorrow = today.date_naive().succ_opt()?;
    let local = tomorrow.and_hms_opt(hour, 0, 0)?;
    today.timezone().from_local_datetime(&local).earliest()
}

/// Time left until `trigger` is due; zero when it is already due.
pub fn until_due(trigger: &Trigger, now: DateTime<Utc>) -> std::time::Duration {
    trigger
        .at
        .signed_duration_since(now)
        .to_std()
        .unwrap_or_default()
}
