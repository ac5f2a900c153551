//! Factory functions for scheduled tasks
//!
//! Provides the task closure the scheduler runs for periodic weather
//! collection, plus a helper that registers it with the configured interval.

use std::{sync::Arc, time::Duration};

use application::services::WeatherCollector;
use futures::future::BoxFuture;
use tracing::debug;

use crate::{
    config::CollectorConfig,
    scheduler::{SchedulerError, TaskScheduler},
};

/// Task name for the weather collection pass
pub const WEATHER_COLLECTION_TASK: &str = "weather_collection";

/// Create a weather collection task closure
///
/// Each invocation runs one full pass. Per-city failures are handled inside
/// the collector, so the task itself always reports success.
pub fn create_weather_collection_task(
    collector: Arc<WeatherCollector>,
) -> impl Fn() -> BoxFuture<'static, Result<(), String>> + Send + Sync + 'static {
    move || {
        let collector = Arc::clone(&collector);

        Box::pin(async move {
            debug!("Running weather collection pass");
            collector.collect_all().await;
            Ok(())
        })
    }
}

/// Register the weather collection task on a scheduler
pub async fn schedule_weather_collection(
    scheduler: &TaskScheduler,
    collector: Arc<WeatherCollector>,
    config: &CollectorConfig,
) -> Result<(), SchedulerError> {
    scheduler
        .add_fixed_rate_task(
            WEATHER_COLLECTION_TASK,
            Duration::from_secs(config.interval_secs),
            config.run_on_startup,
            create_weather_collection_task(collector),
        )
        .await
}
