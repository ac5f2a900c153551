//! Fixed-rate task scheduler for recurring tasks
//!
//! Ticks are spaced a fixed period apart regardless of how long each
//! execution takes. Every execution is spawned onto its own task, so a run
//! that overruns the period overlaps with the next one.
//!
//! Uses `tokio-cron-scheduler` repeated jobs for the timer. Its tick loop
//! wakes roughly every 500 ms, so a tick can fire up to half a second before
//! its nominal instant and consecutive ticks drift by a few milliseconds.
//! Periods are honoured to that granularity, not exactly.

use std::{
    collections::HashMap,
    fmt,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Invalid period for task {0}: must be greater than zero")]
    InvalidPeriod(String),

    #[error("Task already exists: {0}")]
    DuplicateTask(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    /// Failure reported by the underlying job scheduler
    #[error("Internal scheduler error: {0}")]
    Internal(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Waiting for the next tick
    Scheduled,
    /// At least one execution in flight
    Running,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Scheduled => "scheduled",
            Self::Running => "running",
        })
    }
}

/// Point-in-time view of one task's execution history
#[derive(Debug, Clone)]
pub struct TaskStats {
    pub name: String,
    pub period: Duration,
    pub status: TaskStatus,
    /// Executions spawned so far, finished or not
    pub started: u64,
    pub success_count: u64,
    pub failure_count: u64,
    /// Executions started but not yet finished
    pub in_flight: u64,
    pub last_started: Option<DateTime<Utc>>,
    pub last_finished: Option<DateTime<Utc>>,
    /// Error message of the most recent failed execution
    pub last_error: Option<String>,
    /// Mean wall time of finished executions
    pub mean_duration: Duration,
}

#[derive(Debug, Default)]
struct RunHistory {
    started: u64,
    succeeded: u64,
    failed: u64,
    last_started: Option<DateTime<Utc>>,
    last_finished: Option<DateTime<Utc>>,
    last_error: Option<String>,
    busy: Duration,
}

/// Shared between the scheduler and every spawned execution of one task
#[derive(Debug)]
struct TaskTracker {
    name: String,
    period: Duration,
    in_flight: AtomicU64,
    history: Mutex<RunHistory>,
}

impl TaskTracker {
    fn new(name: &str, period: Duration) -> Self {
        Self {
            name: name.to_string(),
            period,
            in_flight: AtomicU64::new(0),
            history: Mutex::new(RunHistory::default()),
        }
    }

    fn begin(&self) {
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        let mut history = self.history.lock();
        history.started += 1;
        history.last_started = Some(Utc::now());
    }

    fn finish(&self, outcome: Result<(), String>, elapsed: Duration) {
        {
            let mut history = self.history.lock();
            history.busy += elapsed;
            history.last_finished = Some(Utc::now());
            match outcome {
                Ok(()) => history.succeeded += 1,
                Err(e) => {
                    history.failed += 1;
                    history.last_error = Some(e);
                },
            }
        }
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> TaskStats {
        let in_flight = self.in_flight.load(Ordering::Relaxed);
        let history = self.history.lock();
        let finished = history.succeeded + history.failed;
        let mean_duration = u32::try_from(finished)
            .ok()
            .filter(|n| *n > 0)
            .map_or(Duration::ZERO, |n| history.busy / n);

        TaskStats {
            name: self.name.clone(),
            period: self.period,
            status: if in_flight > 0 {
                TaskStatus::Running
            } else {
                TaskStatus::Scheduled
            },
            started: history.started,
            success_count: history.succeeded,
            failure_count: history.failed,
            in_flight,
            last_started: history.last_started,
            last_finished: history.last_finished,
            last_error: history.last_error.clone(),
            mean_duration,
        }
    }
}

/// Spawn one execution of `task`, recording its outcome on `tracker`
fn launch<F, Fut>(task: &F, tracker: &Arc<TaskTracker>)
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<(), String>> + Send + 'static,
{
    let run = task();
    let tracker = Arc::clone(tracker);
    tracker.begin();

    tokio::spawn(async move {
        debug!(task = %tracker.name, "Execution started");
        let clock = Instant::now();
        let outcome = run.await;
        let elapsed = clock.elapsed();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        match &outcome {
            Ok(()) => info!(task = %tracker.name, elapsed_ms, "Execution finished"),
            Err(e) => error!(task = %tracker.name, error = %e, elapsed_ms, "Execution failed"),
        }
        tracker.finish(outcome, elapsed);
    });
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Start ticking as soon as the scheduler is created
    pub auto_start: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { auto_start: true }
    }
}

struct Registration {
    job_id: Uuid,
    tracker: Arc<TaskTracker>,
}

/// Named fixed-rate tasks on top of a `JobScheduler`
pub struct TaskScheduler {
    jobs: AsyncMutex<JobScheduler>,
    registrations: RwLock<HashMap<String, Registration>>,
    running: AtomicBool,
}

impl fmt::Debug for TaskScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("running", &self.is_running())
            .field("tasks", &self.task_count())
            .finish_non_exhaustive()
    }
}

impl TaskScheduler {
    #[instrument(skip_all, fields(auto_start = config.auto_start))]
    pub async fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let scheduler = Self {
            jobs: AsyncMutex::new(JobScheduler::new().await?),
            registrations: RwLock::new(HashMap::new()),
            running: AtomicBool::new(false),
        };

        if config.auto_start {
            scheduler.start().await?;
        }
        Ok(scheduler)
    }

    /// Begin firing ticks; a no-op when already running
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.is_running() {
            return Ok(());
        }
        self.jobs.lock().await.start().await?;
        self.running.store(true, Ordering::Relaxed);
        info!("Task scheduler started");
        Ok(())
    }

    /// Stop firing ticks
    ///
    /// Executions already in flight are not cancelled.
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        if !self.is_running() {
            return Ok(());
        }
        self.jobs.lock().await.shutdown().await?;
        self.running.store(false, Ordering::Relaxed);
        info!("Task scheduler stopped");
        Ok(())
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Register a fixed-rate task
    ///
    /// Ticks fire every `period` whether or not the previous execution has
    /// finished. With `run_immediately`, one execution is spawned right away
    /// in addition to the periodic ticks.
    #[instrument(skip(self, task), fields(period_secs = period.as_secs_f64()))]
    pub async fn add_fixed_rate_task<F, Fut>(
        &self,
        name: &str,
        period: Duration,
        run_immediately: bool,
        task: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        if period.is_zero() {
            return Err(SchedulerError::InvalidPeriod(name.to_string()));
        }
        if self.registrations.read().contains_key(name) {
            return Err(SchedulerError::DuplicateTask(name.to_string()));
        }

        let tracker = Arc::new(TaskTracker::new(name, period));
        let task = Arc::new(task);

        let tick_task = Arc::clone(&task);
        let tick_tracker = Arc::clone(&tracker);
        let job = Job::new_repeated_async(period, move |_job_id, _scheduler| {
            launch(tick_task.as_ref(), &tick_tracker);
            Box::pin(async {})
        })?;
        let job_id = job.guid();
        self.jobs.lock().await.add(job).await?;

        self.registrations.write().insert(
            name.to_string(),
            Registration {
                job_id,
                tracker: Arc::clone(&tracker),
            },
        );

        if run_immediately {
            launch(task.as_ref(), &tracker);
        }

        info!(task = %name, run_immediately, "Task scheduled");
        Ok(())
    }

    /// Unregister a task; in-flight executions run to completion
    pub async fn remove_task(&self, name: &str) -> Result<(), SchedulerError> {
        let registration = self
            .registrations
            .write()
            .remove(name)
            .ok_or_else(|| SchedulerError::TaskNotFound(name.to_string()))?;

        self.jobs.lock().await.remove(&registration.job_id).await?;
        info!(task = %name, "Task removed");
        Ok(())
    }

    #[must_use]
    pub fn get_task_stats(&self, name: &str) -> Option<TaskStats> {
        self.registrations
            .read()
            .get(name)
            .map(|r| r.tracker.snapshot())
    }

    #[must_use]
    pub fn list_tasks(&self) -> Vec<String> {
        self.registrations.read().keys().cloned().collect()
    }

    #[must_use]
    pub fn task_count(&self) -> usize {
        self.registrations.read().len()
    }
}
