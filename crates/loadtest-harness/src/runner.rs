//! Virtual-user runner.
//!
//! Spawns one tokio task per virtual user, ramped up at a fixed rate, and
//! stops them cooperatively between tasks when the run time elapses or the
//! shutdown token is cancelled.

use crate::user::{VirtualUser, WaitTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Runner settings.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Number of virtual users to start
    pub users: usize,
    /// Users started per second (0 = all at once)
    pub spawn_rate: f64,
    /// Stop after this long (None = until the shutdown token is cancelled)
    pub run_time: Option<Duration>,
    /// Delay between tasks of one user
    pub wait_time: WaitTime,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            users: 1,
            spawn_rate: 1.0,
            run_time: None,
            wait_time: WaitTime::default(),
        }
    }
}

impl RunnerConfig {
    /// Delay between two user spawns.
    ///
    /// Rates too small to express as a `Duration` saturate to `Duration::MAX`,
    /// which spawns the first user only.
    fn spawn_interval(&self) -> Duration {
        if self.spawn_rate > 0.0 && self.spawn_rate.is_finite() {
            Duration::try_from_secs_f64(1.0 / self.spawn_rate).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub users_requested: usize,
    pub users_started: usize,
    pub users_failed: usize,
    pub tasks_completed: u64,
    pub elapsed: Duration,
}

enum UserOutcome {
    Finished,
    FailedToStart,
}

/// Drives a population of virtual users.
pub struct Runner {
    config: RunnerConfig,
    shutdown: CancellationToken,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        Self {
            config,
            shutdown: CancellationToken::new(),
        }
    }

    /// Token that stops the run when cancelled (e.g. from a Ctrl-C handler).
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Run users built by `factory` until the run time elapses or shutdown.
    ///
    /// `factory` receives the zero-based user index.
    pub async fn run<U, F>(&self, mut factory: F) -> RunSummary
    where
        U: VirtualUser + 'static,
        F: FnMut(usize) -> U,
    {
        let start = Instant::now();
        let tasks_completed = Arc::new(AtomicU64::new(0));

        info!(
            "Starting {} users (spawn rate: {}/s, run time: {:?}, wait: {:?})",
            self.config.users, self.config.spawn_rate, self.config.run_time, self.config.wait_time
        );

        let timer = self.config.run_time.map(|run_time| {
            let token = self.shutdown.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = tokio::time::sleep(run_time) => {
                        info!("Run time of {:?} reached, stopping users", run_time);
                        token.cancel();
                    }
                    _ = token.cancelled() => {}
                }
            })
        });

        let interval = self.config.spawn_interval();
        let mut handles: Vec<JoinHandle<UserOutcome>> = Vec::with_capacity(self.config.users);

        for user_id in 0..self.config.users {
            if self.shutdown.is_cancelled() {
                break;
            }

            let user = factory(user_id);
            handles.push(tokio::spawn(run_user(
                user_id,
                user,
                self.config.wait_time,
                self.shutdown.clone(),
                tasks_completed.clone(),
            )));
            debug!("Spawned user {}", user_id);

            if user_id + 1 < self.config.users && !interval.is_zero() {
                tokio::select! {
                    _ = tokio::time::sleep(interval) => {}
                    _ = self.shutdown.cancelled() => break,
                }
            }
        }

        info!("{} users spawned", handles.len());

        let mut summary = RunSummary {
            users_requested: self.config.users,
            ..RunSummary::default()
        };

        for handle in handles {
            match handle.await {
                Ok(UserOutcome::Finished) => summary.users_started += 1,
                Ok(UserOutcome::FailedToStart) => summary.users_failed += 1,
                Err(e) => {
                    error!("User task panicked: {}", e);
                    summary.users_failed += 1;
                }
            }
        }

        // Stop the run-time timer if users ended on their own
        self.shutdown.cancel();
        if let Some(timer) = timer {
            let _ = timer.await;
        }

        summary.tasks_completed = tasks_completed.load(Ordering::Relaxed);
        summary.elapsed = start.elapsed();

        info!(
            "Run complete: {} users started, {} failed, {} tasks in {:?}",
            summary.users_started, summary.users_failed, summary.tasks_completed, summary.elapsed
        );

        summary
    }
}

async fn run_user<U: VirtualUser>(
    user_id: usize,
    mut user: U,
    wait_time: WaitTime,
    shutdown: CancellationToken,
    tasks_completed: Arc<AtomicU64>,
) -> UserOutcome {
    if let Err(e) = user.on_start().await {
        error!("User {} failed to start: {}", user_id, e);
        return UserOutcome::FailedToStart;
    }

    let mut rng = StdRng::from_entropy();

    loop {
        // Never interrupted: stop checks happen only between tasks
        user.task().await;
        tasks_completed.fetch_add(1, Ordering::Relaxed);

        if shutdown.is_cancelled() {
            break;
        }

        let delay = wait_time.next_delay(&mut rng);
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = shutdown.cancelled() => break,
        }
    }

    user.on_stop().await;
    debug!("User {} stopped", user_id);
    UserOutcome::Finished
}
