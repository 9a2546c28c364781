//! Periodic job scheduler
//!
//! A small explicit registry of `{name, interval, handler}` jobs driven
//! by a foreground loop. Each firing runs to completion before the job is
//! rescheduled, so one job never overlaps with itself; the sync pass's
//! run lock additionally protects it from triggers outside this process.

use std::time::{Duration, Instant};

use tracing::{debug, error, info};

type Handler = Box<dyn FnMut() + Send>;

struct ScheduledJob {
    name: String,
    interval: Duration,
    next_due: Instant,
    handler: Handler,
}

/// Registry and driver for periodic jobs
#[derive(Default)]
pub struct Scheduler {
    jobs: Vec<ScheduledJob>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job; its first firing is immediate
    pub fn register(
        &mut self,
        name: impl Into<String>,
        interval: Duration,
        handler: impl FnMut() + Send + 'static,
    ) {
        let name = name.into();
        info!(job = %name, interval_secs = interval.as_secs(), "job registered");
        self.jobs.push(ScheduledJob {
            name,
            interval,
            next_due: Instant::now(),
            handler: Box::new(handler),
        });
    }

    /// Run every job due at `now`, reschedule each after it returns, and
    /// report the next deadline (`None` when no jobs are registered)
    pub fn tick(&mut self, now: Instant) -> Option<Instant> {
        for job in &mut self.jobs {
            if job.next_due <= now {
                debug!(job = %job.name, "firing");
                (job.handler)();
                // Rescheduled from completion, not from the due time, so a
                // slow firing cannot queue up a burst of catch-up firings
                job.next_due = Instant::now() + job.interval;
            }
        }
        self.jobs.iter().map(|job| job.next_due).min()
    }

    /// Drive the registry until the process exits
    pub fn run(&mut self) {
        if self.jobs.is_empty() {
            error!("no jobs registered, nothing to schedule");
            return;
        }
        loop {
            let next = self.tick(Instant::now());
            if let Some(deadline) = next {
                let now = Instant::now();
                if deadline > now {
                    std::thread::sleep(deadline - now);
                }
            }
        }
    }
}
