//! Timer pool
//!
//! A single scheduler task maintains the set of active timers ordered by
//! deadline and fires callbacks when they elapse. Callbacks run on the
//! scheduler task and must stay short; long work belongs on the
//! [`WorkerPool`](super::worker_pool::WorkerPool). Stop/restart from within
//! a callback are well-defined: commands are queued and applied before the
//! next deadline computation.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

type TimerCallback = Arc<dyn Fn() + Send + Sync>;

enum TimerCommand {
    Start {
        id: u64,
        interval: Duration,
        single_shot: bool,
        callback: TimerCallback,
        started: Arc<AtomicBool>,
    },
    Stop {
        id: u64,
    },
    Restart {
        id: u64,
        interval: Duration,
    },
}

struct TimerEntry {
    interval: Duration,
    single_shot: bool,
    deadline: Instant,
    callback: TimerCallback,
    started: Arc<AtomicBool>,
}

/// Pool of software timers driven by one scheduler task.
pub struct TimerPool {
    commands: mpsc::UnboundedSender<TimerCommand>,
    next_timer_id: AtomicU64,
}

impl TimerPool {
    /// Create the pool and spawn its scheduler task. The task exits when the
    /// pool (and all its timers) are dropped.
    pub fn new() -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(scheduler_loop(rx));
        Arc::new(Self {
            commands: tx,
            next_timer_id: AtomicU64::new(1),
        })
    }

    /// Create a timer bound to this pool. The callback fires on the
    /// scheduler task each time the timer elapses.
    pub fn create_timer<F>(self: &Arc<Self>, callback: F) -> Timer
    where
        F: Fn() + Send + Sync + 'static,
    {
        Timer {
            id: self.next_timer_id.fetch_add(1, Ordering::SeqCst),
            commands: self.commands.clone(),
            callback: Arc::new(callback),
            started: Arc::new(AtomicBool::new(false)),
        }
    }
}

async fn scheduler_loop(mut rx: mpsc::UnboundedReceiver<TimerCommand>) {
    let mut entries: HashMap<u64, TimerEntry> = HashMap::new();
    // Heap entries may be stale after stop/restart; validated against
    // `entries` on pop.
    let mut heap: BinaryHeap<Reverse<(Instant, u64)>> = BinaryHeap::new();

    loop {
        let next_deadline = heap.peek().map(|Reverse((at, _))| *at);

        tokio::select! {
            cmd = rx.recv() => {
                match cmd {
                    Some(TimerCommand::Start { id, interval, single_shot, callback, started }) => {
                        let deadline = Instant::now() + interval;
                        started.store(true, Ordering::SeqCst);
                        entries.insert(id, TimerEntry { interval, single_shot, deadline, callback, started });
                        heap.push(Reverse((deadline, id)));
                    }
                    Some(TimerCommand::Stop { id }) => {
                        if let Some(entry) = entries.remove(&id) {
                            entry.started.store(false, Ordering::SeqCst);
                        }
                    }
                    Some(TimerCommand::Restart { id, interval }) => {
                        if let Some(entry) = entries.get_mut(&id) {
                            entry.interval = interval;
                            entry.deadline = Instant::now() + interval;
                            heap.push(Reverse((entry.deadline, id)));
                        }
                    }
                    // All handles and the pool are gone
                    None => break,
                }
            }
            _ = sleep_until(next_deadline.unwrap_or_else(|| Instant::now() + FAR_FUTURE)), if next_deadline.is_some() => {
                let now = Instant::now();
                while let Some(Reverse((at, id))) = heap.peek().copied() {
                    if at > now {
                        break;
                    }
                    heap.pop();

                    // Validate against the live entry; stale heap nodes are skipped
                    let fire = match entries.get(&id) {
                        Some(entry) if entry.deadline == at => true,
                        _ => false,
                    };
                    if !fire {
                        continue;
                    }

                    let callback = {
                        let entry = entries.get_mut(&id).unwrap();
                        if entry.single_shot {
                            let entry = entries.remove(&id).unwrap();
                            entry.started.store(false, Ordering::SeqCst);
                            entry.callback
                        } else {
                            entry.deadline += entry.interval;
                            heap.push(Reverse((entry.deadline, id)));
                            entry.callback.clone()
                        }
                    };
                    callback();
                }
            }
        }
    }
    debug!("Timer pool scheduler stopped");
}

const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 100);

// ── Timer ──────────────────────────────────────────────────────

/// Handle to a timer owned by a [`TimerPool`].
///
/// Dropping the handle stops the timer.
pub struct Timer {
    id: u64,
    commands: mpsc::UnboundedSender<TimerCommand>,
    callback: TimerCallback,
    started: Arc<AtomicBool>,
}

impl Timer {
    /// Start as a periodic timer with the given interval.
    pub fn start(&self, interval: Duration) {
        let _ = self.commands.send(TimerCommand::Start {
            id: self.id,
            interval,
            single_shot: false,
            callback: self.callback.clone(),
            started: self.started.clone(),
        });
    }

    /// Start as a single-shot timer firing once after `delay`.
    pub fn start_single_shot(&self, delay: Duration) {
        let _ = self.commands.send(TimerCommand::Start {
            id: self.id,
            interval: delay,
            single_shot: true,
            callback: self.callback.clone(),
            started: self.started.clone(),
        });
    }

    /// Stop the timer. A no-op if it is not running.
    pub fn stop(&self) {
        let _ = self.commands.send(TimerCommand::Stop { id: self.id });
    }

    /// Reschedule with a new interval, keeping the periodic/single-shot mode.
    pub fn restart(&self, interval: Duration) {
        let _ = self.commands.send(TimerCommand::Restart {
            id: self.id,
            interval,
        });
    }

    /// Whether the timer is currently scheduled.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        let _ = self.commands.send(TimerCommand::Stop { id: self.id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[tokio::test]
    async fn single_shot_fires_once() {
        let pool = TimerPool::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let timer = pool.create_timer(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        timer.start_single_shot(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!timer.is_started());
    }

    #[tokio::test]
    async fn periodic_fires_repeatedly() {
        let pool = TimerPool::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let timer = pool.create_timer(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        timer.start(Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(55)).await;
        timer.stop();
        assert!(count.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn stop_prevents_firing() {
        let pool = TimerPool::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let timer = pool.create_timer(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        timer.start_single_shot(Duration::from_millis(50));
        timer.stop();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn restart_reschedules() {
        let pool = TimerPool::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        let timer = pool.create_timer(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        timer.start_single_shot(Duration::from_millis(20));
        // Push the deadline far out before it can fire
        timer.restart(Duration::from_secs(60));
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn drop_stops_timer() {
        let pool = TimerPool::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        {
            let timer = pool.create_timer(move || {
                c.fetch_add(1, Ordering::SeqCst);
            });
            timer.start(Duration::from_millis(10));
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
