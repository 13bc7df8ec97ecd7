//! Delayed continuations guarded by a battle generation.
//!
//! The post-turn settle pause is modelled as an explicit task due at a
//! point on a logical clock. Every task records the generation it was
//! scheduled in; bumping the generation (on retry) turns all earlier tasks
//! stale, and stale tasks are dropped when they come due instead of
//! running against the fresh battle.

use std::time::Duration;

/// A task waiting for its due time.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ScheduledTask<T> {
    due: Duration,
    generation: u64,
    payload: T,
}

/// Logical-clock scheduler for settle continuations.
///
/// ## Example
///
/// ```
/// use std::time::Duration;
/// use card_duel::turn::SettleScheduler;
///
/// let mut scheduler = SettleScheduler::new();
/// scheduler.schedule(Duration::from_secs(3), "settle");
///
/// assert!(scheduler.advance(Duration::from_secs(1)).is_empty());
/// assert_eq!(scheduler.advance(Duration::from_secs(2)), vec!["settle"]);
/// ```
#[derive(Clone, Debug)]
pub struct SettleScheduler<T> {
    now: Duration,
    generation: u64,
    queue: Vec<ScheduledTask<T>>,
}

impl<T> Default for SettleScheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            generation: 0,
            queue: Vec::new(),
        }
    }
}

impl<T> SettleScheduler<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current logical time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run `payload` once `delay` has elapsed, in the current generation.
    pub fn schedule(&mut self, delay: Duration, payload: T) {
        self.queue.push(ScheduledTask {
            due: self.now + delay,
            generation: self.generation,
            payload,
        });
    }

    /// Start a new generation. Everything scheduled so far becomes stale.
    pub fn invalidate(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// True if a task from the current generation is waiting.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.queue.iter().any(|t| t.generation == self.generation)
    }

    /// Tasks still queued, stale ones included.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Move the clock forward and return the payloads that came due, in
    /// due order. Stale tasks that came due are discarded.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        self.now += elapsed;
        let now = self.now;

        let (mut due, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.queue).into_iter().partition(|t| t.due <= now);
        self.queue = waiting;
        due.sort_by_key(|t| t.due);

        let generation = self.generation;
        due.into_iter()
            .filter_map(|task| {
                if task.generation == generation {
                    Some(task.payload)
                } else {
                    tracing::debug!(
                        task_generation = task.generation,
                        generation,
                        "discarding stale continuation"
                    );
                    None
                }
            })
            .collect()
    }
}
