//! Stepped code playback
//!
//! [`AnimationStepper`] is the pure position model over a listing's steps.
//! [`Playback`] wraps one in a watch channel and can advance it on a timer.

use crate::types::{CodeStep, ContentBlock};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;

/// Position within a fixed number of steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationStepper {
    total: usize,
    current: usize,
}

impl AnimationStepper {
    pub fn new(total: usize) -> Self {
        Self { total, current: 0 }
    }

    /// Stepper over the playback steps of a code block
    pub fn for_block(block: &ContentBlock) -> Self {
        Self::new(block.steps().len())
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Current step index, `None` when there are no steps
    pub fn current(&self) -> Option<usize> {
        (self.total > 0).then_some(self.current)
    }

    /// The step at the current position
    pub fn current_step<'a>(&self, steps: &'a [CodeStep]) -> Option<&'a CodeStep> {
        self.current().and_then(|i| steps.get(i))
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.total == 0 || self.current + 1 == self.total
    }

    /// Advance one step; returns false at the end
    pub fn next(&mut self) -> bool {
        if self.is_last() {
            return false;
        }
        self.current += 1;
        true
    }

    /// Go back one step; returns false at the start
    pub fn prev(&mut self) -> bool {
        if self.is_first() {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Jump to `index`; out-of-range indices are rejected
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.total {
            return false;
        }
        self.current = index;
        true
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    /// Fraction of the way through, from 0.0 at the first step to 1.0 at the last
    pub fn progress(&self) -> f32 {
        match self.total {
            0 => 0.0,
            1 => 1.0,
            n => self.current as f32 / (n - 1) as f32,
        }
    }
}

/// Timer-driven playback over an [`AnimationStepper`]
pub struct Playback {
    tx: watch::Sender<AnimationStepper>,
    playing: AtomicBool,
    generation: AtomicU64,
}

impl Playback {
    pub fn new(stepper: AnimationStepper) -> Self {
        let (tx, _rx) = watch::channel(stepper);
        Self {
            tx,
            playing: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        }
    }

    /// Current position
    pub fn stepper(&self) -> AnimationStepper {
        *self.tx.borrow()
    }

    /// Receiver notified on every position change
    pub fn subscribe(&self) -> watch::Receiver<AnimationStepper> {
        self.tx.subscribe()
    }

    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::SeqCst)
    }

    /// Stop any running playback
    pub fn pause(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.playing.store(false, Ordering::SeqCst);
    }

    /// Manual step forward; pauses playback
    pub fn next(&self) -> bool {
        self.pause();
        self.tx.send_if_modified(AnimationStepper::next)
    }

    /// Manual step back; pauses playback
    pub fn prev(&self) -> bool {
        self.pause();
        self.tx.send_if_modified(AnimationStepper::prev)
    }

    /// Manual jump; pauses playback
    pub fn go_to(&self, index: usize) -> bool {
        self.pause();
        self.tx.send_if_modified(|s| s.go_to(index))
    }

    pub fn reset(&self) {
        self.pause();
        self.tx.send_if_modified(|s| {
            let moved = !s.is_first();
            s.reset();
            moved
        });
    }

    /// Advance one step every `interval` until the last step or until paused.
    ///
    /// Playing from the last step starts over from the first. Starting a new
    /// playback supersedes any playback already running.
    pub async fn play(&self, interval: Duration) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.playing.store(true, Ordering::SeqCst);

        if self.stepper().is_last() {
            self.tx.send_if_modified(|s| {
                let moved = !s.is_first();
                s.reset();
                moved
            });
        }

        loop {
            if self.stepper().is_last() {
                break;
            }
            tokio::time::sleep(interval).await;
            if self.generation.load(Ordering::SeqCst) != generation {
                return;
            }
            self.tx.send_if_modified(AnimationStepper::next);
        }

        if self.generation.load(Ordering::SeqCst) == generation {
            self.playing.store(false, Ordering::SeqCst);
        }
    }
}
