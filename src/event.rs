use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent};

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    _tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let _tx = tx.clone();

        thread::spawn(move || {
            loop {
                let ready = match event::poll(tick_rate) {
                    Ok(ready) => ready,
                    Err(e) => {
                        log::warn!("event poll failed: {e}");
                        false
                    }
                };
                let next = if ready {
                    match event::read() {
                        Ok(Event::Key(key)) => Some(AppEvent::Key(key)),
                        Ok(Event::Resize(w, h)) => Some(AppEvent::Resize(w, h)),
                        _ => None,
                    }
                } else {
                    Some(AppEvent::Tick)
                };
                if let Some(ev) = next {
                    if tx.send(ev).is_err() {
                        return;
                    }
                }
            }
        });

        Self { rx, _tx }
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}

/// Work the front end defers until a pause has passed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Deferred {
    /// Move the times-table quiz on to its next question.
    AdvanceTable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingAction {
    pub action: Deferred,
    /// Session generation the action was scheduled for.
    pub generation: u64,
    pub due: Instant,
}

/// Holds at most one delayed action and drops it if the session it was
/// scheduled for has since been replaced.
#[derive(Debug, Default)]
pub struct Pacer {
    generation: u64,
    pending: Option<PendingAction>,
}

impl Pacer {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Call whenever a session starts or is abandoned.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn schedule(&mut self, action: Deferred, delay: Duration, now: Instant) {
        self.pending = Some(PendingAction {
            action,
            generation: self.generation,
            due: now + delay,
        });
    }

    pub fn is_waiting(&self) -> bool {
        self.pending
            .is_some_and(|p| p.generation == self.generation)
    }

    /// Returns the action once it is due. Stale actions are discarded.
    pub fn poll(&mut self, now: Instant) -> Option<Deferred> {
        let pending = self.pending?;
        if pending.generation != self.generation {
            log::debug!(
                "dropping stale {:?} from generation {} (now {})",
                pending.action,
                pending.generation,
                self.generation
            );
            self.pending = None;
            return None;
        }
        if now < pending.due {
            return None;
        }
        self.pending = None;
        Some(pending.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_only_when_due() {
        let mut pacer = Pacer::default();
        let start = Instant::now();
        pacer.schedule(Deferred::AdvanceTable, Duration::from_millis(1000), start);
        assert!(pacer.is_waiting());
        assert_eq!(pacer.poll(start + Duration::from_millis(999)), None);
        assert_eq!(
            pacer.poll(start + Duration::from_millis(1000)),
            Some(Deferred::AdvanceTable)
        );
        assert!(!pacer.is_waiting());
        assert_eq!(pacer.poll(start + Duration::from_millis(5000)), None);
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let mut pacer = Pacer::default();
        let start = Instant::now();
        pacer.schedule(Deferred::AdvanceTable, Duration::from_millis(1500), start);
        pacer.next_generation();
        assert!(!pacer.is_waiting());
        assert_eq!(pacer.poll(start + Duration::from_secs(2)), None);
        assert_eq!(pacer.pending, None);
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let mut pacer = Pacer::default();
        let start = Instant::now();
        pacer.schedule(Deferred::AdvanceTable, Duration::from_millis(1500), start);
        pacer.schedule(Deferred::AdvanceTable, Duration::from_millis(100), start);
        assert_eq!(
            pacer.poll(start + Duration::from_millis(200)),
            Some(Deferred::AdvanceTable)
        );
    }
}
