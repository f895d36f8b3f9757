//! Game events and listener dispatch
//!
//! Listeners are sinks (UI, audio, haptics). They are called synchronously in
//! subscription order, after core state for the attempt is fully committed. A
//! panicking listener is logged and skipped; the others still run.

use std::panic::{AssertUnwindSafe, catch_unwind};

use crate::achievements::AchievementDefinition;
use crate::judge::Judgment;
use crate::mode::GameMode;
use crate::stats::StatEvent;

/// Everything the core reports to the outside
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A lock attempt was judged
    Lock(Judgment),
    /// Score grew by `added` to `score`
    ScoreChanged { score: u32, added: u32 },
    /// Combo after an attempt, sent on every lock
    ComboChanged(u32),
    /// A live combo was broken
    ComboReset,
    StatChanged(StatEvent),
    AchievementUnlocked(AchievementDefinition),
    GameStart(GameMode),
    /// A new round (not a retry) began
    RoundStart(u32),
    ShapeProgress { completed: u32, required: u32 },
    MissesChanged { misses: u32, max: u32 },
    /// Time Attack seconds left
    TimerTick(f32),
    LevelComplete { level: usize },
    GameOver,
}

/// Event sink
pub trait Listener {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F: FnMut(&GameEvent)> Listener for F {
    fn on_event(&mut self, event: &GameEvent) {
        self(event)
    }
}

/// Handle returned by `EventBus::subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Ordered listener list
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Box<dyn Listener>)>,
    next_id: u32,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener after all existing ones
    pub fn subscribe(&mut self, listener: impl Listener + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener; returns false if it was not subscribed
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver one event to every listener in order
    pub fn dispatch(&mut self, event: &GameEvent) {
        for (id, listener) in &mut self.listeners {
            let delivered = catch_unwind(AssertUnwindSafe(|| listener.on_event(event)));
            if delivered.is_err() {
                log::warn!("Listener {:?} panicked handling {:?}", id, event);
            }
        }
    }

    /// Deliver a batch in order
    pub fn dispatch_all(&mut self, events: &[GameEvent]) {
        for event in events {
            self.dispatch(event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
