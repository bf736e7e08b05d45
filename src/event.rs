use crate::turn_phase::TurnPhase;
use serde::Serialize;
use std::fmt;

/// Typed mutation events. One is emitted after every externally visible
/// change so a presentation layer can refresh without polling.
#[derive(Clone, Debug, Serialize)]
pub enum GameEvent {
    PhaseChanged {
        phase: TurnPhase,
    },
    TerritoryReinforced {
        territory: String,
        num_armies: u16,
    },
    AttackResolved {
        from: String,
        to: String,
        attacker_losses: u16,
        defender_losses: u16,
    },
    TerritoryConquered {
        territory: String,
        new_owner: usize,
    },
    PlayerEliminated {
        player: usize,
    },
    Fortified {
        from: String,
        to: String,
        num_armies: u16,
    },
    CardsTraded {
        player: usize,
        bonus_armies: u16,
    },
    TurnEnded {
        next_player: usize,
    },
    GameOver {
        winner: usize,
    },
}

type Listener = Box<dyn Fn(&GameEvent) + Send>;

/// Subscribe/emit bus replacing Observable-style change notification.
/// Listeners are host-side wiring, not game state: the bus is skipped by
/// serde and absent from snapshots.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: Fn(&GameEvent) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn emit(&self, event: &GameEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn emit_reaches_every_subscriber() {
        let mut bus = EventBus::default();
        let seen = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let seen = seen.clone();
            bus.subscribe(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
            });
        }
        bus.emit(&GameEvent::PhaseChanged {
            phase: TurnPhase::Reinforce,
        });
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }
}
