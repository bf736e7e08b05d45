use crate::event::GameEvent;
use crate::game::Game;
use log::info;
use serde::{Deserialize, Serialize};

/// Phase state machine: Reinforce -> Attack -> Fortify -> TurnEnd ->
/// next active player's Reinforce, or GameOver once a single player
/// holds every territory.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum TurnPhase {
    Reinforce,
    Attack,
    Fortify,
    TurnEnd,
    GameOver,
}

impl Game {
    pub fn start_turn(&mut self) {
        self.reinforcement_armies = self.calculate_reinforcements(self.current_turn);
        self.initial_reinforcement_armies = self.reinforcement_armies;
        self.conquered_territory = false;
        self.set_phase(TurnPhase::Reinforce);
        info!(
            "round {} turn of player {}: {} reinforcement armies",
            self.round, self.current_turn, self.reinforcement_armies
        );
    }

    pub fn advance_phase(&mut self) {
        match self.turn_phase {
            TurnPhase::Reinforce => {
                if self.reinforcement_armies == 0 {
                    self.set_phase(TurnPhase::Attack);
                }
            }
            TurnPhase::Attack => {
                self.set_phase(TurnPhase::Fortify);
            }
            TurnPhase::Fortify => {
                self.end_turn();
            }
            TurnPhase::TurnEnd | TurnPhase::GameOver => {}
        }
    }

    pub fn end_turn(&mut self) {
        self.set_phase(TurnPhase::TurnEnd);

        // One card per turn with at least one conquest.
        if self.conquered_territory {
            if let Some(card) = self.deck.pop() {
                self.players[self.current_turn].cards.push(card);
            }
        }

        if self.active_players.len() <= 1 {
            self.set_phase(TurnPhase::GameOver);
            return;
        }

        if let Some(current_index) = self
            .active_players
            .iter()
            .position(|&p| p == self.current_turn)
        {
            let next_index = (current_index + 1) % self.active_players.len();
            self.current_turn = self.active_players[next_index];
            if next_index == 0 {
                self.round += 1;
            }
        } else {
            // Current player was eliminated on another player's turn; the
            // rotation resumes from the front of the active list.
            self.current_turn = self.active_players[0];
        }

        self.events.emit(&GameEvent::TurnEnded {
            next_player: self.current_turn,
        });
        self.start_turn();
    }

    pub(crate) fn set_phase(&mut self, phase: TurnPhase) {
        if self.turn_phase != phase {
            info!("phase change: {:?} -> {:?}", self.turn_phase, phase);
        }
        self.turn_phase = phase;
        self.events.emit(&GameEvent::PhaseChanged { phase });
    }
}
