use crate::event::GameEvent;
use crate::game::{Action, Game};
use crate::map::Map;
use crate::player::Player;
use crate::turn_phase::TurnPhase;
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Decision policy attached to a player for the whole game. `Human` means
/// the host drives every move through the explicit `Game` operations; the
/// other variants play their phases automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum StrategyKind {
    #[default]
    Human,
    Aggressive,
    Defensive,
    Random,
    /// Deliberate rule-breaker kept from the classic game: doubles its
    /// garrisons instead of drawing from the reinforcement pool and annexes
    /// neighbors without rolling dice.
    Cheater,
}

/// Adjacent territories of `territory` held by someone else.
pub fn defending_territories(map: &Map, territory: &str) -> Vec<String> {
    let Some(node) = map.get_territory(territory) else {
        return vec![];
    };
    let mut defending: Vec<String> = node
        .adjacent_territories
        .iter()
        .filter(|adjacent| map.owner_of(adjacent) != node.owner)
        .cloned()
        .collect();
    defending.sort();
    defending
}

/// True iff some owned territory can actually launch an attack: more than
/// one army and at least one enemy neighbor. Evaluated fresh every turn.
pub fn has_valid_attack_move(map: &Map, player: &Player) -> bool {
    player
        .territories
        .iter()
        .any(|t| map.get_armies(t) > 1 && !defending_territories(map, t).is_empty())
}

impl Game {
    /// Runs the current player's strategy through a full turn. A no-op for
    /// `Human` players and finished games.
    pub fn play_turn(&mut self) {
        if self.turn_phase == TurnPhase::GameOver {
            return;
        }
        if self.players[self.current_turn].strategy == StrategyKind::Human {
            return;
        }
        self.play_reinforcement_phase();
        if self.turn_phase == TurnPhase::Attack {
            self.play_attack_phase();
        }
        if self.turn_phase == TurnPhase::Fortify {
            self.play_fortification_phase();
        }
    }

    /// Places the entire reinforcement pool according to the strategy.
    /// Every variant but `Cheater` leaves a zero remainder through the
    /// regular `reinforce` operation.
    pub fn play_reinforcement_phase(&mut self) {
        if self.turn_phase != TurnPhase::Reinforce {
            return;
        }
        let player_id = self.current_turn;

        // A hand of five or more cards forces a trade before placement.
        while self.players[player_id].cards.len() >= 5 {
            let Some(Action::TradeCards { card_indices }) =
                self.get_possible_trades().into_iter().next()
            else {
                break;
            };
            if self.trade_cards(player_id, card_indices).is_err() {
                break;
            }
        }

        match self.players[player_id].strategy {
            StrategyKind::Human => return,
            StrategyKind::Aggressive => {
                let pool = self.reinforcement_armies;
                if let Some(target) = self
                    .strongest_frontline(player_id)
                    .or_else(|| self.players[player_id].sorted_territories().into_iter().next())
                {
                    let _ = self.reinforce(player_id, &target, pool);
                }
            }
            StrategyKind::Defensive => {
                while self.reinforcement_armies > 0 {
                    let Some(target) = self.weakest_territory(player_id) else {
                        break;
                    };
                    if self.reinforce(player_id, &target, 1).is_err() {
                        break;
                    }
                }
            }
            StrategyKind::Random => {
                let territories = self.players[player_id].sorted_territories();
                while self.reinforcement_armies > 0 {
                    let Some(target) = territories.choose(&mut self.rng).cloned() else {
                        break;
                    };
                    let num_armies = self.rng.gen_range(1..=self.reinforcement_armies);
                    if self.reinforce(player_id, &target, num_armies).is_err() {
                        break;
                    }
                }
            }
            StrategyKind::Cheater => {
                // Doubles every garrison instead of spending the pool.
                for territory in self.players[player_id].sorted_territories() {
                    let bonus = self.map.get_armies(&territory);
                    self.map.add_armies(&territory, bonus);
                    self.events.emit(&GameEvent::TerritoryReinforced {
                        territory,
                        num_armies: bonus,
                    });
                }
                self.reinforcement_armies = 0;
                self.set_phase(TurnPhase::Attack);
            }
        }

        if self.turn_phase == TurnPhase::Reinforce && self.reinforcement_armies == 0 {
            self.advance_phase();
        }
    }

    /// Runs attacks until the strategy elects to stop or no legal attack
    /// remains, then moves on to fortification. A rejected attack ends the
    /// phase instead of crashing the turn.
    pub fn play_attack_phase(&mut self) {
        if self.turn_phase != TurnPhase::Attack {
            return;
        }
        let player_id = self.current_turn;

        if !has_valid_attack_move(&self.map, &self.players[player_id]) {
            info!("no valid attack move available, moving to the Fortify phase");
            self.advance_phase();
            return;
        }

        match self.players[player_id].strategy {
            StrategyKind::Human => return,
            StrategyKind::Defensive => {}
            StrategyKind::Aggressive => {
                while self.turn_phase == TurnPhase::Attack {
                    let Some((from, to)) = self.pick_aggressive_attack(player_id) else {
                        break;
                    };
                    if self.attack(player_id, &from, &to, 3, true).is_err() {
                        break;
                    }
                }
            }
            StrategyKind::Random => {
                let rounds = self.rng.gen_range(0..=4);
                for _ in 0..rounds {
                    if self.turn_phase != TurnPhase::Attack {
                        return;
                    }
                    let attacks: Vec<(String, String, u16)> = self
                        .get_possible_attacks()
                        .into_iter()
                        .filter_map(|action| match action {
                            Action::Attack { from, to, max_dice } => Some((from, to, max_dice)),
                            _ => None,
                        })
                        .collect();
                    let Some((from, to, max_dice)) = attacks.choose(&mut self.rng).cloned() else {
                        break;
                    };
                    if self.attack(player_id, &from, &to, max_dice, false).is_err() {
                        break;
                    }
                }
            }
            StrategyKind::Cheater => {
                // Annexes every enemy neighbor of the territories held at
                // the start of the phase, no dice involved.
                for from in self.players[player_id].sorted_territories() {
                    for to in defending_territories(&self.map, &from) {
                        if self.turn_phase != TurnPhase::Attack {
                            return;
                        }
                        let Some(defender_id) = self.map.owner_of(&to) else {
                            continue;
                        };
                        if defender_id == player_id {
                            continue;
                        }
                        self.annex(player_id, defender_id, &to);
                    }
                }
            }
        }

        if self.turn_phase == TurnPhase::Attack {
            self.advance_phase();
        }
    }

    /// Performs at most one fortification move and concludes the turn.
    /// Returns whether a legal fortification actually happened.
    pub fn play_fortification_phase(&mut self) -> bool {
        if self.turn_phase != TurnPhase::Fortify {
            return false;
        }
        let player_id = self.current_turn;

        let moved = match self.players[player_id].strategy {
            StrategyKind::Human => return false,
            StrategyKind::Aggressive => self.fortify_aggressive(player_id),
            StrategyKind::Defensive => self.fortify_defensive(player_id),
            StrategyKind::Random => self.fortify_random(player_id),
            StrategyKind::Cheater => self.fortify_cheater(player_id),
        };

        if self.turn_phase == TurnPhase::Fortify {
            self.advance_phase();
        }
        moved
    }

    fn strongest_frontline(&self, player_id: usize) -> Option<String> {
        self.players[player_id]
            .sorted_territories()
            .into_iter()
            .filter(|t| !defending_territories(&self.map, t).is_empty())
            .max_by_key(|t| self.map.get_armies(t))
    }

    fn weakest_territory(&self, player_id: usize) -> Option<String> {
        self.players[player_id]
            .sorted_territories()
            .into_iter()
            .min_by_key(|t| self.map.get_armies(t))
    }

    fn pick_aggressive_attack(&self, player_id: usize) -> Option<(String, String)> {
        let from = self.players[player_id]
            .sorted_territories()
            .into_iter()
            .filter(|t| self.map.get_armies(t) > 1)
            .filter(|t| !defending_territories(&self.map, t).is_empty())
            .max_by_key(|t| self.map.get_armies(t))?;
        let to = defending_territories(&self.map, &from)
            .into_iter()
            .min_by_key(|t| self.map.get_armies(t))?;
        Some((from, to))
    }

    /// Cheater conquest: the defender's garrison is swept aside and a
    /// single occupying army placed, with the usual elimination and win
    /// bookkeeping.
    fn annex(&mut self, attacker_id: usize, defender_id: usize, territory: &str) {
        self.players[defender_id].remove_territory(territory);
        self.players[attacker_id].add_territory(territory);
        self.map.set_owner(territory, attacker_id);
        self.map.set_armies(territory, 1);
        self.conquered_territory = true;
        info!(
            "player {} annexed '{}' from player {}",
            attacker_id, territory, defender_id
        );
        self.events.emit(&GameEvent::TerritoryConquered {
            territory: territory.to_string(),
            new_owner: attacker_id,
        });

        if self.players[defender_id].territories.is_empty() {
            self.eliminate(defender_id, attacker_id);
        }
        if self.check_win_conditions() {
            self.set_phase(TurnPhase::GameOver);
            self.events.emit(&GameEvent::GameOver {
                winner: attacker_id,
            });
        }
    }

    fn fortify_aggressive(&mut self, player_id: usize) -> bool {
        let Some(target) = self.strongest_frontline(player_id) else {
            return false;
        };
        let source = self.players[player_id]
            .sorted_territories()
            .into_iter()
            .filter(|t| *t != target && self.map.get_armies(t) > 1)
            .filter(|t| self.map.connected_via_owner(player_id, t, &target))
            .max_by_key(|t| self.map.get_armies(t));
        let Some(source) = source else {
            return false;
        };
        let num_armies = self.map.get_armies(&source) - 1;
        self.fortify(player_id, &source, &target, num_armies).is_ok()
    }

    fn fortify_defensive(&mut self, player_id: usize) -> bool {
        let Some(target) = self.weakest_territory(player_id) else {
            return false;
        };
        let source = self.players[player_id]
            .sorted_territories()
            .into_iter()
            .filter(|t| *t != target && self.map.get_armies(t) > 1)
            .filter(|t| self.map.connected_via_owner(player_id, t, &target))
            .max_by_key(|t| self.map.get_armies(t));
        let Some(source) = source else {
            return false;
        };
        let num_armies = self.map.get_armies(&source) / 2;
        if num_armies == 0 {
            return false;
        }
        self.fortify(player_id, &source, &target, num_armies).is_ok()
    }

    fn fortify_random(&mut self, player_id: usize) -> bool {
        let moves: Vec<(String, String, u16)> = self
            .get_possible_fortifications()
            .into_iter()
            .filter_map(|action| match action {
                Action::Fortify {
                    from,
                    to,
                    max_armies,
                } => Some((from, to, max_armies)),
                _ => None,
            })
            .collect();
        let Some((from, to, max_armies)) = moves.choose(&mut self.rng).cloned() else {
            return false;
        };
        let num_armies = self.rng.gen_range(1..=max_armies);
        self.fortify(player_id, &from, &to, num_armies).is_ok()
    }

    /// Doubles the garrison of every border territory, another deliberate
    /// rule break.
    fn fortify_cheater(&mut self, player_id: usize) -> bool {
        let mut doubled = false;
        for territory in self.players[player_id].sorted_territories() {
            if defending_territories(&self.map, &territory).is_empty() {
                continue;
            }
            let bonus = self.map.get_armies(&territory);
            self.map.add_armies(&territory, bonus);
            self.events.emit(&GameEvent::Fortified {
                from: territory.clone(),
                to: territory,
                num_armies: bonus,
            });
            doubled = true;
        }
        doubled
    }
}
