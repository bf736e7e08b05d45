use crate::card::Card;
use crate::combat;
use crate::error::{GameActionError, MapValidationError};
use crate::event::{EventBus, GameEvent};
use crate::game_config::GameConfig;
use crate::map::Map;
use crate::player::Player;
use crate::strategy::{self, StrategyKind};
use crate::turn_phase::TurnPhase;
use itertools::Itertools;
use log::info;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Snapshot of the public game state, handed to hosts and presentation
/// layers. The map inside is a deep copy and shares nothing with the live
/// game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub current_player: String,
    pub current_turn: usize,
    pub round: usize,
    pub turn_phase: TurnPhase,
    pub conquered_territory: bool,
    pub reinforcement_armies: u16,
    pub initial_reinforcement_armies: u16,
    pub defeated_players: Vec<usize>,
    pub possible_actions: Vec<Action>,
    pub players: Vec<Player>,
    pub map: Map,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Game {
    pub players: Vec<Player>,
    pub map: Map,
    pub current_turn: usize,
    pub round: usize,
    pub turn_phase: TurnPhase,
    pub reinforcement_armies: u16,
    pub initial_reinforcement_armies: u16,
    pub deck: Vec<Card>,
    pub discard_pile: Vec<Card>,
    pub conquered_territory: bool,
    pub defeated_players: Vec<usize>,
    pub active_players: Vec<usize>,
    #[serde(skip)]
    pub events: EventBus,
    #[serde(skip, default = "default_rng")]
    pub(crate) rng: SmallRng,
}

fn default_rng() -> SmallRng {
    SmallRng::from_entropy()
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum Action {
    Reinforce {
        territory: String,
        max_armies: u16,
    },
    Attack {
        from: String,
        to: String,
        max_dice: u16,
    },
    Fortify {
        from: String,
        to: String,
        max_armies: u16,
    },
    TradeCards {
        card_indices: Vec<usize>,
    },
    EndPhase,
}

impl Game {
    /// Builds a game from a scenario config, or from the bundled default
    /// map with randomly distributed territories. `seed` fixes the dice
    /// and the shuffles for deterministic games.
    pub fn new(
        config: Option<GameConfig>,
        num_players: Option<usize>,
        seed: Option<u64>,
    ) -> Result<Self, MapValidationError> {
        let mut rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let config = config.unwrap_or_else(Game::default_config);
        let (mut map, mut players) = config.to_map_and_players()?;
        if players.is_empty() {
            let requested = num_players.unwrap_or(6);
            let territories = map.territories.len();
            if requested < 2 || requested > territories {
                return Err(MapValidationError::InvalidPlayerCount {
                    requested,
                    territories,
                });
            }
            players = Game::create_random_players(requested, &mut map, &mut rng);
        }

        let deck = Game::create_deck(&map, &mut rng);
        let active_players = (0..players.len()).collect();

        let mut game = Self {
            players,
            map,
            current_turn: 0,
            round: 0,
            turn_phase: TurnPhase::Reinforce,
            deck,
            discard_pile: vec![],
            reinforcement_armies: 0,
            initial_reinforcement_armies: 0,
            conquered_territory: false,
            defeated_players: vec![],
            active_players,
            events: EventBus::default(),
            rng,
        };

        game.start_turn();
        Ok(game)
    }

    fn default_config() -> GameConfig {
        let config_data = include_str!("config.json");
        serde_json::from_str(config_data).expect("Unable to parse built-in config")
    }

    fn create_random_players(
        num_players: usize,
        map: &mut Map,
        rng: &mut SmallRng,
    ) -> Vec<Player> {
        let initial_armies: u16 = match num_players {
            3 => 35,
            4 => 30,
            5 => 25,
            _ => 20, // 6 or more players
        };

        let mut players = Vec::new();
        for i in 0..num_players {
            players.push(Player::new(i, &format!("Player {}", i + 1), StrategyKind::Human));
        }

        map.shuffle_and_distribute_territories(&mut players, rng);

        // Top up every player to the initial army threshold, one army per
        // territory round-robin.
        for player in players.iter_mut() {
            let mut remaining =
                initial_armies.saturating_sub(player.territories.len() as u16);
            let territories = player.sorted_territories();
            while remaining > 0 {
                for territory in &territories {
                    if remaining == 0 {
                        break;
                    }
                    map.add_armies(territory, 1);
                    remaining -= 1;
                }
            }
        }

        players
    }

    pub fn reinforce(
        &mut self,
        player_id: usize,
        territory: &str,
        num_armies: u16,
    ) -> Result<(), GameActionError> {
        if self.turn_phase != TurnPhase::Reinforce {
            return Err(GameActionError::WrongPhase(TurnPhase::Reinforce));
        }
        if player_id != self.current_turn {
            return Err(GameActionError::NotYourTurn(player_id));
        }

        let player = self
            .players
            .get(player_id)
            .ok_or(GameActionError::UnknownPlayer(player_id))?;
        if !player.owns(territory) {
            return Err(GameActionError::NotOwned(territory.to_string(), player_id));
        }

        if num_armies > self.reinforcement_armies {
            return Err(GameActionError::NotEnoughReinforcements);
        }

        self.map.add_armies(territory, num_armies);
        self.reinforcement_armies -= num_armies;
        self.events.emit(&GameEvent::TerritoryReinforced {
            territory: territory.to_string(),
            num_armies,
        });

        // The phase only moves on once the whole pool is on the board and
        // no forced trade is pending.
        if self.reinforcement_armies == 0 && self.players[player_id].cards.len() < 5 {
            self.set_phase(TurnPhase::Attack);
        }

        Ok(())
    }

    pub fn attack(
        &mut self,
        attacker_id: usize,
        from_territory: &str,
        to_territory: &str,
        num_dice: u16,
        repeat: bool,
    ) -> Result<(), GameActionError> {
        if self.turn_phase != TurnPhase::Attack {
            return Err(GameActionError::WrongPhase(TurnPhase::Attack));
        }
        if attacker_id != self.current_turn {
            return Err(GameActionError::NotYourTurn(attacker_id));
        }

        let attacker = self
            .players
            .get(attacker_id)
            .ok_or(GameActionError::UnknownPlayer(attacker_id))?;
        if !strategy::has_valid_attack_move(&self.map, attacker) {
            return Err(GameActionError::NoValidAttack);
        }
        if !attacker.owns(from_territory) {
            return Err(GameActionError::NotOwned(
                from_territory.to_string(),
                attacker_id,
            ));
        }

        let from = self
            .map
            .get_territory(from_territory)
            .ok_or_else(|| GameActionError::UnknownTerritory(from_territory.to_string()))?;
        if !from.is_adjacent(to_territory) {
            return Err(GameActionError::NotAdjacent {
                from: from_territory.to_string(),
                to: to_territory.to_string(),
            });
        }

        let defender_id = self
            .map
            .owner_of(to_territory)
            .ok_or_else(|| GameActionError::UnknownTerritory(to_territory.to_string()))?;
        if defender_id == attacker_id {
            return Err(GameActionError::SelfAttack(to_territory.to_string()));
        }

        if self.map.get_armies(from_territory) <= 1 {
            return Err(GameActionError::InsufficientArmies(
                from_territory.to_string(),
            ));
        }

        // A zero-dice request would resolve no combat and, repeated, never
        // terminate.
        let num_dice = num_dice.clamp(1, 3);

        loop {
            let attacker_armies = self.map.get_armies(from_territory);
            if attacker_armies <= 1 {
                break;
            }
            let defender_armies = self.map.get_armies(to_territory);
            let dice = combat::attacker_dice(attacker_armies, num_dice);

            let outcome =
                combat::resolve_attack(attacker_armies, defender_armies, num_dice, &mut self.rng);
            self.map.remove_armies(from_territory, outcome.attacker_losses);
            self.map.remove_armies(to_territory, outcome.defender_losses);
            self.events.emit(&GameEvent::AttackResolved {
                from: from_territory.to_string(),
                to: to_territory.to_string(),
                attacker_losses: outcome.attacker_losses,
                defender_losses: outcome.defender_losses,
            });

            if self.map.get_armies(to_territory) == 0 {
                self.occupy(attacker_id, defender_id, from_territory, to_territory, dice);
                return Ok(());
            }

            if !repeat {
                break;
            }
        }

        Ok(())
    }

    /// Takes over a territory whose garrison just hit zero: ownership
    /// transfers and the attacking dice count of armies moves in, at least
    /// one and never emptying the source.
    fn occupy(
        &mut self,
        attacker_id: usize,
        defender_id: usize,
        from_territory: &str,
        to_territory: &str,
        num_dice: u16,
    ) {
        self.players[defender_id].remove_territory(to_territory);
        self.players[attacker_id].add_territory(to_territory);
        self.map.set_owner(to_territory, attacker_id);

        let moved = num_dice
            .max(1)
            .min(self.map.get_armies(from_territory).saturating_sub(1));
        self.map.remove_armies(from_territory, moved);
        self.map.set_armies(to_territory, moved);

        self.conquered_territory = true;
        info!(
            "player {} conquered '{}' from player {}",
            attacker_id, to_territory, defender_id
        );
        self.events.emit(&GameEvent::TerritoryConquered {
            territory: to_territory.to_string(),
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

    pub(crate) fn eliminate(&mut self, defender_id: usize, attacker_id: usize) {
        self.players[defender_id].eliminated = true;
        self.defeated_players.push(defender_id);
        self.active_players.retain(|&p| p != defender_id);
        let cards = std::mem::take(&mut self.players[defender_id].cards);
        self.players[attacker_id].cards.extend(cards);
        info!("player {} was eliminated", defender_id);
        self.events.emit(&GameEvent::PlayerEliminated {
            player: defender_id,
        });
    }

    pub fn fortify(
        &mut self,
        player_id: usize,
        from_territory: &str,
        to_territory: &str,
        num_armies: u16,
    ) -> Result<(), GameActionError> {
        if self.turn_phase != TurnPhase::Fortify {
            return Err(GameActionError::WrongPhase(TurnPhase::Fortify));
        }
        if player_id != self.current_turn {
            return Err(GameActionError::NotYourTurn(player_id));
        }

        let player = self
            .players
            .get(player_id)
            .ok_or(GameActionError::UnknownPlayer(player_id))?;
        for territory in [from_territory, to_territory] {
            if !player.owns(territory) {
                return Err(GameActionError::NotOwned(territory.to_string(), player_id));
            }
        }

        if !self
            .map
            .connected_via_owner(player_id, from_territory, to_territory)
        {
            return Err(GameActionError::NotConnected {
                from: from_territory.to_string(),
                to: to_territory.to_string(),
            });
        }

        // At least one army stays behind.
        if num_armies >= self.map.get_armies(from_territory) {
            return Err(GameActionError::InsufficientArmies(
                from_territory.to_string(),
            ));
        }

        self.map.remove_armies(from_territory, num_armies);
        self.map.add_armies(to_territory, num_armies);
        self.events.emit(&GameEvent::Fortified {
            from: from_territory.to_string(),
            to: to_territory.to_string(),
            num_armies,
        });
        self.end_turn();
        Ok(())
    }

    /// Base reinforcements plus the bonus of every fully owned continent.
    /// An eliminated player gets nothing.
    pub fn calculate_reinforcements(&self, player_id: usize) -> u16 {
        let player = &self.players[player_id];
        if player.territories.is_empty() {
            return 0;
        }
        let territories_owned = player.territories.len() as u16;
        let base_reinforcements = std::cmp::max(territories_owned / 3, 3);

        let mut continent_bonus = 0u16;
        for continent in self.map.continents.values() {
            if continent
                .territories
                .iter()
                .all(|t| player.owns(t))
            {
                continent_bonus += continent.bonus_armies;
            }
        }

        base_reinforcements + continent_bonus
    }

    pub fn check_win_conditions(&self) -> bool {
        self.players
            .iter()
            .any(|p| p.territories.len() == self.map.territories.len())
    }

    pub fn winner(&self) -> Option<usize> {
        self.players
            .iter()
            .find(|p| p.territories.len() == self.map.territories.len())
            .map(|p| p.id)
    }

    pub fn get_game_state(&self) -> GameState {
        GameState {
            players: self.players.clone(),
            map: self.map.deep_copy(),
            current_turn: self.current_turn,
            round: self.round,
            current_player: self.players[self.current_turn].name.clone(),
            turn_phase: self.turn_phase,
            reinforcement_armies: self.reinforcement_armies,
            initial_reinforcement_armies: self.initial_reinforcement_armies,
            conquered_territory: self.conquered_territory,
            defeated_players: self.defeated_players.clone(),
            possible_actions: self.get_possible_actions(),
        }
    }

    pub fn get_possible_actions(&self) -> Vec<Action> {
        match self.turn_phase {
            TurnPhase::Reinforce => {
                let mut actions = self.get_possible_reinforcements();
                actions.extend(self.get_possible_trades());
                if self.reinforcement_armies == 0
                    && self.players[self.current_turn].cards.len() < 5
                {
                    actions.push(Action::EndPhase);
                }
                actions
            }
            TurnPhase::Attack => self.get_possible_attacks(),
            TurnPhase::Fortify => self.get_possible_fortifications(),
            TurnPhase::TurnEnd | TurnPhase::GameOver => vec![],
        }
    }

    fn get_possible_reinforcements(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if self.reinforcement_armies != 0 {
            for territory in self.players[self.current_turn].sorted_territories() {
                actions.push(Action::Reinforce {
                    territory,
                    max_armies: self.reinforcement_armies,
                });
            }
        }
        actions
    }

    pub(crate) fn get_possible_trades(&self) -> Vec<Action> {
        let player = &self.players[self.current_turn];
        let mut actions = Vec::new();

        if player.cards.len() < 3 {
            return actions;
        }

        let mut seen_combinations = HashSet::new();
        for combo in (0..player.cards.len()).combinations(3) {
            let card_kinds = combo
                .iter()
                .map(|&i| &player.cards[i].kind)
                .collect::<Vec<_>>();
            if self.is_valid_trade(&card_kinds) {
                let sorted_combo = {
                    let mut sorted_combo = combo.clone();
                    sorted_combo.sort_unstable();
                    sorted_combo
                };
                if seen_combinations.insert(sorted_combo.clone()) {
                    actions.push(Action::TradeCards {
                        card_indices: sorted_combo,
                    });
                }
            }
        }

        actions
    }

    pub(crate) fn get_possible_attacks(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        for territory in self.players[self.current_turn].sorted_territories() {
            let Some(node) = self.map.get_territory(&territory) else {
                continue;
            };
            let max_dice = node.armies.saturating_sub(1).min(3);
            if max_dice == 0 {
                continue;
            }
            let mut adjacent: Vec<&String> = node.adjacent_territories.iter().collect();
            adjacent.sort();
            for neighbor in adjacent {
                if self.map.owner_of(neighbor) != Some(self.current_turn) {
                    actions.push(Action::Attack {
                        from: territory.clone(),
                        to: neighbor.clone(),
                        max_dice,
                    });
                }
            }
        }
        actions.push(Action::EndPhase);
        actions
    }

    pub(crate) fn get_possible_fortifications(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        let current_player = &self.players[self.current_turn];

        for from_territory in current_player.sorted_territories() {
            let max_armies = self.map.get_armies(&from_territory).saturating_sub(1);
            if max_armies == 0 {
                continue;
            }

            let mut visited = HashSet::new();
            let mut stack = vec![from_territory.clone()];
            while let Some(current) = stack.pop() {
                if !visited.insert(current.clone()) {
                    continue;
                }
                if current != from_territory {
                    actions.push(Action::Fortify {
                        from: from_territory.clone(),
                        to: current.clone(),
                        max_armies,
                    });
                }
                if let Some(node) = self.map.get_territory(&current) {
                    for adjacent in &node.adjacent_territories {
                        if current_player.owns(adjacent) && !visited.contains(adjacent) {
                            stack.push(adjacent.clone());
                        }
                    }
                }
            }
        }
        actions.push(Action::EndPhase);
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIX_TERRITORY_FIXTURE: &str = r#"{
        "map_data": { "author": "fixture" },
        "continents": [
            { "name": "West", "bonus_armies": 2, "territories": ["Alba", "Brigg", "Corin"] },
            { "name": "East", "bonus_armies": 2, "territories": ["Dask", "Eyre", "Fenn"] }
        ],
        "territories": [
            { "name": "Alba", "continent": "West", "adjacent_territories": ["Brigg"] },
            { "name": "Brigg", "continent": "West", "adjacent_territories": ["Alba", "Corin"] },
            { "name": "Corin", "continent": "West", "adjacent_territories": ["Brigg", "Dask"] },
            { "name": "Dask", "continent": "East", "adjacent_territories": ["Corin", "Eyre"] },
            { "name": "Eyre", "continent": "East", "adjacent_territories": ["Dask", "Fenn"] },
            { "name": "Fenn", "continent": "East", "adjacent_territories": ["Eyre"] }
        ],
        "players": [
            {
                "id": 0, "name": "Ada", "strategy": "Human", "cards": [],
                "territories": [
                    { "name": "Alba", "armies": 5 },
                    { "name": "Brigg", "armies": 2 },
                    { "name": "Corin", "armies": 8 }
                ]
            },
            {
                "id": 1, "name": "Bron", "strategy": "Human", "cards": [],
                "territories": [
                    { "name": "Dask", "armies": 1 },
                    { "name": "Eyre", "armies": 2 },
                    { "name": "Fenn", "armies": 1 }
                ]
            }
        ]
    }"#;

    fn fixture_game() -> Game {
        let config: GameConfig = serde_json::from_str(SIX_TERRITORY_FIXTURE).unwrap();
        Game::new(Some(config), None, Some(11)).unwrap()
    }

    #[test]
    fn setup_partitions_territories_between_players() {
        let game = Game::new(None, Some(4), Some(3)).unwrap();
        let mut owned = HashSet::new();
        for player in &game.players {
            for territory in &player.territories {
                assert!(owned.insert(territory.clone()), "{} owned twice", territory);
                assert_eq!(game.map.owner_of(territory), Some(player.id));
                assert!(game.map.get_armies(territory) >= 1);
            }
        }
        assert_eq!(owned.len(), game.map.territories.len());
    }

    #[test]
    fn reinforcement_pool_is_base_plus_continent_bonus() {
        let game = fixture_game();
        // 3 territories -> base 3, plus 2 for owning all of West.
        assert_eq!(game.calculate_reinforcements(0), 5);
        assert_eq!(game.reinforcement_armies, 5);
    }

    #[test]
    fn reinforcing_the_exact_pool_flips_to_attack() {
        let mut game = fixture_game();
        game.reinforce(0, "Corin", 3).unwrap();
        assert_eq!(game.turn_phase, TurnPhase::Reinforce);
        game.reinforce(0, "Alba", 2).unwrap();
        assert_eq!(game.reinforcement_armies, 0);
        assert_eq!(game.turn_phase, TurnPhase::Attack);
        assert_eq!(game.map.get_armies("Corin"), 11);
    }

    #[test]
    fn reinforce_rejects_overdraw_and_foreign_territory() {
        let mut game = fixture_game();
        assert_eq!(
            game.reinforce(0, "Dask", 1),
            Err(GameActionError::NotOwned("Dask".to_string(), 0))
        );
        assert_eq!(
            game.reinforce(0, "Alba", 6),
            Err(GameActionError::NotEnoughReinforcements)
        );
    }

    #[test]
    fn attack_rejects_illegal_selections() {
        let mut game = fixture_game();
        game.turn_phase = TurnPhase::Attack;
        assert!(matches!(
            game.attack(0, "Alba", "Dask", 3, false),
            Err(GameActionError::NotAdjacent { .. })
        ));
        assert_eq!(
            game.attack(0, "Corin", "Brigg", 3, false),
            Err(GameActionError::SelfAttack("Brigg".to_string()))
        );
        // Hand Brigg to Bron so Alba borders an enemy, then drain Alba. Corin
        // still has a legal attack, so the failure is specific to the source.
        game.players[0].remove_territory("Brigg");
        game.players[1].add_territory("Brigg");
        game.map.set_owner("Brigg", 1);
        game.map.set_armies("Alba", 1);
        assert_eq!(
            game.attack(0, "Alba", "Brigg", 3, false),
            Err(GameActionError::InsufficientArmies("Alba".to_string()))
        );
    }

    #[test]
    fn attack_without_any_legal_move_is_rejected() {
        let mut game = fixture_game();
        game.turn_phase = TurnPhase::Attack;
        for territory in ["Alba", "Brigg", "Corin"] {
            game.map.set_armies(territory, 1);
        }
        assert_eq!(
            game.attack(0, "Corin", "Dask", 3, false),
            Err(GameActionError::NoValidAttack)
        );
    }

    #[test]
    fn attack_outside_the_attack_phase_is_rejected() {
        let mut game = fixture_game();
        assert_eq!(
            game.attack(0, "Corin", "Dask", 3, false),
            Err(GameActionError::WrongPhase(TurnPhase::Attack))
        );
    }

    #[test]
    fn repeated_attack_conquers_and_moves_armies_in() {
        let mut game = fixture_game();
        game.turn_phase = TurnPhase::Attack;
        game.map.set_armies("Corin", 60);
        game.attack(0, "Corin", "Dask", 3, true).unwrap();
        assert_eq!(game.map.owner_of("Dask"), Some(0));
        assert!(game.players[0].owns("Dask"));
        assert!(!game.players[1].owns("Dask"));
        assert!(game.map.get_armies("Dask") >= 1);
        assert!(game.map.get_armies("Corin") >= 1);
        assert!(game.conquered_territory);
    }

    #[test]
    fn zero_dice_attack_still_terminates() {
        let mut game = fixture_game();
        game.turn_phase = TurnPhase::Attack;
        game.map.set_armies("Corin", 60);
        game.attack(0, "Corin", "Dask", 0, true).unwrap();
        assert_eq!(game.map.owner_of("Dask"), Some(0));
    }

    #[test]
    fn conquest_never_empties_the_source() {
        let mut game = fixture_game();
        game.turn_phase = TurnPhase::Attack;
        game.map.set_armies("Corin", 2);
        let _ = game.attack(0, "Corin", "Dask", 1, true);
        assert!(game.map.get_armies("Corin") >= 1);
        if game.map.owner_of("Dask") == Some(0) {
            assert!(game.map.get_armies("Dask") >= 1);
        }
    }

    #[test]
    fn actions_from_a_non_current_player_are_rejected() {
        let mut game = fixture_game();
        assert_eq!(
            game.reinforce(1, "Eyre", 2),
            Err(GameActionError::NotYourTurn(1))
        );
        assert_eq!(game.map.get_armies("Eyre"), 2);
        assert_eq!(game.reinforcement_armies, 5);
        assert_eq!(
            game.trade_cards(1, vec![0, 1, 2]),
            Err(GameActionError::NotYourTurn(1))
        );

        game.turn_phase = TurnPhase::Attack;
        assert_eq!(
            game.attack(1, "Eyre", "Corin", 3, false),
            Err(GameActionError::NotYourTurn(1))
        );

        game.turn_phase = TurnPhase::Fortify;
        assert_eq!(
            game.fortify(1, "Eyre", "Fenn", 1),
            Err(GameActionError::NotYourTurn(1))
        );
    }

    #[test]
    fn player_count_must_fit_the_map() {
        // The bundled map holds twelve territories.
        for requested in [0, 1, 13] {
            assert!(matches!(
                Game::new(None, Some(requested), Some(3)),
                Err(MapValidationError::InvalidPlayerCount { .. })
            ));
        }
        let game = Game::new(None, Some(12), Some(3)).unwrap();
        assert!(game
            .players
            .iter()
            .all(|player| !player.territories.is_empty()));
    }

    #[test]
    fn fortify_moves_armies_and_keeps_one_behind() {
        let mut game = fixture_game();
        game.turn_phase = TurnPhase::Fortify;
        game.map.set_armies("Alba", 5);
        game.map.set_armies("Brigg", 1);
        game.fortify(0, "Alba", "Brigg", 3).unwrap();
        assert_eq!(game.map.get_armies("Alba"), 2);
        assert_eq!(game.map.get_armies("Brigg"), 4);
        // Fortifying ends the turn; play moves to Bron.
        assert_eq!(game.current_turn, 1);
        assert_eq!(game.turn_phase, TurnPhase::Reinforce);
    }

    #[test]
    fn fortify_rejects_moving_every_army() {
        let mut game = fixture_game();
        game.turn_phase = TurnPhase::Fortify;
        game.map.set_armies("Alba", 5);
        assert_eq!(
            game.fortify(0, "Alba", "Brigg", 5),
            Err(GameActionError::InsufficientArmies("Alba".to_string()))
        );
        assert_eq!(
            game.fortify(0, "Alba", "Brigg", 7),
            Err(GameActionError::InsufficientArmies("Alba".to_string()))
        );
        // Moving all but the last army is fine.
        game.fortify(0, "Alba", "Brigg", 4).unwrap();
        assert_eq!(game.map.get_armies("Alba"), 1);
    }

    #[test]
    fn fortify_requires_an_owned_path() {
        let mut game = fixture_game();
        game.turn_phase = TurnPhase::Fortify;
        // Hand Brigg to Bron so Alba and Corin are cut off from each other.
        game.players[0].remove_territory("Brigg");
        game.players[1].add_territory("Brigg");
        game.map.set_owner("Brigg", 1);
        assert!(matches!(
            game.fortify(0, "Alba", "Corin", 2),
            Err(GameActionError::NotConnected { .. })
        ));
    }

    #[test]
    fn snapshot_map_is_independent_of_the_live_game() {
        let mut game = fixture_game();
        let state = game.get_game_state();
        game.map.set_armies("Alba", 42);
        assert_eq!(state.map.get_armies("Alba"), 5);
    }

    #[test]
    fn seeded_games_are_reproducible() {
        let a = Game::new(None, Some(3), Some(99)).unwrap();
        let b = Game::new(None, Some(3), Some(99)).unwrap();
        assert_eq!(a.map, b.map);
        assert_eq!(a.players, b.players);
        assert_eq!(a.deck, b.deck);
    }
}
