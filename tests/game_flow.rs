use risk_game_engine::game::Game;
use risk_game_engine::game_config::GameConfig;
use risk_game_engine::strategy::StrategyKind;
use risk_game_engine::turn_phase::TurnPhase;
use std::collections::HashSet;

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
            "id": 0, "name": "Ada", "strategy": "STRAT_A",
            "territories": [
                { "name": "Alba", "armies": 5 },
                { "name": "Brigg", "armies": 2 },
                { "name": "Corin", "armies": 8 }
            ]
        },
        {
            "id": 1, "name": "Bron", "strategy": "STRAT_B",
            "territories": [
                { "name": "Dask", "armies": 1 },
                { "name": "Eyre", "armies": 2 },
                { "name": "Fenn", "armies": 1 }
            ]
        }
    ]
}"#;

fn fixture_game(strategy_a: &str, strategy_b: &str, seed: u64) -> Game {
    let json = SIX_TERRITORY_FIXTURE
        .replace("STRAT_A", strategy_a)
        .replace("STRAT_B", strategy_b);
    let config: GameConfig = serde_json::from_str(&json).unwrap();
    Game::new(Some(config), None, Some(seed)).unwrap()
}

fn assert_ownership_partition(game: &Game) {
    let mut owned = HashSet::new();
    for player in &game.players {
        for territory in &player.territories {
            assert!(
                owned.insert(territory.clone()),
                "territory {} owned by two players",
                territory
            );
            assert_eq!(game.map.owner_of(territory), Some(player.id));
            assert!(game.map.get_armies(territory) >= 1);
        }
    }
    assert_eq!(owned.len(), game.map.territories.len());
}

#[test]
fn cheater_sweeps_the_board_and_the_game_ends() {
    let mut game = fixture_game("Cheater", "Defensive", 4);

    let mut turns = 0;
    while game.turn_phase != TurnPhase::GameOver {
        game.play_turn();
        assert_ownership_partition(&game);
        turns += 1;
        assert!(turns < 20, "game did not finish");
    }

    assert!(game.players[1].eliminated);
    assert_eq!(game.defeated_players, vec![1]);
    assert_eq!(game.winner(), Some(0));
    assert_eq!(game.players[0].territories.len(), 6);
    assert_eq!(game.turn_phase, TurnPhase::GameOver);
}

#[test]
fn human_game_driven_through_explicit_operations() {
    let mut game = fixture_game("Human", "Human", 21);

    // Reinforcement: base 3 plus the West continent bonus of 2, all of it
    // placed before the phase moves on.
    assert_eq!(game.reinforcement_armies, 5);
    game.reinforce(0, "Corin", 5).unwrap();
    assert_eq!(game.turn_phase, TurnPhase::Attack);

    // Overwhelm each of Bron's territories in turn. The garrison is topped
    // up between conquests so the repeat-attack always carries.
    game.map.set_armies("Corin", 60);
    game.attack(0, "Corin", "Dask", 3, true).unwrap();
    assert_eq!(game.map.owner_of("Dask"), Some(0));

    game.map.set_armies("Dask", 60);
    game.attack(0, "Dask", "Eyre", 3, true).unwrap();
    assert_eq!(game.map.owner_of("Eyre"), Some(0));
    assert!(!game.players[1].eliminated);

    game.map.set_armies("Eyre", 60);
    game.attack(0, "Eyre", "Fenn", 3, true).unwrap();

    assert!(game.players[1].eliminated);
    assert!(game.players[1].territories.is_empty());
    assert_eq!(game.turn_phase, TurnPhase::GameOver);
    assert_eq!(game.winner(), Some(0));
    assert_ownership_partition(&game);
}

#[test]
fn automated_strategies_keep_the_state_consistent() {
    let mut game = Game::new(None, Some(3), Some(17)).unwrap();
    game.players[0].strategy = StrategyKind::Aggressive;
    game.players[1].strategy = StrategyKind::Random;
    game.players[2].strategy = StrategyKind::Defensive;

    for _ in 0..60 {
        if game.turn_phase == TurnPhase::GameOver {
            break;
        }
        game.play_turn();
        assert_ownership_partition(&game);
    }

    if game.turn_phase == TurnPhase::GameOver {
        let winner = game.winner().expect("a finished game has a winner");
        assert_eq!(
            game.players[winner].territories.len(),
            game.map.territories.len()
        );
    }
}

#[test]
fn eliminated_player_leaves_the_rotation() {
    let mut game = fixture_game("Cheater", "Defensive", 9);
    let mut turns = 0;
    while game.turn_phase != TurnPhase::GameOver {
        game.play_turn();
        turns += 1;
        assert!(turns < 20, "game did not finish");
    }
    assert!(!game.active_players.contains(&1));
    assert_eq!(game.active_players, vec![0]);
}
