use crate::card::{Card, CardKind};
use crate::continent::Continent;
use crate::error::MapValidationError;
use crate::map::Map;
use crate::player::Player;
use crate::strategy::StrategyKind;
use crate::territory::Territory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::HashSet;

/// A full scenario: map metadata, the territory/continent graph, and an
/// optional scripted player setup. With no players listed the game
/// distributes territories randomly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub map_data: HashMap<String, String>,
    pub continents: Vec<ContinentConfig>,
    pub territories: Vec<TerritoryConfig>,
    #[serde(default)]
    pub players: Vec<PlayerConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub id: usize,
    pub name: String,
    #[serde(default)]
    pub strategy: StrategyKind,
    pub territories: Vec<PlayerTerritoryConfig>,
    #[serde(default)]
    pub cards: Vec<CardConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerTerritoryConfig {
    pub name: String,
    pub armies: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardConfig {
    pub territory: Option<String>,
    pub kind: CardKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerritoryConfig {
    pub name: String,
    pub continent: String,
    pub adjacent_territories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContinentConfig {
    pub name: String,
    pub bonus_armies: u16,
    pub territories: Vec<String>,
}

impl GameConfig {
    /// Builds and validates the map, then applies any scripted player
    /// setup. Every defect found here is fatal before play begins.
    pub fn to_map_and_players(&self) -> Result<(Map, Vec<Player>), MapValidationError> {
        let mut map = Map::new();
        map.map_data = self.map_data.clone();

        for continent_config in &self.continents {
            let mut continent =
                Continent::new(&continent_config.name, continent_config.bonus_armies);
            for territory_name in &continent_config.territories {
                continent.add_territory(territory_name);
            }
            map.add_continent(continent);
        }

        for territory_config in &self.territories {
            let mut territory =
                Territory::new(&territory_config.name, &territory_config.continent);
            for adjacent in &territory_config.adjacent_territories {
                territory.add_adjacent(adjacent);
            }
            map.add_territory(territory);
        }

        map.validate()?;

        let mut players = Vec::new();
        if self.players.is_empty() {
            return Ok((map, players));
        }

        let mut assigned_territories = HashSet::new();
        for player_config in &self.players {
            let mut player = Player::new(
                player_config.id,
                &player_config.name,
                player_config.strategy,
            );
            for territory in &player_config.territories {
                if !assigned_territories.insert(territory.name.clone()) {
                    return Err(MapValidationError::DuplicateAssignment(
                        territory.name.clone(),
                    ));
                }
                player.add_territory(&territory.name);
                map.set_owner(&territory.name, player_config.id);
                map.set_armies(&territory.name, territory.armies.max(1));
            }
            for card in &player_config.cards {
                player
                    .cards
                    .push(Card::new(card.territory.clone(), card.kind.clone()));
            }
            players.push(player);
        }

        for territory in map.territories.keys() {
            if !assigned_territories.contains(territory) {
                return Err(MapValidationError::UnassignedTerritory(territory.clone()));
            }
        }

        Ok((map, players))
    }

    pub fn load_from_file(filename: &str) -> Result<Self, std::io::Error> {
        let data = std::fs::read_to_string(filename)?;
        let config: GameConfig = serde_json::from_str(&data)?;
        Ok(config)
    }
}
