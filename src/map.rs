use crate::continent::Continent;
use crate::error::MapValidationError;
use crate::player::Player;
use crate::territory::Territory;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// The full board: territory table, continent table, and the raw key-value
/// metadata copied verbatim from the map source (author, image, wrap...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Map {
    pub map_data: HashMap<String, String>,
    pub territories: HashMap<String, Territory>,
    pub continents: HashMap<String, Continent>,
}

impl Map {
    pub fn new() -> Self {
        Self {
            map_data: HashMap::new(),
            territories: HashMap::new(),
            continents: HashMap::new(),
        }
    }

    pub fn add_territory(&mut self, territory: Territory) {
        self.territories.insert(territory.name.clone(), territory);
    }

    pub fn add_continent(&mut self, continent: Continent) {
        self.continents.insert(continent.name.clone(), continent);
    }

    pub fn get_territory(&self, name: &str) -> Option<&Territory> {
        self.territories.get(name)
    }

    pub fn get_territory_mut(&mut self, name: &str) -> Option<&mut Territory> {
        self.territories.get_mut(name)
    }

    pub fn get_continent(&self, name: &str) -> Option<&Continent> {
        self.continents.get(name)
    }

    pub fn get_armies(&self, name: &str) -> u16 {
        self.territories.get(name).map_or(0, |t| t.armies)
    }

    pub fn set_armies(&mut self, name: &str, armies: u16) {
        if let Some(territory) = self.territories.get_mut(name) {
            territory.armies = armies;
        }
    }

    pub fn add_armies(&mut self, name: &str, num_armies: u16) {
        if let Some(territory) = self.territories.get_mut(name) {
            territory.armies += num_armies;
        }
    }

    pub fn remove_armies(&mut self, name: &str, num_armies: u16) {
        if let Some(territory) = self.territories.get_mut(name) {
            territory.armies = territory.armies.saturating_sub(num_armies);
        }
    }

    pub fn owner_of(&self, name: &str) -> Option<usize> {
        self.territories.get(name).and_then(|t| t.owner)
    }

    pub fn set_owner(&mut self, name: &str, owner: usize) {
        if let Some(territory) = self.territories.get_mut(name) {
            territory.owner = Some(owner);
        }
    }

    /// Structural checks run once at load time. Anything caught here is
    /// fatal before play begins; the core never re-validates during a game.
    pub fn validate(&self) -> Result<(), MapValidationError> {
        for territory in self.territories.values() {
            if territory.adjacent_territories.is_empty() {
                return Err(MapValidationError::EmptyAdjacency(territory.name.clone()));
            }
            for adjacent in &territory.adjacent_territories {
                let other = self.territories.get(adjacent).ok_or_else(|| {
                    MapValidationError::DanglingAdjacency {
                        territory: territory.name.clone(),
                        adjacent: adjacent.clone(),
                    }
                })?;
                if !other.is_adjacent(&territory.name) {
                    return Err(MapValidationError::AsymmetricAdjacency {
                        a: territory.name.clone(),
                        b: adjacent.clone(),
                    });
                }
            }
            match self.continents.get(&territory.continent) {
                Some(continent) if continent.territories.contains(&territory.name) => {}
                _ => {
                    return Err(MapValidationError::UnknownContinent {
                        territory: territory.name.clone(),
                        continent: territory.continent.clone(),
                    })
                }
            }
            let memberships = self
                .continents
                .values()
                .filter(|c| c.territories.contains(&territory.name))
                .count();
            match memberships {
                0 => return Err(MapValidationError::NoContinent(territory.name.clone())),
                1 => {}
                _ => {
                    return Err(MapValidationError::MultipleContinents(
                        territory.name.clone(),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Fully independent copy for undo/preview. Every nested collection is
    /// rebuilt entry by entry; the result shares no mutable state with the
    /// original.
    pub fn deep_copy(&self) -> Self {
        let map_data = self
            .map_data
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let territories = self
            .territories
            .iter()
            .map(|(name, territory)| (name.clone(), territory.clone()))
            .collect();
        let continents = self
            .continents
            .iter()
            .map(|(name, continent)| (name.clone(), continent.clone()))
            .collect();
        Self {
            map_data,
            territories,
            continents,
        }
    }

    /// True when `from` and `to` are linked by a chain of territories all
    /// owned by `owner` (extended fortification rule).
    pub fn connected_via_owner(&self, owner: usize, from: &str, to: &str) -> bool {
        if self.owner_of(from) != Some(owner) || self.owner_of(to) != Some(owner) {
            return false;
        }

        let mut visited = HashSet::new();
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(territory) = self.territories.get(current) {
                for adjacent in &territory.adjacent_territories {
                    if self.owner_of(adjacent) == Some(owner) && !visited.contains(adjacent.as_str())
                    {
                        stack.push(adjacent);
                    }
                }
            }
        }
        false
    }

    /// Deals every territory to a player round-robin within each continent
    /// (so nobody starts with a full continent) and garrisons it with one
    /// army.
    pub fn shuffle_and_distribute_territories<R: Rng>(
        &mut self,
        players: &mut [Player],
        rng: &mut R,
    ) {
        let mut territories: Vec<String> = self.territories.keys().cloned().collect();
        territories.sort();
        territories.shuffle(rng);

        let mut continent_territory_map: HashMap<String, Vec<String>> = HashMap::new();
        for territory in &territories {
            let continent_name = self.territories[territory].continent.clone();
            continent_territory_map
                .entry(continent_name)
                .or_default()
                .push(territory.clone());
        }

        let mut continent_names: Vec<&String> = continent_territory_map.keys().collect();
        continent_names.sort();
        let continent_names: Vec<String> = continent_names.into_iter().cloned().collect();

        let mut player_index = 0;
        for continent_name in &continent_names {
            for territory in &continent_territory_map[continent_name] {
                players[player_index].add_territory(territory);
                self.set_owner(territory, players[player_index].id);
                self.set_armies(territory, 1);
                player_index = (player_index + 1) % players.len();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_continent_map() -> Map {
        let mut map = Map::new();
        map.map_data.insert("author".to_string(), "test".to_string());

        let mut west = Continent::new("West", 2);
        west.add_territory("Alba");
        west.add_territory("Brigg");
        let mut east = Continent::new("East", 3);
        east.add_territory("Corin");
        map.add_continent(west);
        map.add_continent(east);

        let mut alba = Territory::new("Alba", "West");
        alba.add_adjacent("Brigg");
        let mut brigg = Territory::new("Brigg", "West");
        brigg.add_adjacent("Alba");
        brigg.add_adjacent("Corin");
        let mut corin = Territory::new("Corin", "East");
        corin.add_adjacent("Brigg");
        map.add_territory(alba);
        map.add_territory(brigg);
        map.add_territory(corin);
        map
    }

    #[test]
    fn valid_map_passes_validation() {
        assert_eq!(two_continent_map().validate(), Ok(()));
    }

    #[test]
    fn asymmetric_adjacency_is_rejected() {
        let mut map = two_continent_map();
        map.get_territory_mut("Alba").unwrap().add_adjacent("Corin");
        assert_eq!(
            map.validate(),
            Err(MapValidationError::AsymmetricAdjacency {
                a: "Alba".to_string(),
                b: "Corin".to_string(),
            })
        );
    }

    #[test]
    fn dangling_adjacency_is_rejected() {
        let mut map = two_continent_map();
        map.get_territory_mut("Corin")
            .unwrap()
            .add_adjacent("Atlantis");
        assert!(matches!(
            map.validate(),
            Err(MapValidationError::DanglingAdjacency { .. })
        ));
    }

    #[test]
    fn territory_outside_its_continent_is_rejected() {
        let mut map = two_continent_map();
        map.add_territory({
            let mut t = Territory::new("Dorne", "Nowhere");
            t.add_adjacent("Alba");
            t
        });
        map.get_territory_mut("Alba").unwrap().add_adjacent("Dorne");
        assert!(matches!(
            map.validate(),
            Err(MapValidationError::UnknownContinent { .. })
        ));
    }

    #[test]
    fn deep_copy_shares_no_mutable_state() {
        let mut map = two_continent_map();
        map.set_owner("Alba", 0);
        map.set_armies("Alba", 4);

        let copy = map.deep_copy();
        map.set_armies("Alba", 9);
        map.set_owner("Brigg", 1);
        map.map_data.insert("author".to_string(), "else".to_string());

        assert_eq!(copy.get_armies("Alba"), 4);
        assert_eq!(copy.owner_of("Brigg"), None);
        assert_eq!(copy.map_data["author"], "test");
    }

    #[test]
    fn connectivity_follows_only_owned_territories() {
        let mut map = two_continent_map();
        map.set_owner("Alba", 0);
        map.set_owner("Brigg", 1);
        map.set_owner("Corin", 0);

        assert!(!map.connected_via_owner(0, "Alba", "Corin"));
        map.set_owner("Brigg", 0);
        assert!(map.connected_via_owner(0, "Alba", "Corin"));
    }
}
