use crate::card::Card;
use crate::strategy::StrategyKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A player holds weak references (names) into the map; army counts and
/// ownership live on the territories themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: usize,
    pub name: String,
    pub territories: HashSet<String>,
    pub cards: Vec<Card>,
    pub strategy: StrategyKind,
    pub eliminated: bool,
}

impl Player {
    pub fn new(id: usize, name: &str, strategy: StrategyKind) -> Self {
        Self {
            id,
            name: name.to_string(),
            territories: HashSet::new(),
            cards: Vec::new(),
            strategy,
            eliminated: false,
        }
    }

    pub fn add_territory(&mut self, territory: &str) {
        self.territories.insert(territory.to_string());
    }

    pub fn remove_territory(&mut self, territory: &str) {
        self.territories.remove(territory);
    }

    pub fn owns(&self, territory: &str) -> bool {
        self.territories.contains(territory)
    }

    /// Owned territory names in a stable order, for deterministic strategy
    /// decisions over the underlying hash set.
    pub fn sorted_territories(&self) -> Vec<String> {
        let mut territories: Vec<String> = self.territories.iter().cloned().collect();
        territories.sort();
        territories
    }
}
