use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An ownable map node. Adjacency and continent membership are fixed after
/// load; only `armies` and `owner` mutate during play.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Territory {
    pub name: String,
    pub continent: String,
    pub armies: u16,
    pub owner: Option<usize>,
    pub adjacent_territories: HashSet<String>,
}

impl Territory {
    pub fn new(name: &str, continent: &str) -> Self {
        Self {
            name: name.to_string(),
            continent: continent.to_string(),
            armies: 0,
            owner: None,
            adjacent_territories: HashSet::new(),
        }
    }

    pub fn add_adjacent(&mut self, adjacent: &str) {
        self.adjacent_territories.insert(adjacent.to_string());
    }

    pub fn is_adjacent(&self, territory: &str) -> bool {
        self.adjacent_territories.contains(territory)
    }

    pub fn get_continent(&self) -> &str {
        &self.continent
    }
}
