use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Continent {
    pub name: String,
    pub bonus_armies: u16,
    pub territories: HashSet<String>,
}

impl Continent {
    pub fn new(name: &str, bonus_armies: u16) -> Self {
        Self {
            name: name.to_string(),
            bonus_armies,
            territories: HashSet::new(),
        }
    }

    pub fn add_territory(&mut self, territory: &str) {
        self.territories.insert(territory.to_string());
    }

    pub fn get_bonus(&self) -> u16 {
        self.bonus_armies
    }
}
