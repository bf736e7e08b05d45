use crate::error::GameActionError;
use crate::event::GameEvent;
use crate::game::Game;
use crate::map::Map;
use rand::prelude::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub territory: Option<String>,
    pub kind: CardKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CardKind {
    Infantry,
    Cavalry,
    Artillery,
    Joker,
}

impl Card {
    pub fn new(territory: Option<String>, kind: CardKind) -> Self {
        Self { territory, kind }
    }

    pub fn get_type(&self) -> &CardKind {
        &self.kind
    }
}

impl Game {
    pub fn create_deck<R: Rng>(map: &Map, rng: &mut R) -> Vec<Card> {
        let mut deck = Vec::new();
        let mut card_types = vec![CardKind::Infantry, CardKind::Cavalry, CardKind::Artillery];

        let mut territory_names: Vec<&String> = map.territories.keys().collect();
        territory_names.sort();
        for territory_name in territory_names {
            card_types.shuffle(rng);
            deck.push(Card::new(
                Some(territory_name.clone()),
                card_types[0].clone(),
            ));
        }

        // Two jokers round out the deck.
        deck.push(Card::new(None, CardKind::Joker));
        deck.push(Card::new(None, CardKind::Joker));

        deck.shuffle(rng);
        deck
    }

    pub fn is_valid_trade(&self, card_kinds: &[&CardKind]) -> bool {
        calculate_trade_in_bonus(card_kinds).is_ok()
    }

    pub fn trade_cards(
        &mut self,
        player_id: usize,
        card_indices: Vec<usize>,
    ) -> Result<u16, GameActionError> {
        if player_id != self.current_turn {
            return Err(GameActionError::NotYourTurn(player_id));
        }
        let card_kinds = {
            let player = self
                .players
                .get(player_id)
                .ok_or(GameActionError::UnknownPlayer(player_id))?;
            if card_indices.len() != 3 {
                return Err(GameActionError::InvalidTrade(format!(
                    "you must trade exactly 3 cards, got indices {:?}",
                    card_indices
                )));
            }
            let mut card_kinds = vec![];
            for &index in &card_indices {
                if index >= player.cards.len() {
                    return Err(GameActionError::InvalidTrade(format!(
                        "invalid card index {}",
                        index
                    )));
                }
                card_kinds.push(&player.cards[index].kind);
            }
            card_kinds
        };

        let bonus_armies = calculate_trade_in_bonus(&card_kinds)?;

        let player = self
            .players
            .get_mut(player_id)
            .ok_or(GameActionError::UnknownPlayer(player_id))?;
        let mut sorted_indices = card_indices;
        sorted_indices.sort_unstable();
        let mut territory_to_reinforce: Option<String> = None;
        for &index in sorted_indices.iter().rev() {
            let card = player.cards.remove(index);
            if let Some(ref territory) = card.territory {
                if territory_to_reinforce.is_none() && player.owns(territory) {
                    territory_to_reinforce = Some(territory.clone());
                }
            }
            self.discard_pile.push(card);
        }
        // Owning a traded card's territory earns two armies on the spot.
        if let Some(territory) = territory_to_reinforce {
            self.map.add_armies(&territory, 2);
        }

        self.reinforcement_armies += bonus_armies;
        self.events.emit(&GameEvent::CardsTraded {
            player: player_id,
            bonus_armies,
        });
        Ok(bonus_armies)
    }
}

pub fn calculate_trade_in_bonus(card_kinds: &[&CardKind]) -> Result<u16, GameActionError> {
    let infantry_count = card_kinds
        .iter()
        .filter(|&&kind| kind == &CardKind::Infantry)
        .count();
    let cavalry_count = card_kinds
        .iter()
        .filter(|&&kind| kind == &CardKind::Cavalry)
        .count();
    let artillery_count = card_kinds
        .iter()
        .filter(|&&kind| kind == &CardKind::Artillery)
        .count();
    let joker_count = card_kinds
        .iter()
        .filter(|&&kind| kind == &CardKind::Joker)
        .count();

    if infantry_count == 3 {
        Ok(4)
    } else if cavalry_count == 3 {
        Ok(6)
    } else if artillery_count == 3 {
        Ok(8)
    } else if infantry_count == 1 && cavalry_count == 1 && artillery_count == 1 {
        Ok(10)
    } else if joker_count > 0 && infantry_count + cavalry_count + artillery_count + joker_count == 3
    {
        Ok(10)
    } else {
        Err(GameActionError::InvalidTrade(format!(
            "invalid combination of cards: {:?}",
            card_kinds
        )))
    }
}
