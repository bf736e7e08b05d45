pub mod card;
pub mod combat;
pub mod continent;
pub mod error;
pub mod event;
pub mod game;
pub mod game_config;
pub mod map;
pub mod player;
pub mod strategy;
pub mod territory;
pub mod turn_phase;
