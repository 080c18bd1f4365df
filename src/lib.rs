//! `soulcare-games` - cognitive mini-game engine
//!
//! This library provides the content generators, session state machines,
//! scoring rules, and result-store contract behind six short cognitive
//! assessment games: reaction time, sequential colour recall, digit span,
//! sliding puzzle, colour-word interference, and arithmetic fluency.

pub mod cli;
pub mod config;
pub mod contract;
pub mod error;
pub mod game;
pub mod generator;
pub mod observability;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod store;
