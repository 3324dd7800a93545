//! Crawler Core - segment model, power, movement and combat for modular crawlers

pub mod combat;
pub mod core;
pub mod crawler;
pub mod segments;
