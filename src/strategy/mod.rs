// src/strategy/mod.rs

pub mod implementations;
pub mod optimization;
pub mod portfolio;
pub mod topsis;
pub mod traits;
