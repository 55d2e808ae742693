// src/io/mod.rs

pub mod demand;
pub mod orders;
pub mod reporting;
pub mod suppliers;
