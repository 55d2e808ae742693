// src/model/mod.rs

pub mod order;
pub mod product;
pub mod queues;
pub mod supplier;
