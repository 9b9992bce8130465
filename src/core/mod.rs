// src/core/mod.rs

pub mod aggregator;
pub mod engine;
pub mod extractor;
pub mod morph;
pub mod store;
pub mod types;
