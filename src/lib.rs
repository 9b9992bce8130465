// src/lib.rs

pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod persistence;
pub mod resources;
pub mod timer;

pub use crate::core::engine::{Command, Reply, Session, SessionHandle};
pub use crate::core::types::{DocumentStats, Record, SortKey};
pub use crate::error::{LexiconError, Result};
