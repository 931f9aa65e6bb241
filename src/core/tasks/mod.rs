// src/core/tasks/mod.rs

//! This module contains the long-running background tasks that keep the deck
//! in sync with the playout engine and the catalog source.

pub mod catalog_refresh;
pub mod feedback;
