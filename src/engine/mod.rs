// src/engine/mod.rs

//! Playout engine adapters implementing `PlaybackControl`.

pub mod simulated;

pub use simulated::SimulatedEngine;
