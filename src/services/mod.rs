// src/services/mod.rs

//! Leaderboard ranking and quiz generation. Both are stateless over their inputs.

pub mod quiz;
pub mod ranking;
