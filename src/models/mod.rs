// src/models/mod.rs

pub mod catalog;
pub mod player;
pub mod question;
