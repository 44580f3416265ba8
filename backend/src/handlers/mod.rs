// src/handlers/mod.rs

pub mod admin;
pub mod profile;
pub mod progress;
pub mod quiz;
