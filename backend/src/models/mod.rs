// src/models/mod.rs

pub mod course;
pub mod progress;
pub mod quiz;
pub mod user;
