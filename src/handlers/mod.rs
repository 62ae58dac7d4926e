// src/handlers/mod.rs

pub mod auth;
pub mod books;
pub mod progress;
pub mod quiz;
