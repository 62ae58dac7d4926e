// src/services/mod.rs

pub mod progress_store;
pub mod verse_lookup;
