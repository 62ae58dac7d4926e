// src/models/mod.rs

pub mod book;
pub mod progress;
pub mod question;
pub mod session;
pub mod user;
