// src/quiz/mod.rs

pub mod dispatch;
pub mod grade;
pub mod reference;
pub mod registry;
pub mod selector;
pub mod session;
