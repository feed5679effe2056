//! Route modules for the Summary Gateway

pub mod generate;
pub mod health;
pub mod summarize;
