//! asksh - ask for a shell command in plain English.

pub mod config;
pub mod context;
pub mod openai;
pub mod ui;
