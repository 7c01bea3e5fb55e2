//! Personalized learning advisor: a rule-augmented recommendation engine and
//! keyword chatbot over a static student dataset, served through a small
//! dashboard API.

pub mod analytics;
pub mod chatbot;
pub mod data;
pub mod encoding;
pub mod engine;
pub mod model;
pub mod training;
