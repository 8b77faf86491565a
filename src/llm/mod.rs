//! LLM integration module

pub mod client;
pub mod extract;
pub mod generator;
pub mod prompts;
