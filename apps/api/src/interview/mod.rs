// Interview engine: question generation, answer evaluation, and the
// start → answer → complete lifecycle.
// All model calls go through llm_client via the gateway.

pub mod gateway;
pub mod handlers;
pub mod orchestrator;
pub mod parser;
pub mod prompts;
pub mod repository;

#[cfg(test)]
pub mod testing;
