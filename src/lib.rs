pub mod core;
pub mod corpus;
pub mod history;
pub mod index;
pub mod llm;
pub mod qa;
pub mod server;
pub mod state;
