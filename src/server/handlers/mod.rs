pub mod chat;
pub mod corpus;
pub mod health;
pub mod history;
