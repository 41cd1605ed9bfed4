pub mod auth;
pub mod chat;
pub mod connections;
pub mod health;
pub mod notifications;
pub mod products;
pub mod profile;
