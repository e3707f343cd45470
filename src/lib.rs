pub mod app;
pub mod debounce;
pub mod details;
pub mod error;
pub mod messages;
pub mod models;
pub mod omdb;
pub mod search;
