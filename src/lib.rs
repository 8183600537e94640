pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod extract;
pub mod notify;
pub mod state;
pub mod users;

#[cfg(test)]
mod testing;
