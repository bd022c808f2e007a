pub mod api;
pub mod config;
pub mod db;
pub mod diff;
pub mod error;
pub mod gradebook;
pub mod models;
pub mod notifications;
pub mod services;
pub mod session;
pub mod state;
