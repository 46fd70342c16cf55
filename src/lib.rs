//! Core library for now-playing-kiosk
pub mod auth;
pub mod config;
pub mod credentials;
pub mod display;
pub mod error;
pub mod player;
pub mod poll;
pub mod weather;
