pub mod config;
pub mod controller;
pub mod discovery;
pub mod error;
pub mod helpers;
pub mod models;
pub mod repositories;
