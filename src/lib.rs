// Pure classification core
pub mod models;
pub mod patterns;

// Data sources, presentation and the refresh loop around it
pub mod cli;
pub mod config;
pub mod error;
pub mod presentation;
pub mod processor;
pub mod source;
pub mod utils;
