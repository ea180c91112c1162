pub mod config;
pub mod core;
pub mod export;
pub mod gateway;
pub mod journal;
