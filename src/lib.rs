pub mod cache;
pub mod config;
pub mod diag;
pub mod output;
pub mod risk;
pub mod server;
pub mod service;
pub mod sources;
