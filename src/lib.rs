//! Top token holders for a Solana mint, aggregated per owner wallet.

pub mod api;
pub mod config;
pub mod services;
pub mod types;

pub use services::token::HolderAggregator;
