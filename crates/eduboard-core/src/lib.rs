pub mod agenda;
pub mod calendar;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod stats;
pub mod store;
pub mod views;
