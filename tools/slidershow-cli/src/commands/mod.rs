pub mod build;
pub mod cache;
pub mod check;
pub mod compile;
pub mod config;
