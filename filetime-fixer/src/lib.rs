pub mod command;
pub mod config;
pub mod embedded;
pub mod error;
pub mod fs;
pub mod repair;
pub mod report;
pub mod run;
pub mod statistics;
pub mod utils;
pub mod walk;
