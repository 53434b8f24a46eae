pub mod climate;
pub mod config;
pub mod data;
pub mod error;
pub mod output;
pub mod parser;
pub mod resort;
pub mod scoring;
pub mod stats;
pub mod visitation;
