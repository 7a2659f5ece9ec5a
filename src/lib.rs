pub mod aggregator;
pub mod charts;
pub mod config;
pub mod domain;
pub mod normalizer;
pub mod persistence;
pub mod twitter;
