// ABOUTME: Library exports for way2enjoy CLI modules for testing and external use
// ABOUTME: Makes internal modules available to integration tests

pub mod cli;
pub mod cli_output;
pub mod config;
pub mod constants;
