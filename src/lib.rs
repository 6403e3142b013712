pub mod config;
pub mod github;
pub mod rail;
pub mod render;
pub mod service;
pub mod upstream;
pub mod weather;
