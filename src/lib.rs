pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod feedback;
pub mod generator;
pub mod session;
pub mod ui;
