pub mod app;
pub mod config;
pub mod controller;
pub mod dialogs;
pub mod export;
pub mod form_file;
pub mod logging;
pub mod platform;
pub mod report;
pub mod scheduler;
pub mod session;
pub mod shortcuts;
pub mod state;
