// The binary in main.rs owns the terminal; everything it drives lives here so
// integration tests and benchmarks can reach it.

pub mod app;
pub mod audio;
pub mod config;
pub mod engine;
pub mod event;
pub mod logging;
pub mod remark;
pub mod session;
pub mod store;
pub mod ui;
pub mod words;
