pub mod aggregate;
pub mod api;
pub mod assistant;
pub mod config;
pub mod dashboard;
pub mod history;
pub mod intake;
pub mod logging;
pub mod recorder;
pub mod storage;
pub mod theme;
