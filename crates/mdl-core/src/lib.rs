pub mod config;
pub mod logging;

pub mod control;
pub mod retry;
pub mod scheduler;
pub mod task;
pub mod transfer;
pub mod url_model;
