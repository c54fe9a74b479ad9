pub mod config;
pub mod data;
pub mod err;
pub mod event;
pub mod secret;
