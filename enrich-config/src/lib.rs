pub mod loader;
mod processor;

pub use loader::ConfigLoader;
