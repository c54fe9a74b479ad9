mod connection;
pub use connection::*;
mod engine;
pub use engine::*;
