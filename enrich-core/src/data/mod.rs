mod value;

pub use value::*;

pub use chrono;
