mod descriptor;
pub use descriptor::*;
mod query;
pub use query::*;
mod result_set;
pub use result_set::*;
mod statement;
pub use statement::*;
