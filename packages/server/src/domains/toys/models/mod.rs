pub mod search;
pub mod toy;

pub use search::*;
pub use toy::*;
