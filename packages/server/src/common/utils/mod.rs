pub mod geo;
pub mod geocoding;

pub use geo::*;
pub use geocoding::*;
