// Common test utilities

pub mod api_client;
pub mod fixtures;
pub mod harness;

pub use api_client::*;
pub use fixtures::*;
pub use harness::*;
