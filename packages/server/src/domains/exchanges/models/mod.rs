pub mod toy_request;

pub use toy_request::*;
