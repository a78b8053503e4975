//! Exchange request actions

mod create_request;
mod list_requests;
mod update_status;

pub use create_request::{announcement, create_request, MAX_REQUEST_MESSAGE_CHARS};
pub use list_requests::{list_requests, parse_list_query, RequestRole};
pub use update_status::update_request_status;
