//! Auth domain - password accounts with stateless session tokens
//!
//! Tokens are HS256 JWTs carried in an HttpOnly cookie or a Bearer header.
//! Logging out clears the cookie; tokens are not revoked server side.

pub mod actions;
pub mod data;
pub mod edges;
pub mod jwt;
pub mod password;

pub use jwt::{Claims, JwtService};
