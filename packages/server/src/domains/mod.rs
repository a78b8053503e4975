// Business domains
pub mod admin;
pub mod auth;
pub mod exchanges;
pub mod favorites;
pub mod messages;
pub mod sustainability;
pub mod toys;
pub mod users;
