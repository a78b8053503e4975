//! Toy listing actions
//!
//! Writes that change how many toys a member has shared run in one
//! transaction together with the sustainability side effects.

mod create_toy;
mod delete_toy;
mod search_toys;
mod update_toy;
mod validation;

pub use create_toy::create_toy;
pub use delete_toy::delete_toy;
pub use search_toys::search_toys;
pub use update_toy::update_toy;
pub use validation::{validate_changes, validate_new_toy, MAX_IMAGES, MAX_TITLE_CHARS};
