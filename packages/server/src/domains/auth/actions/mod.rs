//! Auth domain actions - account creation and credential checks

mod login;
mod register;
mod validation;

pub use login::login;
pub use register::register;
pub use validation::{validate_email, validate_password, validate_username, MIN_PASSWORD_CHARS};
