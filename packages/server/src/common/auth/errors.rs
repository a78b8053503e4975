use thiserror::Error;

/// Why a capability check refused an actor
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Admin access required")]
    AdminRequired,
}
