/// Authorization for ToyShare actions
///
/// A fluent check used by actions before touching another user's data:
///
/// ```rust,ignore
/// use crate::common::auth::{Actor, Capability};
///
/// Actor::new(user.user_id, user.is_admin)
///     .can(Capability::ModifyOwned { owner_id: toy.user_id })
///     .check()?;
/// ```

mod builder;
mod capability;
mod errors;

pub use builder::{Actor, CapabilityBuilder};
pub use capability::Capability;
pub use errors::AuthError;
