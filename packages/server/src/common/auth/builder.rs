use super::{AuthError, Capability};
use crate::common::entity_ids::UserId;

/// Entry point for authorization checks
pub struct Actor {
    actor_id: UserId,
    is_admin: bool,
}

impl Actor {
    /// `is_admin` comes from the verified session token
    pub fn new(actor_id: UserId, is_admin: bool) -> Self {
        Self { actor_id, is_admin }
    }

    pub fn id(&self) -> UserId {
        self.actor_id
    }

    /// Specify what capability the actor needs
    pub fn can(self, capability: Capability) -> CapabilityBuilder {
        CapabilityBuilder {
            actor_id: self.actor_id,
            is_admin: self.is_admin,
            capability,
        }
    }
}

/// Builder after specifying capability
pub struct CapabilityBuilder {
    actor_id: UserId,
    is_admin: bool,
    capability: Capability,
}

impl CapabilityBuilder {
    /// Perform the authorization check
    pub fn check(self) -> Result<(), AuthError> {
        if self.is_admin {
            return Ok(());
        }

        match self.capability {
            Capability::ModifyOwned { owner_id } if owner_id == self.actor_id => Ok(()),
            Capability::ModifyOwned { .. } => Err(AuthError::PermissionDenied(
                "only the owner can change this".to_string(),
            )),
            Capability::ViewAllUsers | Capability::ModerateToys => Err(AuthError::AdminRequired),
        }
    }
}
