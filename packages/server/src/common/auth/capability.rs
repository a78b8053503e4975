use crate::common::entity_ids::UserId;

/// Things an actor may try to do that are not open to every signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Edit or delete a resource owned by `owner_id` (toys, profiles)
    ModifyOwned { owner_id: UserId },

    /// See every account with its counters
    ViewAllUsers,

    /// Remove any listing regardless of owner
    ModerateToys,
}

impl Capability {
    pub fn requires_admin(&self) -> bool {
        !matches!(self, Capability::ModifyOwned { .. })
    }
}
