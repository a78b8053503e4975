//! Typed ID definitions for all domain entities.

pub use super::id::{Id, V4, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for User entities (members of the sharing community).
pub struct User;

/// Marker type for Toy entities (listings).
pub struct Toy;

/// Marker type for Message entities.
pub struct Message;

/// Marker type for ToyRequest entities (exchange requests).
pub struct ToyRequest;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;

pub type ToyId = Id<Toy>;

pub type MessageId = Id<Message>;

pub type ToyRequestId = Id<ToyRequest>;
