//! Admin domain - moderation and community oversight. Every handler
//! requires an admin session.

pub mod edges;
