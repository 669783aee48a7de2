//! Family membership domain entities.

pub mod model;
pub mod role;

pub use model::FamilyMember;
pub use role::FamilyRole;
