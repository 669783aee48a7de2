//! Request context carrying the acting member and their family.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use famvault_core::types::{FamilyId, MemberId};

/// Context for the current request.
///
/// Built by the caller and passed into service methods so that every
/// operation knows *who* is acting in *which* family. Authentication
/// happens outside the core; by the time a context exists the member id
/// is trusted. Whether that member may actually touch a resource is
/// decided per operation by the permission resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The acting member's ID.
    pub member_id: MemberId,
    /// The family the request operates on.
    pub family_id: FamilyId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(member_id: MemberId, family_id: FamilyId) -> Self {
        Self {
            member_id,
            family_id,
            request_time: Utc::now(),
        }
    }
}
