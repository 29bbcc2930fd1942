//! The authenticated caller

use serde::Serialize;
use uuid::Uuid;

/// Identity of the user performing a request.
///
/// Every invitation operation takes the actor explicitly instead of reading
/// it from ambient session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: Uuid,
    pub email: Option<String>,
}

impl Actor {
    pub fn new(id: Uuid, email: Option<String>) -> Self {
        Self { id, email }
    }
}
