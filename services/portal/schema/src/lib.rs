//! sea-orm entities owned by the portal service.

pub mod evaluation_requests;
pub mod users;
