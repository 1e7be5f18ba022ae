pub mod direction;
pub mod request;
pub mod response;

pub use direction::*;
pub use request::{CustomRequest, FiboRequest, Leg, PlanKind, PlanRequest, RequestError};
pub use response::PlanResponse;
