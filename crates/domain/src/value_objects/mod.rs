//! Value Objects - Immutable, identity-less domain primitives

mod direction;
mod route_id;
mod route_number;
mod stop_id;
mod stop_name;

pub use direction::Direction;
pub use route_id::RouteId;
pub use route_number::RouteNumber;
pub use stop_id::StopId;
pub use stop_name::StopName;
