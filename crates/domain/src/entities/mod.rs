//! Domain entities - Schema records and query read models

mod itinerary;
mod route;
mod route_payload;
mod stop;

pub use itinerary::{ItineraryStop, RouteDetail, RouteMatch, StopRouteEntry, StopRoutes};
pub use route::{Route, RouteStop};
pub use route_payload::{MIN_ROUTE_STOPS, RawRoutePayload, ValidatedRoute};
pub use stop::Stop;
