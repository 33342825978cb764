//! Application services - Use case implementations

mod import_service;
mod route_query_service;

pub use import_service::{
    CommitMode, ImportError, ImportFailure, ImportReport, ImportService, ImportServiceConfig,
    PayloadInput,
};
pub use route_query_service::{
    RouteQueryConfig, RouteQueryService, RouteSearchResult, StopSearchResult,
};
