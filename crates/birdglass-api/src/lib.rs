// birdglass-api: Async Rust client for Alice-LG compatible looking glass APIs

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::LookingGlassClient;
pub use error::Error;
pub use models::{
    ApiStatus, BgpInfo, CacheStatus, ConfigResponse, ErrorResponse, LookupPages, LookupRoute,
    LookupRoutesResponse, Neighbour, NeighboursResponse, PaginatedRoutesLookupResponse,
    Pagination, Routeserver, RouteserversResponse, RoutesLookupResponseGlobal, Status,
    StatusResponse,
};
pub use transport::{TlsMode, TransportConfig};
