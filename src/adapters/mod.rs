/// Adapters - concrete implementations of the port traits
///
/// HTTP clients for the backend services plus the in-process session and
/// view stores.
pub mod api;
pub mod session;
pub mod views;
