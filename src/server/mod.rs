pub mod request;
pub mod routes;
#[allow(clippy::module_inception)]
pub mod server;
