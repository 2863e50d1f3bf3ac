//! Stop and route resolvers.

pub mod route;
pub mod stop;

pub use route::RouteIdentifierNormalizer;
pub use stop::StopIdentifierResolver;
