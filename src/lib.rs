pub mod app;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{HandlerResponse, InboundRequest, Operation, PotatoService};
pub use domain::{validate_create, validate_partial, NewPotato, Potato, PotatoPatch};
pub use infra::config::{ServerConfig, StoreConfig};
pub use infra::data_api::{DataApi, RestDataApi};
