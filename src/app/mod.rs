pub mod error;
pub mod potato_service;
pub mod request_mapper;
pub mod response_normalizer;

pub use error::{ApiError, ApiResult};
pub use potato_service::{InboundRequest, PotatoService};
pub use request_mapper::{map_request, Operation, StoreRequest};
pub use response_normalizer::{normalize, HandlerResponse};
