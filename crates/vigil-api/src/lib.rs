pub mod domain;
pub mod http;
pub mod vigil_api;

pub use domain::*;
pub use http::*;
pub use vigil_api::*;
