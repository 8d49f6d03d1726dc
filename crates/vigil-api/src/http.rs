mod dto;
mod error;
mod handlers;
mod routes;
mod server;
mod state;

pub use dto::*;
pub use error::*;
pub use routes::*;
pub use server::*;
pub use state::*;
