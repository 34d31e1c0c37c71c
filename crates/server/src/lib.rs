#![forbid(unsafe_code)]

pub mod handler;
pub mod http;

pub use handler::Responder;
pub use http::router;
