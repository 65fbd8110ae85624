pub mod dto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod utils;
