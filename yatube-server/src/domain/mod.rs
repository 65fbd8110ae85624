pub mod error;
pub mod group;
pub mod page;
pub mod post;
pub mod user;
