pub mod auth_service;
pub mod forms;
pub mod group_service;
pub mod post_service;
