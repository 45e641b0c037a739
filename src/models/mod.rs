pub mod auth_model;
pub mod comment_model;
pub mod post_model;
pub mod profile_model;
