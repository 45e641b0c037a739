pub mod comment;
pub mod comment_like;
pub mod post;
pub mod post_like;
pub mod post_tag;
pub mod profile;
pub mod reply;
pub mod reply_like;
pub mod tag;
pub mod user;
