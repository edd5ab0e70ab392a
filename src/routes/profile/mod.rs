pub mod get;
pub mod post;

pub use get::get_profile;
pub use post::post_profile;
