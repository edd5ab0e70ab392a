pub mod intent;
pub mod post;
pub mod get;
pub mod delete;
pub mod update;

pub use intent::post_deposit_intent;
pub use post::post_deposit;
pub use get::get_deposit;
pub use delete::delete_deposit;
pub use update::update_deposit;
