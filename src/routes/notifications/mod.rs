pub mod get;
pub mod read;
pub mod delete;
pub mod stream;

pub use get::get_notifications_route;
pub use read::read_notification;
pub use delete::delete_notification_route;
pub use stream::stream_notifications;
