pub mod post;
pub mod update;
pub mod get;

pub use post::post_appointment;
pub use update::update_appointment;
pub use get::get_appointments;
