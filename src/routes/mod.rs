pub mod health_check;
pub mod authentication;
pub mod profile;
pub mod vehicles;
pub mod vehicle_types;
pub mod suppliers;
pub mod deposit;
pub mod appointments;
pub mod notifications;
pub mod reviews;

pub use health_check::health_check;
