pub mod get;
pub mod post;
pub mod update;
pub mod delete;

pub use get::get_vehicles_route;
pub use post::post_vehicle;
pub use update::update_vehicle_route;
pub use delete::delete_vehicle_route;
