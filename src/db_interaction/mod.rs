mod users;
mod vehicles;
mod deposits;
mod notifications;
mod appointments;
mod catalog;
mod reviews;

pub use users::*;
pub use vehicles::*;
pub use deposits::*;
pub use notifications::*;
pub use appointments::*;
pub use catalog::*;
pub use reviews::*;
