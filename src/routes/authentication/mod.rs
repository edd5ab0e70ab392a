pub mod register;
pub mod login;

pub use register::register;
pub use login::login;
