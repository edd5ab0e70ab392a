mod appointments;
mod deposits;
mod health_check;
mod helpers;
mod login;
