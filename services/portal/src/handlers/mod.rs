pub mod admin;
pub mod health;
pub mod password_reset;
pub mod request;
pub mod session;
