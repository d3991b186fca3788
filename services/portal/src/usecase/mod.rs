pub mod admin;
pub mod password_reset;
pub mod request;
pub mod session;
