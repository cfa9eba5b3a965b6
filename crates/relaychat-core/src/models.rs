pub mod message;
pub mod reply;
pub mod request;
