pub mod clear;
pub mod donors;
pub mod notify;
pub mod request;
pub mod show;
