pub mod engine;
pub mod method;
pub mod request;
