pub mod constants;
pub mod manager;
pub mod session;
pub mod types;
