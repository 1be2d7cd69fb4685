pub mod display;
pub mod error;
pub mod logger;
pub mod validation;
