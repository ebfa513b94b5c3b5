pub mod applications;
pub mod bank;
