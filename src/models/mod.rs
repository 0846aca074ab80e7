//! Data models

pub mod sample;
pub mod user;
pub mod motor_model;

pub use sample::*;
pub use user::*;
pub use motor_model::*;
