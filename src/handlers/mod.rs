//! HTTP handlers

pub mod health;
pub mod sensor;
pub mod analysis;
pub mod chatbot;
pub mod auth;
pub mod motor_models;
pub mod realtime;
