//! API 핸들러

pub mod auth;
pub mod events;
pub mod health;
