//! Command handlers

pub mod chunks;
pub mod inspect;
