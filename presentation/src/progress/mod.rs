//! Busy indicators

pub mod typing;
