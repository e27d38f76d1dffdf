// src/core/mod.rs

pub mod money;
pub mod sanitize;
