// src/config/mod.rs
pub mod codes;
pub mod consts;
pub mod options;
