// src/core/mod.rs

pub mod cancel;
pub mod net;
pub mod sanitize;

pub use cancel::CancelToken;
