//! Platform layer
//!
//! Browser bindings live in `web` (wasm32 only). The native build drives the
//! session directly from `main.rs`.

#[cfg(target_arch = "wasm32")]
pub mod web;
