//! Platform abstraction layer
//!
//! The browser build renders into the DOM, stores records in LocalStorage and
//! drives the game from `requestAnimationFrame`. Native builds run headless on
//! the in-memory pieces and need nothing from here.

#[cfg(target_arch = "wasm32")]
pub mod web;
