//! WebAssembly bindings for the step6502 interpreter.
//!
//! This module provides JavaScript-callable interfaces to the CPU, enabling
//! browser-based execution of 6502 binaries.

#[cfg(feature = "wasm")]
pub mod api;

#[cfg(feature = "wasm")]
pub use api::Emulator6502;
