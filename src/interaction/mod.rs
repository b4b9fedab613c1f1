//! Presentation layer: rendering triage results and the interactive console loop.

pub mod console;
pub mod render;
