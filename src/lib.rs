//! Backdrop — a two-layer animated background driver for the terminal.
//!
//! Two independent integer layer selectors pick the current background
//! combination. The pair is joined against externally loaded enemy
//! configuration data to resolve which enemies "belong" to it. Layers are
//! reassigned on a countdown-driven refresh cycle and mutated directly from
//! the keyboard; the actual pixel work is delegated to an opaque render sink.

pub mod app;
pub mod catalog;
pub mod input;
pub mod layer;
pub mod refresh;
pub mod session;
pub mod sink;
pub mod ticker;
