//! retrace_recorder - Recording and replay for drawing surfaces.
//!
//! This crate provides:
//! - A recording facade ([`CachedContext`]) that mirrors a surface's operations
//!   and properties and logs every mutation made through it
//! - Gradient handles that survive replay
//! - Implicit save/restore scopes for clip-like operations
//! - State checkpoints and ranged replay
//!
//! # Quick Start
//!
//! ```rust
//! use retrace_paint::{Canvas2D, CanvasExt};
//! use retrace_recorder::CachedContext;
//!
//! let mut ctx = CachedContext::new(Canvas2D::default());
//! ctx.set_fill_style("red").unwrap();
//! ctx.fill_rect(0.0, 0.0, 10.0, 10.0).unwrap();
//!
//! let checkpoint = ctx.save_state();
//! ctx.set_fill_style("blue").unwrap();
//!
//! // Bring the surface back to the checkpoint without drawing anything
//! ctx.rerun(Some(checkpoint), Some(checkpoint), true).unwrap();
//! assert_eq!(ctx.get("fillStyle").unwrap().as_str(), Some("red"));
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod gradient;
pub mod log;
pub mod mirror;
pub mod replay;
pub mod scope;
pub mod snapshot;

pub use config::CacheConfig;
pub use context::CachedContext;
pub use error::{CacheError, Result};
pub use export::LogExport;
pub use gradient::{GradientHandle, GradientRegistry};
pub use log::{
    Arguments, ColorStop, CommandLog, FunctionCall, LogEntry, PropertyChange, StateSnapshot,
};
pub use mirror::CapabilityRegistry;
pub use replay::{ReplayReport, Replayer};
pub use scope::{SaveStack, SaveStackEntry};
