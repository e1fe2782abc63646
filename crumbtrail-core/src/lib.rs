#![warn(missing_docs)]

//! Core library for crumbtrail => See `crumbtrail` crate.
//!
//! Contains the typed event emitter used by the breadcrumb manager.

/// Contains the [EventEmitter](emitter::EventEmitter) and its options.
pub mod emitter;

/// Contains error types for handler failures.
pub mod error;

pub use emitter::{Event, EventEmitter, EmitterOptions, ListenerId, Subscription};
pub use error::{HandlerError, HandlerPanic, HandlerResult};
