// SPDX-License-Identifier: LGPL-3.0-only
//! # Emitter Error Types
//!
//! Handler failures are carried as [`HandlerError`] (an [`anyhow::Error`]), so a
//! subscriber can return whatever error type it already has. Panics raised by a
//! handler are converted into a [`HandlerPanic`] and delivered the same way.

use std::any::Any;
use thiserror::Error;

/// Error returned by an event handler.
pub type HandlerError = anyhow::Error;

/// Result type returned by event handlers.
pub type HandlerResult = anyhow::Result<()>;

/// A handler panicked while an event was being dispatched.
///
/// The emitter catches the unwind and reports it to the error sink wrapped in a
/// [`HandlerError`]. Use [`anyhow::Error::downcast_ref`] to tell panics apart
/// from regular handler errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Handler for '{event}' panicked: {message}")]
pub struct HandlerPanic {
    /// Name of the event that was being dispatched.
    pub event: String,
    /// The panic message, if it was a string.
    pub message: String,
}

impl HandlerPanic {
    /// Build a panic error from an unwind payload.
    pub fn from_payload(event: impl Into<String>, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };

        Self {
            event: event.into(),
            message,
        }
    }
}
