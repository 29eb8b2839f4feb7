//! Error Surface - the latest compile error, observed by the frontend.
//!
//! Lives next to the result pipeline but never feeds into it: setting or
//! clearing an error cannot make the displayed result disappear.

use spark_signals::{signal, Signal};

use crate::error::CompileError;

/// Reactive holder for the current compile error.
#[derive(Clone)]
pub struct ErrorSurface {
    current: Signal<Option<CompileError>>,
}

impl ErrorSurface {
    pub fn new() -> Self {
        Self {
            current: signal(None),
        }
    }

    /// Replace the current error (`None` clears it).
    pub fn set(&self, error: Option<CompileError>) {
        self.current.set(error);
    }

    /// Current error. Reading inside an effect subscribes to changes.
    pub fn get(&self) -> Option<CompileError> {
        self.current.get()
    }

    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }
}

impl Default for ErrorSurface {
    fn default() -> Self {
        Self::new()
    }
}
