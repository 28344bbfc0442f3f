//! Error taxonomy for style resolution and render passes.
//!
//! Missing rule values, unmapped properties and out-of-range symbol ids are
//! not errors: the resolver falls back to table defaults and never reports
//! them. Only the two kinds below reach the caller of a render pass.

use thiserror::Error;

/// A failure that aborts the draw of a single feature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The source bitmap of a pattern fill is tainted by a cross-origin
    /// restriction and its pixels cannot be read back for recoloring.
    #[error("cross-origin: fill pattern 'System {symbol_id}' cannot be read back")]
    CrossOrigin {
        /// Fill symbol id whose bitmap was blocked.
        symbol_id: u8,
    },

    /// No bitmap was preloaded for a pattern fill symbol.
    #[error("fill pattern 'System {symbol_id}' is not loaded")]
    MissingFillImage {
        /// Fill symbol id that has no bitmap.
        symbol_id: u8,
    },
}

/// Top-level error for sublayer and binding operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartoError {
    /// The object was destroyed or is used against the wrong owner.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// Style resolution for a feature failed during a render pass.
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl CartoError {
    /// Convenience constructor for [`CartoError::IllegalState`].
    #[must_use]
    pub fn illegal_state<T: ToString>(msg: T) -> Self {
        Self::IllegalState(msg.to_string())
    }
}
