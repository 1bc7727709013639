//! Nesting depth guard for arrays and objects

use crate::error::{ErrorCode, ParseError, Stage};

/// Tracks container nesting against a ceiling
#[derive(Debug, Clone, Copy)]
pub(crate) struct DepthGuard {
    current: usize,
    max: usize,
}

impl DepthGuard {
    pub(crate) fn with_max_depth(max: usize) -> Self {
        Self { current: 0, max }
    }

    /// Enter a new nesting level
    pub(crate) fn enter(&mut self, stage: Stage, position: usize) -> Result<(), ParseError> {
        if self.current >= self.max {
            return Err(ParseError::new(ErrorCode::DepthExceeded, stage, position));
        }
        self.current += 1;
        Ok(())
    }

    /// Exit a nesting level
    pub(crate) fn exit(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    pub(crate) fn current(&self) -> usize {
        self.current
    }
}
