//! Error taxonomy for region reads.
//!
//! Every failure of a read request is reported as a single [`SlabError`]
//! value. Validation errors are produced before any selection state exists
//! in the store; store-side failures wrap the store's own error so that the
//! source chain is preserved.

use std::fmt::Display;

use thiserror::Error;

pub type SlabResult<T> = Result<T, SlabError>;

/// Which of `starts` or `counts` an element diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecPart {
    Starts,
    Counts,
}

impl Display for SpecPart {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            SpecPart::Starts => write!(f, "starts"),
            SpecPart::Counts => write!(f, "counts"),
        }
    }
}

/// Coarse classification of a [`SlabError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidSpecShape,
    InvalidElement,
    NonMonotonicOrOverlapping,
    NonPositiveCount,
    OutOfBounds,
    Overflow,
    SelectionConstructionFailed,
    ReadFailed,
    ResourceExhausted,
}

/// Failure of a region read.
///
/// Axis and element positions in messages are 1-based, the way the caller
/// names them.
#[derive(Debug, Error)]
pub enum SlabError {
    #[error("{0}")]
    InvalidSpecShape(String),

    #[error("{part}[[{ax}]][{at}] {reason}", ax = .axis + 1, at = .pos + 1)]
    InvalidElement {
        part:   SpecPart,
        axis:   usize,
        pos:    usize,
        reason: String,
    },

    #[error(
        "starts[[{ax}]][{at}] is <= 0 or < starts[[{ax}]][{prev}] + counts[[{ax}]][{prev}]",
        ax = .axis + 1,
        at = .pos + 1,
        prev = .pos
    )]
    NonMonotonicOrOverlapping { axis: usize, pos: usize },

    #[error("counts[[{ax}]][{at}] is <= 0", ax = .axis + 1, at = .pos + 1)]
    NonPositiveCount { axis: usize, pos: usize },

    #[error(
        "starts[[{ax}]][{at}] + counts[[{ax}]][{at}] - 1 is greater than the \
         corresponding dimension in the array ({extent})",
        ax = .axis + 1,
        at = .pos + 1
    )]
    OutOfBounds {
        axis:   usize,
        pos:    usize,
        extent: u64,
    },

    #[error("{0}")]
    Overflow(String),

    #[error("failed to build selection: {0:#}")]
    SelectionConstructionFailed(#[source] anyhow::Error),

    #[error("read failed: {0:#}")]
    ReadFailed(#[source] anyhow::Error),

    #[error("{0}")]
    ResourceExhausted(String),
}

impl SlabError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SlabError::InvalidSpecShape(_) => ErrorKind::InvalidSpecShape,
            SlabError::InvalidElement { .. } => ErrorKind::InvalidElement,
            SlabError::NonMonotonicOrOverlapping { .. } => {
                ErrorKind::NonMonotonicOrOverlapping
            },
            SlabError::NonPositiveCount { .. } => ErrorKind::NonPositiveCount,
            SlabError::OutOfBounds { .. } => ErrorKind::OutOfBounds,
            SlabError::Overflow(_) => ErrorKind::Overflow,
            SlabError::SelectionConstructionFailed(_) => {
                ErrorKind::SelectionConstructionFailed
            },
            SlabError::ReadFailed(_) => ErrorKind::ReadFailed,
            SlabError::ResourceExhausted(_) => ErrorKind::ResourceExhausted,
        }
    }

    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        SlabError::InvalidSpecShape(msg.into())
    }

    pub(crate) fn element(
        part: SpecPart,
        axis: usize,
        pos: usize,
        reason: impl Into<String>,
    ) -> Self {
        SlabError::InvalidElement {
            part,
            axis,
            pos,
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(msg: impl Into<String>) -> Self {
        SlabError::Overflow(msg.into())
    }

    pub(crate) fn exhausted(msg: impl Into<String>) -> Self {
        SlabError::ResourceExhausted(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_one_based() {
        let err = SlabError::NonMonotonicOrOverlapping { axis: 0, pos: 1 };
        assert_eq!(
            err.to_string(),
            "starts[[1]][2] is <= 0 or < starts[[1]][1] + counts[[1]][1]"
        );

        let err = SlabError::element(SpecPart::Counts, 2, 0, "is NA");
        assert_eq!(err.to_string(), "counts[[3]][1] is NA");
        assert_eq!(err.kind(), ErrorKind::InvalidElement);
    }

    #[test]
    fn test_store_errors_keep_source() {
        let err = SlabError::ReadFailed(
            anyhow::anyhow!("disk gone").context("reading chunk 3"),
        );
        assert_eq!(err.kind(), ErrorKind::ReadFailed);
        assert_eq!(err.to_string(), "read failed: reading chunk 3: disk gone");
        assert!(std::error::Error::source(&err).is_some());
    }
}
