//! Error kinds for the multi-type vector, flat segment tree and segment tree.
//!
//! The four kinds mirror the teacher's flat `enum ... (String)` shape, but
//! are derived with `thiserror` rather than hand-written `Display` impls.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum MtvError {
    #[error("out of range: {0}")]
    OutOfRange(String),

    #[error("invalid argument: {0}")]
    InvalidArg(String),

    #[error("type error: {0}")]
    TypeError(String),

    #[error("general error: {0}")]
    General(String),
}

impl MtvError {
    pub(crate) fn out_of_range(what: impl Into<String>) -> Self {
        MtvError::OutOfRange(what.into())
    }

    pub(crate) fn invalid_arg(what: impl Into<String>) -> Self {
        MtvError::InvalidArg(what.into())
    }

    pub(crate) fn type_error(what: impl Into<String>) -> Self {
        MtvError::TypeError(what.into())
    }

    pub(crate) fn general(what: impl Into<String>) -> Self {
        MtvError::General(what.into())
    }
}

pub type MtvResult<T> = Result<T, MtvError>;
