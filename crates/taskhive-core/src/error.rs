//! Typed domain errors
//!
//! Every denial or validation failure carries a specific, stable kind so
//! callers can branch on it without matching message strings. Raising any
//! of these inside a use case aborts its transaction (drop = rollback).

use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity id unknown (or soft-deleted)
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Role or access check failed; also covers fail-closed lookup misses
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Malformed input: missing field, invalid position, duplicate name
    #[error("validation failed: {0}")]
    Validation(String),

    /// State-dependent rejection: WIP limit reached, duplicate default,
    /// concurrent reorder mismatch
    #[error("conflict: {0}")]
    Conflict(String),

    /// Invite token past its validity window
    #[error("invite has expired")]
    InviteExpired,

    /// Invite token already redeemed; acceptance is terminal
    #[error("invite has already been accepted")]
    InviteAlreadyUsed,

    /// Storage-level failure
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}

pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Shorthand for permission failures.
    pub fn denied(why: impl Into<String>) -> Self {
        CoreError::PermissionDenied(why.into())
    }
}
