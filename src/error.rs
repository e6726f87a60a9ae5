// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::ShareStatus;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FinanceError {
    #[error("Share status cannot move from {from} to {to}")]
    InvalidTransition { from: ShareStatus, to: ShareStatus },

    #[error("Amount {0} must not be negative")]
    NegativeAmount(Decimal),

    #[error("Amount {0} is outside the supported range")]
    AmountOutOfRange(Decimal),

    #[error("Expected {members} custom amounts, got {amounts}")]
    ShareCountMismatch { members: usize, amounts: usize },

    #[error("Unknown transaction type '{0}', expected income|expense")]
    UnknownFlowKind(String),

    #[error("Unknown share status '{0}', expected pending|paid|declined")]
    UnknownStatus(String),

    #[error("Unknown split mode '{0}', expected equal|custom")]
    UnknownSplitMode(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Stored value is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} '{name}' already exists")]
    Duplicate { kind: &'static str, name: String },

    #[error(transparent)]
    Finance(#[from] FinanceError),
}

pub type StoreResult<T> = Result<T, StoreError>;
