// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// The category hierarchy is malformed and a walk over it had to stop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntegrityError {
    #[error("Cycle in category parent chain at '{id}'")]
    Cycle { id: String },

    #[error("Category '{id}' is nested deeper than {limit} levels")]
    TooDeep { id: String, limit: usize },
}

impl IntegrityError {
    /// Id of the category where the walk stopped.
    pub fn category_id(&self) -> &str {
        match self {
            IntegrityError::Cycle { id } | IntegrityError::TooDeep { id, .. } => id,
        }
    }
}

pub type TreeResult<T> = Result<T, IntegrityError>;
