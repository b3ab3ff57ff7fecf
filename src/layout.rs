//! Video grid layout
//!
//! The grid always holds the local tile plus one tile per remote
//! participant. Only the column count is fixed here; rows follow from the
//! content.

use serde::Serialize;

/// Column count for a grid showing `remote_count` remote participants
pub fn columns(remote_count: usize) -> usize {
    match remote_count {
        0 => 1,
        1..=4 => 2,
        5..=9 => 3,
        _ => 4,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    pub columns: usize,
    /// Remote tiles plus the local tile
    pub tiles: usize,
}

impl GridLayout {
    pub fn for_remote_count(remote_count: usize) -> Self {
        Self {
            columns: columns(remote_count),
            tiles: remote_count + 1,
        }
    }
}
