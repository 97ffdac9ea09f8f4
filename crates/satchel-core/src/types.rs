//! Domain types shared by the wallet operations.
//!
//! Contains the `BlockHeight` newtype and the `HistoryScan` summary returned
//! by the history scan.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ==============================================================================
// Block Height
// ==============================================================================

/// A block height, wrapped for type safety.
///
/// `#[serde(transparent)]` keeps the JSON representation a bare integer.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BlockHeight(pub u32);

impl std::fmt::Display for BlockHeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ==============================================================================
// History Scan
// ==============================================================================

/// Result of scanning wallet history for incoming payments.
///
/// `received` maps each wallet-owned output address to the total value it
/// received, in base units. `last_height` is the height of the last
/// transaction that passed the filter, or the requested starting height
/// when nothing did; pass it back as `from_height` to resume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryScan {
    pub received: BTreeMap<String, f64>,
    pub last_height: BlockHeight,
}
