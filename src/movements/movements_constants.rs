/// Movement types
///
/// Each constant represents one kind of ledger event. The ledger is
/// append-only; rows are never updated or removed.
/// Money or quantity applied into a portfolio position.
pub const MOVEMENT_TYPE_APPLICATION: &str = "APPLICATION";

/// Quantity redeemed from a position, partially or in full.
pub const MOVEMENT_TYPE_REDEMPTION: &str = "REDEMPTION";

/// Position quantity arriving from another portfolio. Cost basis is
/// preserved.
pub const MOVEMENT_TYPE_TRANSFER_IN: &str = "TRANSFER_IN";

/// Position quantity leaving for another portfolio.
pub const MOVEMENT_TYPE_TRANSFER_OUT: &str = "TRANSFER_OUT";

/// All movement types
pub const MOVEMENT_TYPES: [&str; 4] = [
    MOVEMENT_TYPE_APPLICATION,
    MOVEMENT_TYPE_REDEMPTION,
    MOVEMENT_TYPE_TRANSFER_IN,
    MOVEMENT_TYPE_TRANSFER_OUT,
];
