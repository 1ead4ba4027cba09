//! Shared driving types

/// Bounded-wait budgets for driving operations.
///
/// Every blocking driver call waits at most one of these budgets; on expiry
/// the operation fails with a timeout rather than retrying. There is no
/// cancellation primitive below this layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverTimeouts {
    /// Page readiness after navigation.
    pub page_ready_ms: u64,
    /// Element visibility before text reads.
    pub element_visible_ms: u64,
    /// Clickability before clicks and typing.
    pub clickable_ms: u64,
}

impl Default for DriverTimeouts {
    fn default() -> Self {
        Self {
            page_ready_ms: 10_000,
            element_visible_ms: 5_000,
            clickable_ms: 10_000,
        }
    }
}
