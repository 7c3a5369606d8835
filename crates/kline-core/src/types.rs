// File: crates/kline-core/src/types.rs
// Summary: Shared types and constants (pane ids, sizes, gutters).

/// Default price pane width in pixels.
pub const WIDTH: i32 = 1024;
/// Default price pane height in pixels.
pub const HEIGHT: i32 = 480;
/// Default height of secondary panes (volume, indicator) in pixels.
pub const SUBPANE_HEIGHT: i32 = 160;

/// Right-margin overhang past the last bar, in logical index units.
pub const RIGHT_MARGIN_BARS: f64 = 5.0;

/// Identifier of a registered pane. Issued by the pane registry; stable for
/// the lifetime of the registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(pub u32);

impl std::fmt::Display for PaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pane#{}", self.0)
    }
}

/// Screen margins, in pixels. The right inset is the price-axis gutter and
/// doubles as the axis reserve subtracted during capture bar fitting.
/// Contract: all fields are non-negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Insets {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl Insets {
    /// Create new insets (non-negative by type).
    pub const fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }
    /// Total horizontal inset (left + right).
    pub const fn hsum(&self) -> u32 { self.left + self.right }
    /// Total vertical inset (top + bottom).
    pub const fn vsum(&self) -> u32 { self.top + self.bottom }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(0, 50, 8, 24)
    }
}
