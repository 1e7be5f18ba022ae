use crate::models::{Direction, FiboRequest};

/// Extension multipliers projected from the first entry, nearest first.
pub const EXTENSION_MULTIPLIERS: [f64; 3] = [1.618, 2.618, 4.236];

/// Entry grid and extension targets for one retracement context.
#[derive(Debug, Clone, PartialEq)]
pub struct FiboLadder {
    pub entries: Vec<f64>,
    /// Swing extremum on the loss side: the low for longs, the high for shorts.
    pub anchor: f64,
    pub tp_prices: Vec<f64>,
}

impl FiboLadder {
    /// Returns `None` when the request has no levels or a non-positive range.
    pub fn build(req: &FiboRequest) -> Option<Self> {
        if !req.has_sufficient_inputs() {
            return None;
        }

        let direction = req.direction();
        let (high, low) = (req.swing_high(), req.swing_low());

        let entries = entry_grid(high, low, req.levels(), direction);
        let anchor = loss_anchor(high, low, direction);
        let tp_prices = project_targets(entries[0], anchor, direction);

        Some(Self {
            entries,
            anchor,
            tp_prices,
        })
    }

    pub fn first_entry(&self) -> f64 {
        self.entries[0]
    }

    /// Distance from the first entry to the loss-side extremum; shared by all legs.
    pub fn stop_distance(&self) -> f64 {
        (self.first_entry() - self.anchor).abs()
    }
}

/// Entries in level order. Longs retrace down from the high, shorts up from the low.
pub fn entry_grid(high: f64, low: f64, levels: &[f64], direction: Direction) -> Vec<f64> {
    let range = high - low;
    levels
        .iter()
        .map(|&level| match direction {
            Direction::Long => high - range * level,
            Direction::Short => low + range * level,
        })
        .collect()
}

pub fn loss_anchor(high: f64, low: f64, direction: Direction) -> f64 {
    match direction {
        Direction::Long => low,
        Direction::Short => high,
    }
}

/// Projects every multiplier from `entry` using its distance to `base`.
pub fn project_targets(entry: f64, base: f64, direction: Direction) -> Vec<f64> {
    EXTENSION_MULTIPLIERS
        .iter()
        .map(|&m| match direction {
            Direction::Long => entry + (entry - base) * (m - 1.0),
            Direction::Short => entry - (base - entry) * (m - 1.0),
        })
        .collect()
}
