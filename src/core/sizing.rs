/// Lot distribution for a fixed risk budget.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskBudget {
    pub risk_amount: f64,
    pub stop_distance: f64,
    pub total_lot: f64,
    pub lot_sizes: Vec<f64>,
}

impl RiskBudget {
    /// Splits `balance * risk_fraction / stop_distance` evenly over `legs`.
    /// Returns `None` for a zero stop distance or zero legs.
    pub fn allocate(
        balance: f64,
        risk_fraction: f64,
        stop_distance: f64,
        legs: usize,
    ) -> Option<Self> {
        if stop_distance == 0.0 || !stop_distance.is_finite() || legs == 0 {
            return None;
        }

        let risk_amount = balance * risk_fraction;
        let total_lot = risk_amount / stop_distance;
        let per_leg = total_lot / legs as f64;

        Some(Self {
            risk_amount,
            stop_distance,
            total_lot,
            lot_sizes: vec![per_leg; legs],
        })
    }

    pub fn risk_per_leg(&self) -> Vec<f64> {
        self.lot_sizes
            .iter()
            .map(|lot| lot * self.stop_distance)
            .collect()
    }
}

/// Reward-to-risk of a move; signed, so a short target below entry is negative.
pub fn reward_to_risk(entry: f64, tp: f64, stop_distance: f64) -> Option<f64> {
    if stop_distance == 0.0 {
        return None;
    }
    Some((tp - entry) / stop_distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_split_matches_budget() {
        let b = RiskBudget::allocate(10_000.0, 0.01, 0.075, 3).unwrap();
        assert!((b.risk_amount - 100.0).abs() < 1e-9);
        assert!((b.total_lot - 1333.333_333_333).abs() < 1e-6);
        assert!(b.lot_sizes.iter().all(|&l| (l - 444.444_444_444).abs() < 1e-6));
        let risk: f64 = b.risk_per_leg().iter().sum();
        assert!((risk - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_stop_has_no_budget() {
        assert!(RiskBudget::allocate(10_000.0, 0.01, 0.0, 2).is_none());
        assert!(RiskBudget::allocate(10_000.0, 0.01, 1.0, 0).is_none());
    }

    #[test]
    fn zero_risk_fraction_gives_zero_lots() {
        let b = RiskBudget::allocate(10_000.0, 0.0, 1.0, 2).unwrap();
        assert_eq!(b.lot_sizes, vec![0.0, 0.0]);
    }

    #[test]
    fn rr_is_signed() {
        assert_eq!(reward_to_risk(100.0, 103.0, 1.0), Some(3.0));
        assert_eq!(reward_to_risk(100.0, 97.0, 1.0), Some(-3.0));
        assert_eq!(reward_to_risk(100.0, 103.0, 0.0), None);
    }
}
