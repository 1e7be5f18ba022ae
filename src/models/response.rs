use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::{Direction, Mode, PlanStatus};

/// Number of extension targets projected in Fibo mode.
pub const FIBO_TARGET_COUNT: usize = 3;

/// The computed plan. Immutable once produced by the kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub timestamp: NaiveDateTime,
    pub mode: Mode,
    pub direction: Direction,
    pub risk_fraction: f64,
    pub entries: Vec<f64>,
    pub stop_loss_distance: f64,
    pub lot_sizes: Vec<f64>,
    pub tp_prices: Vec<f64>,
    /// `None` where RR is undefined (any non-Ok status).
    pub rr: Vec<Option<f64>>,
    pub risk_per_leg: Vec<f64>,
    pub profit_per_leg: Vec<f64>,
    pub status: PlanStatus,
}

impl PlanResponse {
    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }

    pub fn leg_count(&self) -> usize {
        self.entries.len()
    }

    pub fn total_lots(&self) -> f64 {
        self.lot_sizes.iter().sum()
    }

    pub fn total_risk(&self) -> f64 {
        self.risk_per_leg.iter().sum()
    }

    /// Reset every sizing-derived field to its sentinel and tag the status.
    pub(crate) fn zero_sizing(mut self, status: PlanStatus) -> Self {
        self.lot_sizes.iter_mut().for_each(|v| *v = 0.0);
        self.risk_per_leg.iter_mut().for_each(|v| *v = 0.0);
        self.profit_per_leg.iter_mut().for_each(|v| *v = 0.0);
        self.rr.iter_mut().for_each(|v| *v = None);
        self.status = status;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> PlanResponse {
        PlanResponse {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 10)
                .unwrap()
                .and_hms_micro_opt(9, 30, 0, 123456)
                .unwrap(),
            mode: Mode::Custom,
            direction: Direction::Long,
            risk_fraction: 0.01,
            entries: vec![100.0, 100.5],
            stop_loss_distance: 1.0,
            lot_sizes: vec![50.0, 50.0],
            tp_prices: vec![101.0, 102.0],
            rr: vec![Some(1.0), Some(1.5)],
            risk_per_leg: vec![50.0, 50.0],
            profit_per_leg: vec![50.0, 75.0],
            status: PlanStatus::Ok,
        }
    }

    #[test]
    fn totals() {
        let r = sample();
        assert_eq!(r.leg_count(), 2);
        assert!((r.total_lots() - 100.0).abs() < 1e-9);
        assert!((r.total_risk() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_sizing_keeps_prices() {
        let r = sample().zero_sizing(PlanStatus::DegenerateStop);
        assert_eq!(r.status, PlanStatus::DegenerateStop);
        assert_eq!(r.entries, vec![100.0, 100.5]);
        assert_eq!(r.tp_prices, vec![101.0, 102.0]);
        assert!(r.lot_sizes.iter().all(|&v| v == 0.0));
        assert!(r.profit_per_leg.iter().all(|&v| v == 0.0));
        assert!(r.rr.iter().all(Option::is_none));
    }

    #[test]
    fn undefined_rr_serializes_as_null() {
        let r = sample().zero_sizing(PlanStatus::DegenerateStop);
        let json = serde_json::to_value(&r).unwrap();
        assert!(json["rr"][0].is_null());
        assert_eq!(json["status"], "degenerate_stop");
        assert_eq!(json["mode"], "custom");
    }
}
