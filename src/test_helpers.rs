use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{CustomRequest, Direction, FiboRequest, Leg, PlanRequest};

pub const TEST_BALANCE: f64 = 10_000.0;

pub fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_micro_opt(12, 0, 0, 250_000)
        .unwrap()
}

/// Fibo request on the default test balance; `risk_pct` in percent.
pub fn fibo_request(
    high: f64,
    low: f64,
    levels: &[f64],
    risk_pct: f64,
    direction: Direction,
) -> PlanRequest {
    PlanRequest::fibo(
        FiboRequest::new(high, low, levels.to_vec(), risk_pct, direction),
        TEST_BALANCE,
    )
}

/// Custom request from `(entry, sl, tp)` tuples on the default test balance.
pub fn custom_request(legs: &[(f64, f64, f64)], risk_pct: f64, direction: Direction) -> PlanRequest {
    let legs = legs
        .iter()
        .map(|&(entry, sl, tp)| Leg::new(entry, sl, tp))
        .collect();
    PlanRequest::custom(
        CustomRequest::new(legs, risk_pct, direction).unwrap(),
        TEST_BALANCE,
    )
}
