use chrono::{NaiveDate, NaiveDateTime};
use fibo_planner::models::{CustomRequest, Direction, FiboRequest, Leg, PlanRequest};

pub const BALANCE: f64 = 10_000.0;
pub const EPS: f64 = 1e-6;

pub fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 17)
        .unwrap()
        .and_hms_micro_opt(7, 30, 15, 654_321)
        .unwrap()
}

pub fn fibo(high: f64, low: f64, levels: &[f64], risk_pct: f64, direction: Direction) -> PlanRequest {
    PlanRequest::fibo(
        FiboRequest::new(high, low, levels.to_vec(), risk_pct, direction),
        BALANCE,
    )
}

pub fn custom(legs: &[(f64, f64, f64)], risk_pct: f64, direction: Direction) -> PlanRequest {
    let legs = legs
        .iter()
        .map(|&(e, s, t)| Leg::new(e, s, t))
        .collect();
    PlanRequest::custom(CustomRequest::new(legs, risk_pct, direction).unwrap(), BALANCE)
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < EPS
}
