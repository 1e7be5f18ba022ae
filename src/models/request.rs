use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

use crate::models::{Direction, Mode};

pub const MAX_LEGS: usize = 5;
pub const DEFAULT_ACCOUNT_BALANCE: f64 = 10_000.0;

/// Fibonacci retracement levels offered by default.
pub const DEFAULT_FIBO_LEVELS: &[f64] = &[0.114, 0.25, 0.382, 0.5, 0.618];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("custom plans need between 1 and {max} legs, got {got}")]
    LegCount { got: usize, max: usize },

    #[error("invalid leg '{input}': {reason}")]
    InvalidLeg { input: String, reason: String },

    #[error("invalid fibonacci level '{0}'")]
    InvalidLevel(String),
}

/// One sub-position of a custom plan. A `tp` of zero means "not set".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Leg {
    pub entry: f64,
    pub sl: f64,
    pub tp: f64,
}

impl Leg {
    pub fn new(entry: f64, sl: f64, tp: f64) -> Self {
        Self {
            entry: round5(entry),
            sl: round5(sl),
            tp: round5(tp),
        }
    }

    pub fn stop_distance(&self) -> f64 {
        (self.entry - self.sl).abs()
    }

    pub fn has_tp(&self) -> bool {
        self.tp > 0.0
    }
}

/// Parses `ENTRY,SL[,TP]`; a missing TP is carried as zero.
impl FromStr for Leg {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| RequestError::InvalidLeg {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(invalid("expected ENTRY,SL[,TP]"));
        }

        let parse = |field: &str, name: &str| -> Result<f64, RequestError> {
            if field.is_empty() {
                return Err(invalid(&format!("{} is missing", name)));
            }
            field
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| invalid(&format!("{} is not a number", name)))
        };

        let entry = parse(parts[0], "entry")?;
        let sl = parse(parts[1], "sl")?;
        let tp = match parts.get(2) {
            Some(field) if !field.is_empty() => parse(field, "tp")?,
            _ => 0.0,
        };

        Ok(Leg::new(entry, sl, tp))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiboRequest {
    swing_high: f64,
    swing_low: f64,
    levels: Vec<f64>,
    risk_fraction: f64,
    direction: Direction,
}

impl FiboRequest {
    /// `risk_pct` is a percentage of the account (1.0 = 1%).
    pub fn new(
        swing_high: f64,
        swing_low: f64,
        levels: Vec<f64>,
        risk_pct: f64,
        direction: Direction,
    ) -> Self {
        Self {
            swing_high: round5(swing_high),
            swing_low: round5(swing_low),
            levels: levels.into_iter().map(round5).collect(),
            risk_fraction: risk_fraction_from_pct(risk_pct),
            direction,
        }
    }

    pub fn swing_high(&self) -> f64 {
        self.swing_high
    }

    pub fn swing_low(&self) -> f64 {
        self.swing_low
    }

    pub fn levels(&self) -> &[f64] {
        &self.levels
    }

    pub fn risk_fraction(&self) -> f64 {
        self.risk_fraction
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The kernel only plans a non-empty level list over a positive range.
    pub fn has_sufficient_inputs(&self) -> bool {
        !self.levels.is_empty() && self.swing_high > self.swing_low
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomRequest {
    legs: Vec<Leg>,
    risk_fraction: f64,
    direction: Direction,
}

impl CustomRequest {
    pub fn new(legs: Vec<Leg>, risk_pct: f64, direction: Direction) -> Result<Self, RequestError> {
        if legs.is_empty() || legs.len() > MAX_LEGS {
            return Err(RequestError::LegCount {
                got: legs.len(),
                max: MAX_LEGS,
            });
        }

        Ok(Self {
            legs,
            risk_fraction: risk_fraction_from_pct(risk_pct),
            direction,
        })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn risk_fraction(&self) -> f64 {
        self.risk_fraction
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum PlanKind {
    Fibo(FiboRequest),
    Custom(CustomRequest),
}

/// A fully validated planning request. The account balance travels with the
/// request so the kernel never reads process state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanRequest {
    pub account_balance: f64,
    pub kind: PlanKind,
}

impl PlanRequest {
    pub fn new(kind: PlanKind, account_balance: f64) -> Self {
        Self {
            account_balance,
            kind,
        }
    }

    pub fn fibo(req: FiboRequest, account_balance: f64) -> Self {
        Self::new(PlanKind::Fibo(req), account_balance)
    }

    pub fn custom(req: CustomRequest, account_balance: f64) -> Self {
        Self::new(PlanKind::Custom(req), account_balance)
    }

    pub fn mode(&self) -> Mode {
        match self.kind {
            PlanKind::Fibo(_) => Mode::Fibo,
            PlanKind::Custom(_) => Mode::Custom,
        }
    }

    pub fn direction(&self) -> Direction {
        match &self.kind {
            PlanKind::Fibo(r) => r.direction(),
            PlanKind::Custom(r) => r.direction(),
        }
    }

    pub fn risk_fraction(&self) -> f64 {
        match &self.kind {
            PlanKind::Fibo(r) => r.risk_fraction(),
            PlanKind::Custom(r) => r.risk_fraction(),
        }
    }

    pub fn risk_amount(&self) -> f64 {
        self.account_balance * self.risk_fraction()
    }
}

/// Percentage (0-100) to a fraction clamped to [0, 1]. Non-finite input is 0.
pub fn risk_fraction_from_pct(pct: f64) -> f64 {
    if !pct.is_finite() {
        return 0.0;
    }
    (pct / 100.0).clamp(0.0, 1.0)
}

/// Parses a comma-separated level list such as `0.25, 0.382,0.5`.
pub fn parse_levels(s: &str) -> Result<Vec<f64>, RequestError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| RequestError::InvalidLevel(part.to_string()))
        })
        .collect()
}

pub fn round5(x: f64) -> f64 {
    (x * 100_000.0).round() / 100_000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_are_rounded_to_five_digits() {
        let req = FiboRequest::new(1.2000049, 1.1, vec![0.3819999], 1.0, Direction::Long);
        assert!((req.swing_high() - 1.2).abs() < 1e-12);
        assert!((req.levels()[0] - 0.382).abs() < 1e-12);
    }

    #[test]
    fn risk_pct_is_clamped() {
        assert!((risk_fraction_from_pct(1.0) - 0.01).abs() < 1e-12);
        assert_eq!(risk_fraction_from_pct(250.0), 1.0);
        assert_eq!(risk_fraction_from_pct(-3.0), 0.0);
        assert_eq!(risk_fraction_from_pct(f64::NAN), 0.0);
    }

    #[test]
    fn fibo_guard_flags_bad_range_and_empty_levels() {
        let inverted = FiboRequest::new(1.1, 1.2, vec![0.5], 1.0, Direction::Long);
        assert!(!inverted.has_sufficient_inputs());
        let flat = FiboRequest::new(1.1, 1.1, vec![0.5], 1.0, Direction::Long);
        assert!(!flat.has_sufficient_inputs());
        let empty = FiboRequest::new(1.2, 1.1, Vec::new(), 1.0, Direction::Short);
        assert!(!empty.has_sufficient_inputs());
        let ok = FiboRequest::new(1.2, 1.1, vec![0.5], 1.0, Direction::Short);
        assert!(ok.has_sufficient_inputs());
    }

    #[test]
    fn custom_leg_count_bounds() {
        let leg = Leg::new(100.0, 99.0, 103.0);
        assert_eq!(
            CustomRequest::new(Vec::new(), 1.0, Direction::Long),
            Err(RequestError::LegCount { got: 0, max: MAX_LEGS })
        );
        assert!(CustomRequest::new(vec![leg; 5], 1.0, Direction::Long).is_ok());
        assert!(matches!(
            CustomRequest::new(vec![leg; 6], 1.0, Direction::Long),
            Err(RequestError::LegCount { got: 6, .. })
        ));
    }

    #[test]
    fn leg_parsing() {
        let leg: Leg = "100, 99, 103".parse().unwrap();
        assert_eq!(leg, Leg::new(100.0, 99.0, 103.0));

        let no_tp: Leg = "100,99".parse().unwrap();
        assert_eq!(no_tp.tp, 0.0);
        assert!(!no_tp.has_tp());

        let blank_tp: Leg = "100,99,".parse().unwrap();
        assert_eq!(blank_tp.tp, 0.0);

        assert!(matches!(
            ",99,103".parse::<Leg>(),
            Err(RequestError::InvalidLeg { reason, .. }) if reason == "entry is missing"
        ));
        assert!(matches!(
            "100,,103".parse::<Leg>(),
            Err(RequestError::InvalidLeg { reason, .. }) if reason == "sl is missing"
        ));
        assert!("100".parse::<Leg>().is_err());
        assert!("100,abc,1".parse::<Leg>().is_err());
        assert!("1,2,3,4".parse::<Leg>().is_err());
    }

    #[test]
    fn level_list_parsing() {
        assert_eq!(parse_levels("0.25, 0.382,0.5").unwrap(), vec![0.25, 0.382, 0.5]);
        assert!(parse_levels("").unwrap().is_empty());
        assert_eq!(
            parse_levels("0.25,x"),
            Err(RequestError::InvalidLevel("x".to_string()))
        );
    }

    #[test]
    fn empty_custom_request_plans_as_insufficient() {
        // Only reachable by bypassing `CustomRequest::new`.
        let req = PlanRequest::custom(
            CustomRequest {
                legs: Vec::new(),
                risk_fraction: 0.01,
                direction: Direction::Long,
            },
            DEFAULT_ACCOUNT_BALANCE,
        );
        let r = crate::core::planner::plan(&req, crate::test_helpers::fixed_time());
        assert_eq!(r.status, crate::models::PlanStatus::InsufficientInputs);
        assert_eq!(r.entries, vec![0.0]);
        assert_eq!(r.stop_loss_distance, 0.0);
        assert_eq!(r.lot_sizes, vec![0.0]);
        assert_eq!(r.rr, vec![None]);
        assert_eq!(r.profit_per_leg, vec![0.0]);
    }

    #[test]
    fn plan_request_accessors() {
        let fibo = FiboRequest::new(1.2, 1.1, vec![0.5], 2.0, Direction::Short);
        let req = PlanRequest::fibo(fibo, DEFAULT_ACCOUNT_BALANCE);
        assert_eq!(req.mode(), Mode::Fibo);
        assert_eq!(req.direction(), Direction::Short);
        assert!((req.risk_amount() - 200.0).abs() < 1e-9);
    }
}
