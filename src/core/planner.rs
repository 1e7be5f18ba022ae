use chrono::{Local, NaiveDateTime};
use tracing::{debug, warn};

use crate::core::fibonacci::{FiboLadder, EXTENSION_MULTIPLIERS};
use crate::core::sizing::{reward_to_risk, RiskBudget};
use crate::models::response::FIBO_TARGET_COUNT;
use crate::models::{
    CustomRequest, FiboRequest, Mode, PlanKind, PlanRequest, PlanResponse, PlanStatus,
};

/// Runs the planning kernel. Pure: the same request and timestamp always
/// produce the same response, and no condition escapes as an error.
pub fn plan(request: &PlanRequest, timestamp: NaiveDateTime) -> PlanResponse {
    match &request.kind {
        PlanKind::Fibo(req) => plan_fibo(req, request.account_balance, timestamp),
        PlanKind::Custom(req) => plan_custom(req, request.account_balance, timestamp),
    }
}

/// `plan` stamped with the local wall clock.
pub fn plan_now(request: &PlanRequest) -> PlanResponse {
    plan(request, Local::now().naive_local())
}

fn plan_fibo(req: &FiboRequest, balance: f64, timestamp: NaiveDateTime) -> PlanResponse {
    let ladder = match FiboLadder::build(req) {
        Some(l) => l,
        None => {
            warn!(
                "Fibo plan rejected: {} levels, high {:.5} low {:.5}",
                req.levels().len(),
                req.swing_high(),
                req.swing_low()
            );
            return insufficient_fibo(req, timestamp);
        }
    };

    let legs = ladder.entries.len();
    let stop = ladder.stop_distance();

    let response = PlanResponse {
        timestamp,
        mode: Mode::Fibo,
        direction: req.direction(),
        risk_fraction: req.risk_fraction(),
        entries: ladder.entries.clone(),
        stop_loss_distance: stop,
        lot_sizes: vec![0.0; legs],
        tp_prices: ladder.tp_prices.clone(),
        rr: vec![None; FIBO_TARGET_COUNT],
        risk_per_leg: vec![0.0; legs],
        profit_per_leg: vec![0.0; FIBO_TARGET_COUNT],
        status: PlanStatus::Ok,
    };

    let budget = match RiskBudget::allocate(balance, req.risk_fraction(), stop, legs) {
        Some(b) => b,
        None => {
            warn!("Fibo plan has zero stop distance at entry {:.5}", ladder.first_entry());
            return response.zero_sizing(PlanStatus::DegenerateStop);
        }
    };

    // All three targets are measured from the first leg only.
    let entry0 = ladder.first_entry();
    let lot0 = budget.lot_sizes[0];
    let rr = response
        .tp_prices
        .iter()
        .map(|&tp| reward_to_risk(entry0, tp, stop))
        .collect();
    let profit_per_leg = response
        .tp_prices
        .iter()
        .map(|&tp| lot0 * (tp - entry0))
        .collect();

    debug!(
        "Fibo {} plan: {} legs, stop {:.5}, total lot {:.2}",
        req.direction(),
        legs,
        stop,
        budget.total_lot
    );

    PlanResponse {
        risk_per_leg: budget.risk_per_leg(),
        lot_sizes: budget.lot_sizes,
        rr,
        profit_per_leg,
        ..response
    }
}

fn insufficient_fibo(req: &FiboRequest, timestamp: NaiveDateTime) -> PlanResponse {
    let legs = req.levels().len().max(1);
    PlanResponse {
        timestamp,
        mode: Mode::Fibo,
        direction: req.direction(),
        risk_fraction: req.risk_fraction(),
        entries: vec![0.0; legs],
        stop_loss_distance: 0.0,
        lot_sizes: vec![0.0; legs],
        tp_prices: vec![0.0; EXTENSION_MULTIPLIERS.len()],
        rr: vec![None; FIBO_TARGET_COUNT],
        risk_per_leg: vec![0.0; legs],
        profit_per_leg: vec![0.0; FIBO_TARGET_COUNT],
        status: PlanStatus::InsufficientInputs,
    }
}

fn plan_custom(req: &CustomRequest, balance: f64, timestamp: NaiveDateTime) -> PlanResponse {
    let legs = req.legs();
    let Some(first) = legs.first() else {
        warn!("Custom plan rejected: no legs");
        return insufficient_custom(req, timestamp);
    };
    let stop = first.stop_distance();

    let response = PlanResponse {
        timestamp,
        mode: Mode::Custom,
        direction: req.direction(),
        risk_fraction: req.risk_fraction(),
        entries: legs.iter().map(|l| l.entry).collect(),
        stop_loss_distance: stop,
        lot_sizes: vec![0.0; legs.len()],
        tp_prices: legs.iter().map(|l| l.tp).collect(),
        rr: vec![None; legs.len()],
        risk_per_leg: vec![0.0; legs.len()],
        profit_per_leg: vec![0.0; legs.len()],
        status: PlanStatus::Ok,
    };

    let budget = match RiskBudget::allocate(balance, req.risk_fraction(), stop, legs.len()) {
        Some(b) => b,
        None => {
            warn!("Custom plan has zero stop distance at entry {:.5}", first.entry);
            return response.zero_sizing(PlanStatus::DegenerateStop);
        }
    };

    let rr = legs
        .iter()
        .map(|l| reward_to_risk(l.entry, l.tp, stop))
        .collect();
    let profit_per_leg = legs
        .iter()
        .zip(&budget.lot_sizes)
        .map(|(l, lot)| lot * (l.tp - l.entry))
        .collect();

    debug!(
        "Custom {} plan: {} legs, stop {:.5}, total lot {:.2}",
        req.direction(),
        legs.len(),
        stop,
        budget.total_lot
    );

    PlanResponse {
        risk_per_leg: budget.risk_per_leg(),
        lot_sizes: budget.lot_sizes,
        rr,
        profit_per_leg,
        ..response
    }
}

fn insufficient_custom(req: &CustomRequest, timestamp: NaiveDateTime) -> PlanResponse {
    PlanResponse {
        timestamp,
        mode: Mode::Custom,
        direction: req.direction(),
        risk_fraction: req.risk_fraction(),
        entries: vec![0.0],
        stop_loss_distance: 0.0,
        lot_sizes: vec![0.0],
        tp_prices: vec![0.0],
        rr: vec![None],
        risk_per_leg: vec![0.0],
        profit_per_leg: vec![0.0],
        status: PlanStatus::InsufficientInputs,
    }
}
