use std::fmt::{self, Write};

use crate::core::fibonacci::EXTENSION_MULTIPLIERS;
use crate::core::recommendation::TpRecommendation;
use crate::models::{CustomRequest, PlanResponse, PlanStatus};
use crate::trading::{DashboardSummary, LogRow};

const RULE: &str = "───────────────────────────────────────────────────────────";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub level: BannerLevel,
    pub message: String,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: BannerLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            BannerLevel::Info => "INFO",
            BannerLevel::Warning => "WARNING",
            BannerLevel::Error => "ERROR",
        };
        write!(f, "{}: {}", tag, self.message)
    }
}

/// Banner for a non-Ok plan; `None` when the plan is usable.
pub fn status_banner(status: PlanStatus) -> Option<Banner> {
    match status {
        PlanStatus::Ok => None,
        PlanStatus::InsufficientInputs => Some(Banner {
            level: BannerLevel::Info,
            message: "Pick at least one level and a swing high above the swing low.".to_string(),
        }),
        PlanStatus::DegenerateStop => Some(Banner {
            level: BannerLevel::Warning,
            message: "Stop-loss distance is zero; sizing and RR are not computed.".to_string(),
        }),
    }
}

pub fn fmt_price(v: f64) -> String {
    format!("{:.5}", v)
}

pub fn fmt_amount(v: f64) -> String {
    format!("{:.2}", v)
}

pub fn fmt_rr(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |rr| format!("{:.2}", rr))
}

pub fn entry_plan_table(out: &mut impl Write, resp: &PlanResponse) -> fmt::Result {
    writeln!(
        out,
        "  ENTRY PLAN ({} {}, risk {:.2}%)",
        resp.mode,
        resp.direction,
        resp.risk_fraction * 100.0
    )?;
    writeln!(out, "  {}", RULE)?;
    writeln!(out, "  {:>4} {:>14} {:>12} {:>12}", "Leg", "Entry", "Lot", "Risk$")?;
    for (i, entry) in resp.entries.iter().enumerate() {
        let lot = resp.lot_sizes.get(i).copied().unwrap_or(0.0);
        let risk = resp.risk_per_leg.get(i).copied().unwrap_or(0.0);
        writeln!(
            out,
            "  {:>4} {:>14} {:>12} {:>12}",
            i + 1,
            fmt_price(*entry),
            fmt_amount(lot),
            fmt_amount(risk)
        )?;
    }
    writeln!(out, "  {}", RULE)?;
    writeln!(
        out,
        "  SL distance {}  |  total lot {}  |  total risk ${}",
        fmt_price(resp.stop_loss_distance),
        fmt_amount(resp.total_lots()),
        fmt_amount(resp.total_risk())
    )?;
    Ok(())
}

/// Fibo targets. Profit is the first leg's profit at each target.
pub fn tp_targets_table(out: &mut impl Write, resp: &PlanResponse) -> fmt::Result {
    writeln!(out, "  TP TARGETS (first leg)")?;
    writeln!(out, "  {}", RULE)?;
    writeln!(
        out,
        "  {:>6} {:>8} {:>14} {:>8} {:>12}",
        "Target", "Ext", "TP", "RR", "Profit$"
    )?;
    for (k, tp) in resp.tp_prices.iter().enumerate() {
        let multiplier = EXTENSION_MULTIPLIERS.get(k).copied().unwrap_or(0.0);
        writeln!(
            out,
            "  {:>6} {:>8} {:>14} {:>8} {:>12}",
            format!("TP{}", k + 1),
            format!("{:.3}", multiplier),
            fmt_price(*tp),
            fmt_rr(resp.rr.get(k).copied().flatten()),
            fmt_amount(resp.profit_per_leg.get(k).copied().unwrap_or(0.0))
        )?;
    }
    Ok(())
}

/// Per-leg RR for custom plans, followed by any target hints.
pub fn recommendations_table(
    out: &mut impl Write,
    req: &CustomRequest,
    resp: &PlanResponse,
    recs: &[TpRecommendation],
) -> fmt::Result {
    writeln!(out, "  LEG RR")?;
    writeln!(out, "  {}", RULE)?;
    writeln!(
        out,
        "  {:>4} {:>14} {:>14} {:>14} {:>8} {:>12}",
        "Leg", "Entry", "SL", "TP", "RR", "Profit$"
    )?;
    for (i, leg) in req.legs().iter().enumerate() {
        writeln!(
            out,
            "  {:>4} {:>14} {:>14} {:>14} {:>8} {:>12}",
            i + 1,
            fmt_price(leg.entry),
            fmt_price(leg.sl),
            fmt_price(leg.tp),
            fmt_rr(resp.rr.get(i).copied().flatten()),
            fmt_amount(resp.profit_per_leg.get(i).copied().unwrap_or(0.0))
        )?;
    }

    if !recs.is_empty() {
        writeln!(out)?;
        for rec in recs {
            writeln!(
                out,
                "  Leg {}: RR {} is under 3, consider TP >= {}",
                rec.leg,
                fmt_rr(Some(rec.rr)),
                fmt_price(rec.suggested_tp)
            )?;
        }
    }
    Ok(())
}

pub fn dashboard_table(out: &mut impl Write, rows: &[LogRow]) -> fmt::Result {
    let summary = DashboardSummary::from_rows(rows);

    writeln!(out, "{}", "=".repeat(70))?;
    writeln!(out, "  SAVED PLANS")?;
    writeln!(out, "{}", "=".repeat(70))?;
    if rows.is_empty() {
        writeln!(out, "  No saved plans yet.")?;
        return Ok(());
    }

    for row in rows {
        writeln!(
            out,
            "  {}  {:<6} {:<5} r%={:<5} sl={}",
            row.time.format("%Y-%m-%d %H:%M:%S"),
            row.mode.as_str(),
            row.dir.as_str(),
            format!("{:.2}", row.risk_pct),
            fmt_price(row.sl)
        )?;
        writeln!(out, "      entry   {}", row.entry)?;
        writeln!(out, "      lot     {}", row.lot)?;
        writeln!(out, "      tp      {}", row.tp)?;
        writeln!(out, "      rr      {}", row.rr)?;
        writeln!(out, "      risk$   {}", row.risk)?;
        writeln!(out, "      profit$ {}", row.profit)?;
    }

    writeln!(out, "  {}", RULE)?;
    writeln!(
        out,
        "  {} plans ({} fibo, {} custom) | planned risk ${}",
        summary.plans,
        summary.fibo_plans,
        summary.custom_plans,
        fmt_amount(summary.total_risk)
    )?;
    Ok(())
}
