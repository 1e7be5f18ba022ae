use crate::models::{CustomRequest, PlanResponse};

/// RR below which a custom leg gets a suggested target.
pub const MIN_RECOMMENDED_RR: f64 = 3.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TpRecommendation {
    pub leg: usize,
    pub entry: f64,
    pub current_tp: f64,
    pub rr: f64,
    pub suggested_tp: f64,
}

/// Hints for custom legs whose target is set but sits under 3R.
///
/// The suggestion is always `entry + 3 * |entry - sl|`, including for shorts,
/// and RR is signed, so every short leg with a target below entry qualifies.
/// Legs with undefined RR are skipped.
pub fn recommend_targets(req: &CustomRequest, response: &PlanResponse) -> Vec<TpRecommendation> {
    req.legs()
        .iter()
        .zip(&response.rr)
        .enumerate()
        .filter_map(|(i, (leg, rr))| {
            let rr = (*rr)?;
            if !leg.has_tp() || rr >= MIN_RECOMMENDED_RR {
                return None;
            }
            Some(TpRecommendation {
                leg: i + 1,
                entry: leg.entry,
                current_tp: leg.tp,
                rr,
                suggested_tp: leg.entry + MIN_RECOMMENDED_RR * leg.stop_distance(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::planner::plan;
    use crate::models::{Direction, PlanKind};
    use crate::test_helpers::{custom_request, fixed_time};

    fn custom_of(req: &crate::models::PlanRequest) -> &CustomRequest {
        match &req.kind {
            PlanKind::Custom(c) => c,
            PlanKind::Fibo(_) => unreachable!(),
        }
    }

    #[test]
    fn fires_for_legs_under_three_r() {
        let req = custom_request(
            &[(100.0, 99.0, 101.0), (100.5, 99.0, 102.0)],
            1.0,
            Direction::Long,
        );
        let resp = plan(&req, fixed_time());
        let recs = recommend_targets(custom_of(&req), &resp);
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].leg, 1);
        assert!((recs[0].suggested_tp - 103.0).abs() < 1e-9);
        assert!((recs[1].suggested_tp - 105.0).abs() < 1e-9);
    }

    #[test]
    fn silent_at_three_r_or_without_tp() {
        let req = custom_request(
            &[(100.0, 99.0, 103.0), (100.0, 99.0, 0.0)],
            1.0,
            Direction::Long,
        );
        let resp = plan(&req, fixed_time());
        assert!(recommend_targets(custom_of(&req), &resp).is_empty());
    }

    #[test]
    fn short_suggestion_stays_above_entry() {
        let req = custom_request(&[(100.0, 101.0, 95.0)], 1.0, Direction::Short);
        let resp = plan(&req, fixed_time());
        let recs = recommend_targets(custom_of(&req), &resp);
        assert_eq!(recs.len(), 1);
        assert!((recs[0].rr + 5.0).abs() < 1e-9);
        assert!((recs[0].suggested_tp - 103.0).abs() < 1e-9);
    }

    #[test]
    fn skipped_when_stop_degenerate() {
        let req = custom_request(&[(100.0, 100.0, 101.0)], 1.0, Direction::Long);
        let resp = plan(&req, fixed_time());
        assert!(recommend_targets(custom_of(&req), &resp).is_empty());
    }
}
