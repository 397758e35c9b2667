#[cfg(test)]
mod tests {
    use crate::metrics::analytics::{
        bullwhip_by_role, compare_runs, order_oscillation_by_role, service_level_by_role,
        summarize_run, system_cost,
    };
    use crate::model::state::Role;
    use crate::simulation::engine::LogRecord;

    fn row(period: usize, role: Role, incoming: u32, placed: u32, backlog: u32) -> LogRecord {
        LogRecord {
            period,
            role,
            incoming_order: incoming,
            placed_order: placed,
            received_shipment: 0,
            fulfilled_shipment: 0,
            backlog,
            inventory_on_hand: 10,
            pipeline_on_order: 0,
            cost_holding: 5.0,
            cost_backlog: f64::from(backlog),
        }
    }

    fn retailer_series(pairs: &[(u32, u32)]) -> Vec<LogRecord> {
        pairs
            .iter()
            .enumerate()
            .map(|(t, &(incoming, placed))| row(t, Role::Retailer, incoming, placed, 0))
            .collect()
    }

    #[test]
    fn equal_variances_give_bullwhip_of_exactly_one() {
        let log = retailer_series(&[(2, 2), (6, 6), (4, 4), (8, 8), (3, 3)]);
        let factor = bullwhip_by_role(&log, 0)[0].1;
        assert!((factor - 1.0).abs() < 1e-12);
    }

    #[test]
    fn amplified_orders_give_bullwhip_above_one() {
        // Orders move twice as far as demand: variance ratio is 4.
        let log = retailer_series(&[(4, 4), (6, 8), (4, 4), (6, 8)]);
        let factor = bullwhip_by_role(&log, 0)[0].1;
        assert!((factor - 4.0).abs() < 1e-9);
    }

    #[test]
    fn zero_demand_variance_reports_nan_not_error() {
        let log = retailer_series(&[(4, 2), (4, 9), (4, 5)]);
        assert!(bullwhip_by_role(&log, 0)[0].1.is_nan());
    }

    #[test]
    fn warm_up_prefix_is_excluded_on_request() {
        // The only variation sits in the first two periods.
        let log = retailer_series(&[(0, 0), (4, 4), (4, 4), (4, 4), (4, 4)]);
        let full = bullwhip_by_role(&log, 0)[0].1;
        assert!((full - 1.0).abs() < 1e-12);
        let trimmed = bullwhip_by_role(&log, 2)[0].1;
        assert!(trimmed.is_nan());
    }

    #[test]
    fn system_cost_sums_both_cost_components() {
        let log = vec![
            row(0, Role::Retailer, 4, 4, 3),
            row(0, Role::Wholesaler, 4, 4, 0),
            row(1, Role::Retailer, 4, 4, 1),
        ];
        // 3 rows * 5.0 holding + backlog 3 + 0 + 1
        assert!((system_cost(&log) - 19.0).abs() < 1e-12);
    }

    #[test]
    fn service_level_counts_backlog_free_periods() {
        let log = vec![
            row(0, Role::Retailer, 4, 4, 0),
            row(1, Role::Retailer, 4, 4, 2),
            row(2, Role::Retailer, 4, 4, 0),
            row(3, Role::Retailer, 4, 4, 5),
        ];
        let rate = service_level_by_role(&log)[0].1;
        assert!((rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn oscillation_is_mean_absolute_order_change() {
        let log = retailer_series(&[(4, 4), (4, 8), (4, 4)]);
        let oscillation = order_oscillation_by_role(&log)[0].1;
        assert!((oscillation - 4.0).abs() < 1e-12);
    }

    #[test]
    fn steady_orders_have_zero_oscillation() {
        let log = retailer_series(&[(4, 4), (4, 4), (4, 4)]);
        assert_eq!(order_oscillation_by_role(&log)[0].1, 0.0);
    }

    #[test]
    fn summarize_skips_degenerate_roles() {
        // Retailer bullwhip is NaN (flat demand); the average must still be
        // finite if any role has a defined factor.
        let mut log = retailer_series(&[(4, 4), (4, 4), (4, 4)]);
        log.extend(vec![
            row(0, Role::Wholesaler, 2, 2, 0),
            row(1, Role::Wholesaler, 6, 6, 0),
            row(2, Role::Wholesaler, 4, 4, 0),
        ]);
        let summary = summarize_run("mixed", &log, 0);
        assert!((summary.avg_bullwhip - 1.0).abs() < 1e-12);
        assert!((summary.max_bullwhip - 1.0).abs() < 1e-12);
    }

    #[test]
    fn compare_runs_ranks_by_cost_and_bullwhip() {
        let calm = retailer_series(&[(2, 2), (6, 6), (4, 4)]);
        let mut wild = retailer_series(&[(2, 0), (6, 14), (4, 2)]);
        for r in &mut wild {
            r.cost_backlog = 100.0;
        }
        let ranked = compare_runs(&[("wild", &wild), ("calm", &calm)], 0);

        assert_eq!(ranked[0].name, "calm");
        assert_eq!(ranked[0].cost_rank, 1);
        assert_eq!(ranked[0].bullwhip_rank, 1);
        assert_eq!(ranked[1].name, "wild");
        assert_eq!(ranked[1].cost_rank, 2);
        assert_eq!(ranked[1].bullwhip_rank, 2);
    }
}
