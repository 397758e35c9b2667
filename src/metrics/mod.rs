pub mod analytics;

pub use analytics::{
    bullwhip_by_role, compare_runs, order_oscillation_by_role, run_and_compare,
    service_level_by_role, summarize_run, system_cost, Scenario, ScenarioSummary,
    DEFAULT_WARM_UP,
};
