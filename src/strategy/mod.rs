pub mod adaptive;
pub mod human;
pub mod optimization;
pub mod reactive;
pub mod traits;

pub use adaptive::{
    AntifragileAdapter, BayesianUpdater, InfoAware, Inverter, SignalChaser, Stabilizer,
};
pub use human::HumanInTheLoop;
pub use reactive::{
    AggressiveGrowthHacker, ConservativeCustodian, MyopicFirefighter, PassivePipeline,
    ProductionSmoother, RandomBaseline, RationalAnalyst,
};
pub use traits::OrderPolicy;
