pub mod actions;
pub mod chart;
pub mod tables;

pub use actions::{perform, Action, ActionError, ActionOutcome};
pub use chart::{ChartError, ChartWidget};
pub use tables::{status_banner, Banner, BannerLevel};
