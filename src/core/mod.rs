pub mod fibonacci;
pub mod planner;
pub mod recommendation;
pub mod sizing;
