use clap::ValueEnum;
use serde_json::json;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

use crate::models::PlanResponse;
use crate::trading::{PersistenceError, TradeLog};

pub const MOCK_DESTINATION: &str = "mock-broker";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Print the plan as indented JSON
    Copy,
    /// Echo the plan as a mock dispatch (no network)
    Send,
    /// Append the plan to the trade log
    Save,
}

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("could not encode plan: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("could not save plan: {0}")]
    Persist(#[from] PersistenceError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Copied(String),
    Sent(String),
    Saved(PathBuf),
}

pub fn copy_text(resp: &PlanResponse) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(resp)
}

/// The dispatch envelope. Nothing leaves the process.
pub fn mock_send(resp: &PlanResponse) -> Result<String, serde_json::Error> {
    let envelope = json!({
        "mock": true,
        "destination": MOCK_DESTINATION,
        "status": "echoed",
        "payload": resp,
    });
    serde_json::to_string_pretty(&envelope)
}

pub fn perform(
    action: Action,
    resp: &PlanResponse,
    log: &TradeLog,
) -> Result<ActionOutcome, ActionError> {
    match action {
        Action::Copy => Ok(ActionOutcome::Copied(copy_text(resp)?)),
        Action::Send => {
            info!("Mock send of {} {} plan", resp.mode, resp.direction);
            Ok(ActionOutcome::Sent(mock_send(resp)?))
        }
        Action::Save => {
            log.append(resp)?;
            Ok(ActionOutcome::Saved(log.path().to_path_buf()))
        }
    }
}
