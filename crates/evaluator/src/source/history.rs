//! Decoding of `StateUpdate` history items.

use alarm_core::{AlarmState, StateTransition};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryData {
    old_state: Option<HistoryState>,
    new_state: HistoryState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryState {
    state_value: String,
}

/// Decode the JSON `HistoryData` of a state update into a transition.
///
/// Returns `None` for items that are not state changes or carry unknown
/// states; those are skipped rather than failing the read.
pub fn decode_history_data(timestamp: DateTime<Utc>, data: &str) -> Option<StateTransition> {
    let parsed: HistoryData = match serde_json::from_str(data) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!("Skipping undecodable history item at {}: {}", timestamp, e);
            return None;
        }
    };

    let to = parsed.new_state.state_value.parse::<AlarmState>().ok()?;
    let from = match parsed.old_state {
        Some(old) => Some(old.state_value.parse::<AlarmState>().ok()?),
        None => None,
    };

    Some(StateTransition { timestamp, from, to })
}
