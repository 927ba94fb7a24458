//! Prompt helpers for description generation.

use sha2::{Digest, Sha256};

use crate::alarm::AlarmKind;
use crate::generator::DescriptionRequest;

/// System prompt used when a generator is not given one.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You write descriptions for AWS CloudWatch alarms. \
Answer with one or two plain sentences explaining what the alarm watches and what an \
operator should check when it fires. Do not use markdown.";

/// Build the user prompt describing one alarm.
pub fn description_prompt(request: &DescriptionRequest) -> String {
    let mut prompt = format!(
        "Write a short description for the CloudWatch alarm below.\n\nAlarm name: {}\n",
        request.alarm_name
    );

    match request.kind {
        AlarmKind::Metric => {
            prompt.push_str(&format!(
                "Metric: {}\nNamespace: {}\nComparison: {}\nThreshold: {}\n",
                request.metric_name.as_deref().unwrap_or("unknown"),
                request.namespace.as_deref().unwrap_or("unknown"),
                request.comparison_operator.as_deref().unwrap_or("unknown"),
                request
                    .threshold
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            ));
        }
        AlarmKind::Composite => {
            prompt.push_str(&format!(
                "Composite rule: {}\n",
                request.alarm_rule.as_deref().unwrap_or("unknown")
            ));
        }
    }

    prompt
}

/// Compute a stable SHA-256 fingerprint for a prompt string.
pub fn hash_prompt(prompt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompt.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{:02x}", byte));
    }
    hex
}
