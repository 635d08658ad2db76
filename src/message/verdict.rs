use crate::{errors, message::nullable};
use serde::Deserialize;

// The judge leaves out whatever is irrelevant for a verdict (e.g. subtasks of a submission that
// did not compile) or sends it as null, so every field falls back to its zero value.

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FinalVerdict {
    pub compiled: bool,
    #[serde(deserialize_with = "nullable::or_default")]
    pub compiler_log: String,
    pub shown_test: u64,
    pub shown_verdict: u64,
    #[serde(deserialize_with = "nullable::or_default")]
    pub shown_verdict_text: String,
    #[serde(deserialize_with = "nullable::or_default")]
    pub subtasks: Vec<SubtaskResult>,
    pub total_points: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SubtaskResult {
    pub points: u64,
    pub skipped: bool,
    #[serde(rename = "worst_time")]
    pub worst_time_ms: u64,
    #[serde(deserialize_with = "nullable::or_default")]
    pub failed_tests: Vec<FailedTest>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FailedTest {
    pub n: u64,
    pub milliseconds: u64,
    pub partial_score: u64,
    #[serde(rename = "verdict")]
    pub verdict_code: u64,
    #[serde(deserialize_with = "nullable::or_default")]
    pub verdict_text: String,
}

impl FinalVerdict {
    pub fn decode(payload: &[u8]) -> Result<FinalVerdict, errors::Error> {
        serde_json::from_slice(payload).map_err(|e| {
            errors::MalformedVerdict(format!(
                "{e} in {:?}",
                String::from_utf8_lossy(&payload[..payload.len().min(256)])
            ))
        })
    }
}
