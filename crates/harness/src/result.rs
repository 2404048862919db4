// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

use crate::{catalog::Study, scrape::MetricSample, summary::MetricsSummary};
use benchutil::format;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use std::{fmt, str::FromStr, time::Duration};
use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Recorded for every ablation run; the harness doesn't classify findings.
pub const EXPLOIT_TYPE: &str = "various";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Pending,
    Completed,
    Timeout,
    Error,
}

/// Wall time until the fuzzer exited, or the fact that it had to be killed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DetectionTime {
    Elapsed(Duration),
    Timeout,
}

impl DetectionTime {
    const TIMEOUT: &'static str = "Timeout";

    /// Seconds for charting, with `Timeout` mapped to `timeout_secs`.
    pub fn as_secs(&self, timeout_secs: f64) -> f64 {
        match self {
            DetectionTime::Elapsed(span) => span.as_secs_f64(),
            DetectionTime::Timeout => timeout_secs,
        }
    }
}

impl fmt::Display for DetectionTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionTime::Elapsed(span) => f.write_str(&format::seconds(*span)),
            DetectionTime::Timeout => f.write_str(Self::TIMEOUT),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid detection time `{0}`")]
pub struct ParseDetectionTimeError(String);

impl FromStr for DetectionTime {
    type Err = ParseDetectionTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == Self::TIMEOUT {
            return Ok(DetectionTime::Timeout);
        }
        format::parse_seconds(s)
            .map(DetectionTime::Elapsed)
            .ok_or_else(|| ParseDetectionTimeError(s.to_owned()))
    }
}

/// Outcome of one (contract, config) pair.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub project: String,
    pub config: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exploit_type: Option<String>,
    pub start_time: DateTime<Local>,
    #[serde(default)]
    pub end_time: Option<DateTime<Local>>,
    pub status: RunStatus,
    pub timeout: bool,
    /// Set when the scraped memory reached the configured limit.
    pub oom: bool,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub detection_time: Option<DetectionTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<MetricsSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metrics_timeline: Vec<MetricSample>,
}

impl RunResult {
    pub fn new(project: &str, config: &str, study: Study) -> Self {
        Self {
            project: project.to_owned(),
            config: config.to_owned(),
            exploit_type: matches!(study, Study::Ablation).then(|| EXPLOIT_TYPE.to_owned()),
            start_time: Local::now(),
            end_time: None,
            status: RunStatus::Pending,
            timeout: false,
            oom: false,
            detection_time: None,
            exit_code: None,
            error: None,
            summary: None,
            metrics_timeline: vec![],
        }
    }

    pub fn complete(&mut self, elapsed: Duration, exit_code: Option<i32>) {
        self.status = RunStatus::Completed;
        self.detection_time = Some(DetectionTime::Elapsed(elapsed));
        self.exit_code = exit_code;
    }

    pub fn time_out(&mut self) {
        self.status = RunStatus::Timeout;
        self.timeout = true;
        self.detection_time = Some(DetectionTime::Timeout);
    }

    pub fn fail(&mut self, error: impl fmt::Display) {
        self.status = RunStatus::Error;
        self.error = Some(error.to_string());
    }

    /// `detection_time` as printed in tables, empty when the run never finished.
    pub fn detection_text(&self) -> String {
        self.detection_time
            .map(|time| time.to_string())
            .unwrap_or_default()
    }
}
