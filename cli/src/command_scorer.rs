//! Scorer bridge to an external executable.
//!
//! One process per call: a JSON request on stdin, a JSON response on stdout.
//!
//! ```text
//! {"op":"score","metrics":{…}}                      → {"score":…,"dimensionBreakdown":{…},"tierCount":…}
//! {"op":"warnings","metrics":{…},"dimensions":{…}}  → ["…", …]
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result, bail};
use corelib::{DimensionBreakdown, PoolMetrics, ScoreOutput, Scorer};
use lpscope::AppError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum Request<'a> {
    Score {
        metrics: &'a PoolMetrics,
    },
    Warnings {
        metrics: &'a PoolMetrics,
        dimensions: &'a DimensionBreakdown,
    },
}

#[derive(Debug, Clone)]
pub struct CommandScorer {
    program: PathBuf,
}

impl CommandScorer {
    /// Locate the scorer executable. A missing path is fatal at startup.
    pub fn locate(program: Option<&Path>) -> Result<Self, AppError> {
        let program = program.ok_or_else(|| {
            AppError::ScorerUnavailable("LPSCOPE_SCORER_CMD is not set".to_string())
        })?;

        if !program.is_file() {
            return Err(AppError::ScorerUnavailable(format!(
                "scorer executable {} not found",
                program.display()
            )));
        }

        Ok(Self {
            program: program.to_path_buf(),
        })
    }

    fn call<T: DeserializeOwned>(&self, req: &Request<'_>) -> Result<T> {
        let payload = serde_json::to_vec(req).context("encode scorer request")?;

        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .with_context(|| format!("spawn scorer {}", self.program.display()))?;

        child
            .stdin
            .take()
            .context("scorer stdin unavailable")?
            .write_all(&payload)
            .context("write scorer request")?;

        let out = child.wait_with_output().context("wait for scorer")?;
        if !out.status.success() {
            bail!("scorer exited with {}", out.status);
        }

        debug!(bytes = out.stdout.len(), "scorer responded");
        serde_json::from_slice(&out.stdout).context("decode scorer response")
    }
}

impl Scorer for CommandScorer {
    fn score(&self, metrics: &PoolMetrics) -> Result<ScoreOutput> {
        self.call(&Request::Score { metrics })
    }

    fn warnings(&self, metrics: &PoolMetrics, breakdown: &DimensionBreakdown) -> Result<Vec<String>> {
        self.call(&Request::Warnings {
            metrics,
            dimensions: breakdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_command_is_unavailable() {
        let err = CommandScorer::locate(None).unwrap_err();
        assert!(matches!(err, AppError::ScorerUnavailable(_)));
    }

    #[test]
    fn missing_executable_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = CommandScorer::locate(Some(&dir.path().join("scorer"))).unwrap_err();
        assert!(matches!(err, AppError::ScorerUnavailable(_)));
    }

    #[test]
    fn request_shape() {
        let metrics: PoolMetrics = serde_json::from_value(serde_json::json!({
            "poolId": "XRP_FOO", "mintA": "XRP", "mintB": "FOO", "ammAccount": null,
            "tokenName": null, "tokenCode": null, "tokenIssuer": null,
            "liquidity": 1.0, "volume24h": 0.0, "volume7d": null,
            "txCount24h": 0, "txCount7d": null, "feeFraction": null, "volatility": null,
            "trustlineCount": 0, "isBlacklisted": false, "isBlackholed": false,
            "freezeEnabled": false, "totalValueLocked": null,
            "valuationConfidenceLevel": "unknown", "priceConfident": false,
            "priceImpact": null, "dataAgeHours": 0.0, "sourceUpdatedAt": null
        }))
        .unwrap();

        let v = serde_json::to_value(Request::Score { metrics: &metrics }).unwrap();
        assert_eq!(v["op"], "score");
        assert_eq!(v["metrics"]["poolId"], "XRP_FOO");
    }
}
