//! Human- and machine-readable verification reports

use crate::error::Result;
use crate::prover::{ProofStatus, ProverRun};
use crate::vcgen::VcGenOutput;
use serde::{Deserialize, Serialize};

/// One VC as reported
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VcReportEntry {
    pub name: String,
    pub location: String,
    pub detail: Option<String>,
    pub sequent: String,
    /// `None` when the prover did not run
    pub status: Option<ProofStatus>,
    pub steps: usize,
    pub elapsed_ms: u64,
    pub proof: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub module: String,
    pub entries: Vec<VcReportEntry>,
    pub halted: bool,
}

impl VerificationReport {
    pub fn new(output: &VcGenOutput, run: Option<&ProverRun>) -> Self {
        let entries = output
            .vcs()
            .map(|vc| {
                let result = run.and_then(|r| r.find(vc.name()));
                VcReportEntry {
                    name: vc.name().to_string(),
                    location: vc.location().to_string(),
                    detail: vc.detail().map(|d| d.message.clone()),
                    sequent: vc.sequent().to_string(),
                    status: result.map(|r| r.status),
                    steps: result.map_or(0, |r| r.steps),
                    elapsed_ms: result.map_or(0, |r| r.elapsed_ms),
                    proof: result.map(|r| r.proof.clone()).unwrap_or_default(),
                }
            })
            .collect();
        Self {
            module: output.module.clone(),
            entries,
            halted: run.map_or(false, |r| r.halted),
        }
    }

    pub fn total_vcs(&self) -> usize {
        self.entries.len()
    }

    pub fn proved_vcs(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.status.map_or(false, |s| s.is_proved()))
            .count()
    }

    /// Percentage of VCs proved; 100 for a module without VCs
    pub fn proof_rate(&self) -> f64 {
        if self.entries.is_empty() {
            100.0
        } else {
            (self.proved_vcs() as f64 / self.entries.len() as f64) * 100.0
        }
    }

    /// Compact JSON summary
    pub fn to_json(&self) -> String {
        let unproved: Vec<&str> = self
            .entries
            .iter()
            .filter(|e| matches!(e.status, Some(ProofStatus::Unproved) | Some(ProofStatus::Skipped)))
            .map(|e| e.name.as_str())
            .collect();
        serde_json::json!({
            "module": self.module,
            "total_vcs": self.total_vcs(),
            "proved_vcs": self.proved_vcs(),
            "halted": self.halted,
            "metrics": {
                "vc_proof_rate": self.proof_rate(),
            },
            "unproved": unproved,
        })
        .to_string()
    }

    /// Full report, every entry included
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Terminal summary
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Module {}: {}/{} VC(s) proved ({:.1}%)\n",
            self.module,
            self.proved_vcs(),
            self.total_vcs(),
            self.proof_rate()
        );
        for entry in &self.entries {
            let mark = match entry.status {
                Some(s) if s.is_proved() => "✓",
                Some(_) => "✗",
                None => "?",
            };
            out.push_str(&format!(
                "  {} VC {:8} {}\n",
                mark,
                entry.name,
                entry.detail.as_deref().unwrap_or("")
            ));
        }
        if self.halted {
            out.push_str("  Prover halted early\n");
        }
        out
    }
}
