//! Options for VC generation and proving
//!
//! Command-line parsing happens in the host. The core only sees the resolved
//! values, either built directly or through [`CompileFlags`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default per-VC timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// VC generation options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VcGenOptions {
    /// Reduce every VC to atomic sequents before naming
    /// Default: true
    pub reduce_sequents: bool,

    /// Only add assumed conjuncts that share variables with the goal
    /// Default: true
    pub parsimonious_assume: bool,

    /// Drop `true` hypotheses, `false` goals and duplicates
    /// Default: true
    pub simplify: bool,
}

impl Default for VcGenOptions {
    fn default() -> Self {
        Self {
            reduce_sequents: true,
            parsimonious_assume: true,
            simplify: true,
        }
    }
}

/// What an elaboration rule stores as its resultant for single-clause theorems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElaborationMode {
    /// Store the whole theorem assertion
    Literal,
    /// Store only the selected sub-expression
    Subexpression,
}

/// Congruence-class prover options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProverOptions {
    /// Run the prover at all (`ccprove`)
    pub enabled: bool,

    /// Wall-clock budget per VC
    pub timeout: Duration,

    /// Halt once consecutive unproved VCs exceed this; `0` halts on the first, `None` never halts
    pub num_tries: Option<usize>,

    /// Maximum number of stacked proof steps
    pub max_depth: usize,

    /// Maximum candidate applications tried per VC
    pub max_steps: usize,

    /// Prove VCs on a thread pool
    pub parallel: bool,

    /// Worker threads when `parallel` is set
    pub max_parallelism: usize,

    pub elaboration: ElaborationMode,
}

impl Default for ProverOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            num_tries: None,
            max_depth: 4,
            max_steps: 2_000,
            parallel: false,
            max_parallelism: num_cpus::get(),
            elaboration: ElaborationMode::Literal,
        }
    }
}

impl ProverOptions {
    /// Enabled with defaults
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Default::default()
        }
    }

    /// Deeper search with a longer budget
    pub fn thorough() -> Self {
        Self {
            enabled: true,
            timeout: Duration::from_millis(4 * DEFAULT_TIMEOUT_MS),
            max_depth: 6,
            max_steps: 20_000,
            ..Default::default()
        }
    }
}

/// Flags as resolved by the host's command line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompileFlags {
    /// `ccprove`
    #[serde(default)]
    pub ccprove: bool,
    /// `timeout` in milliseconds
    #[serde(default)]
    pub timeout: Option<u64>,
    /// `num_tries`; `-1` means unbounded
    #[serde(default)]
    pub num_tries: Option<i64>,
}

impl CompileFlags {
    /// Resolve into prover options
    pub fn prover_options(&self) -> Result<ProverOptions> {
        let timeout = match self.timeout {
            Some(0) => return Err(Error::InvalidConfig("timeout must be positive".to_string())),
            Some(ms) => Duration::from_millis(ms),
            None => Duration::from_millis(DEFAULT_TIMEOUT_MS),
        };
        let num_tries = match self.num_tries {
            None | Some(-1) => None,
            Some(n) if n >= 0 => Some(n as usize),
            Some(n) => {
                return Err(Error::InvalidConfig(format!(
                    "num_tries must be non-negative or -1, got {}",
                    n
                )))
            }
        };
        Ok(ProverOptions {
            enabled: self.ccprove,
            timeout,
            num_tries,
            ..Default::default()
        })
    }

    /// Parse flags from JSON
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Options for a whole verification run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerifierOptions {
    pub vcgen: VcGenOptions,
    pub prover: ProverOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prover_defaults() {
        let opts = ProverOptions::default();
        assert!(!opts.enabled);
        assert_eq!(opts.timeout, Duration::from_millis(5000));
        assert_eq!(opts.num_tries, None);
        assert_eq!(opts.elaboration, ElaborationMode::Literal);
    }

    #[test]
    fn test_flags_resolution() {
        let flags = CompileFlags::from_json(r#"{"ccprove": true, "timeout": 250, "num_tries": 3}"#).unwrap();
        let opts = flags.prover_options().unwrap();
        assert!(opts.enabled);
        assert_eq!(opts.timeout, Duration::from_millis(250));
        assert_eq!(opts.num_tries, Some(3));

        let unbounded = CompileFlags { num_tries: Some(-1), ..Default::default() };
        assert_eq!(unbounded.prover_options().unwrap().num_tries, None);

        let first_failure = CompileFlags { num_tries: Some(0), ..Default::default() };
        assert_eq!(first_failure.prover_options().unwrap().num_tries, Some(0));
    }

    #[test]
    fn test_invalid_flags() {
        let negative = CompileFlags { num_tries: Some(-2), ..Default::default() };
        assert!(matches!(negative.prover_options(), Err(Error::InvalidConfig(_))));
        let no_time = CompileFlags { timeout: Some(0), ..Default::default() };
        assert!(no_time.prover_options().is_err());
    }
}
