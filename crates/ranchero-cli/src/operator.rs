//! Operator identity resolution for `created_by` stamps.
//!
//! The resolution chain: `--as` flag > `RANCH_OPERATOR` env > user config >
//! `USER` env (TTY only). Mutating commands require an identity; read-only
//! commands work without one.

use std::env;

/// Error when no operator identity could be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorResolutionError {
    pub message: String,
    pub code: &'static str,
}

impl std::fmt::Display for OperatorResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for OperatorResolutionError {}

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
    fn is_tty(&self) -> bool;
}

struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn is_tty(&self) -> bool {
        use std::io::IsTerminal;
        std::io::stdin().is_terminal()
    }
}

fn resolve_operator_with(
    cli_flag: Option<&str>,
    config_operator: Option<&str>,
    env: &dyn EnvReader,
) -> Option<String> {
    if let Some(operator) = cli_flag {
        if !operator.is_empty() {
            return Some(operator.to_string());
        }
    }

    if let Some(val) = env.get("RANCH_OPERATOR") {
        return Some(val);
    }

    if let Some(operator) = config_operator {
        if !operator.is_empty() {
            return Some(operator.to_string());
        }
    }

    // USER only counts when someone is actually at the terminal.
    if env.is_tty() {
        if let Some(val) = env.get("USER") {
            return Some(val);
        }
    }

    None
}

/// Resolve the operator identity, or `None` when nothing is configured.
pub fn resolve_operator(cli_flag: Option<&str>, config_operator: Option<&str>) -> Option<String> {
    resolve_operator_with(cli_flag, config_operator, &RealEnv)
}

/// Resolve the operator identity, erroring when missing.
///
/// Use this for mutating commands that stamp `created_by`.
pub fn require_operator(
    cli_flag: Option<&str>,
    config_operator: Option<&str>,
) -> Result<String, OperatorResolutionError> {
    resolve_operator(cli_flag, config_operator).ok_or_else(|| OperatorResolutionError {
        message: "Operator identity required for this command. \
                  Set --as, RANCH_OPERATOR, or operator in the user config."
            .to_string(),
        code: "missing_operator",
    })
}
