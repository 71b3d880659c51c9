use std::ffi::CStr;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Environment variable enabling solver output (`true`/`false`, `1`/`0`).
pub const ENV_OUTPUT: &str = "HIGHS_BRIDGE_OUTPUT";
/// Environment variable holding the time limit in seconds.
pub const ENV_TIME_LIMIT: &str = "HIGHS_BRIDGE_TIME_LIMIT";
/// Environment variable holding the relative MIP gap.
pub const ENV_MIP_REL_GAP: &str = "HIGHS_BRIDGE_MIP_REL_GAP";
/// Environment variable selecting the presolve mode (`on`, `off`, `choose`).
pub const ENV_PRESOLVE: &str = "HIGHS_BRIDGE_PRESOLVE";

/// Presolve mode of the native solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presolve {
    /// Always presolve.
    On,
    /// Never presolve.
    Off,
    /// Let the solver decide.
    Choose,
}

impl Presolve {
    pub(crate) fn as_option_value(self) -> &'static CStr {
        match self {
            Presolve::On => c"on",
            Presolve::Off => c"off",
            Presolve::Choose => c"choose",
        }
    }
}

impl FromStr for Presolve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "on" => Ok(Presolve::On),
            "off" => Ok(Presolve::Off),
            "choose" => Ok(Presolve::Choose),
            other => Err(Error::invalid_argument(
                "config",
                format!("{ENV_PRESOLVE} must be one of on, off, choose (got `{other}`)"),
            )),
        }
    }
}

/// Typed solver options applied when a native instance is created.
///
/// The default keeps the solver silent and leaves every other option at the
/// solver's own default.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    /// Whether the solver may write to the console.
    pub output_flag: bool,
    /// Time limit in seconds for `run`.
    pub time_limit: Option<f64>,
    /// Relative gap at which a MIP solve stops.
    pub mip_rel_gap: Option<f64>,
    /// Presolve mode. `None` keeps the solver default.
    pub presolve: Option<Presolve>,
}

impl Config {
    /// Builds a configuration from the `HIGHS_BRIDGE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup. Missing keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(v) = lookup(ENV_OUTPUT) {
            config.output_flag = parse_bool(ENV_OUTPUT, &v)?;
        }
        if let Some(v) = lookup(ENV_TIME_LIMIT) {
            config.time_limit = Some(parse_non_negative(ENV_TIME_LIMIT, &v)?);
        }
        if let Some(v) = lookup(ENV_MIP_REL_GAP) {
            config.mip_rel_gap = Some(parse_non_negative(ENV_MIP_REL_GAP, &v)?);
        }
        if let Some(v) = lookup(ENV_PRESOLVE) {
            config.presolve = Some(v.parse()?);
        }
        Ok(config)
    }

    /// Sets the time limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    /// Sets the relative MIP gap.
    pub fn with_mip_rel_gap(mut self, gap: f64) -> Self {
        self.mip_rel_gap = Some(gap);
        self
    }

    /// Sets the presolve mode.
    pub fn with_presolve(mut self, presolve: Presolve) -> Self {
        self.presolve = Some(presolve);
        self
    }

    /// Enables or disables solver output.
    pub fn with_output(mut self, output_flag: bool) -> Self {
        self.output_flag = output_flag;
        self
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::invalid_argument(
            "config",
            format!("{key} must be a boolean (got `{other}`)"),
        )),
    }
}

fn parse_non_negative(key: &str, value: &str) -> Result<f64> {
    let parsed: f64 = value.trim().parse().map_err(|_| {
        Error::invalid_argument("config", format!("{key} must be a number (got `{value}`)"))
    })?;
    if parsed.is_nan() || parsed < 0.0 {
        return Err(Error::invalid_argument(
            "config",
            format!("{key} must be non-negative (got `{value}`)"),
        ));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.output_flag);
    }

    #[test]
    fn reads_all_keys() {
        let config = Config::from_lookup(lookup(&[
            (ENV_OUTPUT, "true"),
            (ENV_TIME_LIMIT, "2.5"),
            (ENV_MIP_REL_GAP, "0.01"),
            (ENV_PRESOLVE, "Off"),
        ]))
        .unwrap();
        assert_eq!(
            config,
            Config::default()
                .with_output(true)
                .with_time_limit(2.5)
                .with_mip_rel_gap(0.01)
                .with_presolve(Presolve::Off)
        );
    }

    #[test]
    fn rejects_malformed_values() {
        for pairs in [
            [(ENV_OUTPUT, "maybe")],
            [(ENV_TIME_LIMIT, "soon")],
            [(ENV_TIME_LIMIT, "-1")],
            [(ENV_MIP_REL_GAP, "NaN")],
            [(ENV_PRESOLVE, "aggressive")],
        ] {
            assert!(matches!(
                Config::from_lookup(lookup(&pairs)),
                Err(Error::InvalidArgument { .. })
            ));
        }
    }
}
