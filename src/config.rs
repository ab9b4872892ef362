//! Runtime configuration for the command-line driver.

use std::{
    env,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// Defaults resolved from `.env` and the process environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Moving-average window used when `--window` is not given.
    pub default_window: usize,
    /// Attach `_debug` traces to percentage-change output unless overridden.
    pub debug_trace: bool,
    /// Pretty-print result JSON.
    pub pretty: bool,
    /// Root folder relative `--output` paths resolve against.
    pub outputs_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_window: 7,
            debug_trace: false,
            pretty: true,
            outputs_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();
        let default_window = env::var("ACCUMULATOR_WINDOW")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.default_window);
        let debug_trace = env_flag("ACCUMULATOR_DEBUG").unwrap_or(defaults.debug_trace);
        let pretty = env_flag("ACCUMULATOR_PRETTY").unwrap_or(defaults.pretty);
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.outputs_dir);

        Ok(Self {
            default_window,
            debug_trace,
            pretty,
            outputs_dir,
        })
    }

    /// Convenience helper for derived output path segments.
    pub fn join_output<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.outputs_dir.join(path)
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let raw = env::var(name).ok()?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_output_paths_are_kept() {
        let settings = Settings::default();
        let absolute = std::env::temp_dir().join("out.json");
        assert_eq!(settings.join_output(&absolute), absolute);
    }

    #[test]
    fn relative_output_paths_resolve_under_outputs_dir() {
        let settings = Settings {
            outputs_dir: PathBuf::from("reports"),
            ..Settings::default()
        };
        assert_eq!(settings.join_output("a.json"), PathBuf::from("reports/a.json"));
    }
}
