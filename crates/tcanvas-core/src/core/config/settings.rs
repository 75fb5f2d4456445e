use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_COLUMNS: usize = 80;
pub const DEFAULT_ROWS: usize = 24;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbose: u8,
    pub trace: bool,
    pub json: bool,
    pub no_color: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars().collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }

    /// A positive integer from `key`; anything else is ignored with a warning.
    fn dimension(&self, key: &str) -> Option<usize> {
        let raw = self.var(key)?;
        match raw.trim().parse::<usize>() {
            Ok(value) if value > 0 => Some(value),
            _ => {
                warn!(key, value = raw, "ignoring invalid terminal dimension");
                None
            }
        }
    }
}

/// Reports the live size of the controlling terminal.
pub trait TerminalProbe {
    /// `(columns, rows)`, or `None` when there is no terminal.
    fn size(&self) -> Option<(usize, usize)>;
}

pub(crate) struct CrosstermProbe;

impl TerminalProbe for CrosstermProbe {
    fn size(&self) -> Option<(usize, usize)> {
        crossterm::terminal::size()
            .ok()
            .map(|(columns, rows)| (usize::from(columns), usize::from(rows)))
    }
}

#[derive(Debug)]
pub struct Config {
    pub(crate) size: SizeConfig,
    pub(crate) color: ColorConfig,
}

impl Config {
    /// Builds a configuration snapshot from the current process environment
    /// and the attached terminal.
    #[must_use]
    pub fn from_env() -> Self {
        let snapshot = EnvSnapshot::capture();
        Self::from_snapshot(&snapshot, &CrosstermProbe)
    }

    pub(crate) fn from_snapshot(snapshot: &EnvSnapshot, probe: &dyn TerminalProbe) -> Self {
        let probed = probe.size();
        let columns = snapshot
            .dimension("TCANVAS_COLUMNS")
            .or_else(|| snapshot.dimension("COLUMNS"))
            .or_else(|| probed.map(|(columns, _)| columns).filter(|c| *c > 0));
        let rows = snapshot
            .dimension("TCANVAS_ROWS")
            .or_else(|| snapshot.dimension("LINES"))
            .or_else(|| probed.map(|(_, rows)| rows).filter(|r| *r > 0));

        let enabled = match snapshot.var("TCANVAS_COLOR") {
            Some(value) => {
                let lowered = value.to_ascii_lowercase();
                !matches!(lowered.as_str(), "0" | "false" | "no" | "off" | "")
            }
            None => snapshot.var("NO_COLOR").is_none(),
        };

        Self {
            size: SizeConfig { columns, rows },
            color: ColorConfig { enabled },
        }
    }

    #[must_use]
    pub fn size(&self) -> &SizeConfig {
        &self.size
    }

    #[must_use]
    pub fn color(&self) -> &ColorConfig {
        &self.color
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeConfig {
    pub columns: Option<usize>,
    pub rows: Option<usize>,
}

impl SizeConfig {
    /// `(columns, rows)`, falling back to 80×24 where nothing was found.
    #[must_use]
    pub fn resolve(&self) -> (usize, usize) {
        (
            self.columns.unwrap_or(DEFAULT_COLUMNS),
            self.rows.unwrap_or(DEFAULT_ROWS),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    pub enabled: bool,
}
