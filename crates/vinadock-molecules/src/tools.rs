//! Resolution of the converter and docking-engine executables.

use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use vinadock_common::{DockError, Result};

pub const DEFAULT_CONVERTER: &str = "obabel";

/// Resolved absolute paths of both external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub converter: PathBuf,
    pub engine: PathBuf,
}

impl ToolPaths {
    /// Resolve against `PATH`. `engine = None` falls back to [`default_engine_name`].
    pub fn locate(converter: Option<&str>, engine: Option<&str>) -> Result<Self> {
        Self::locate_in(converter, engine, env::var_os("PATH"))
    }

    /// Names containing a path separator are checked as given (relative to the
    /// current directory); bare names are searched in `search_path`.
    pub fn locate_in(
        converter: Option<&str>,
        engine: Option<&str>,
        search_path: Option<OsString>,
    ) -> Result<Self> {
        let cwd = env::current_dir()?;

        let engine_name = engine
            .map(str::to_string)
            .unwrap_or_else(default_engine_name);
        let engine = resolve(&engine_name, search_path.as_deref(), &cwd)
            .ok_or(DockError::ToolNotFound { tool: "vina", name: engine_name })?;

        let converter_name = converter.unwrap_or(DEFAULT_CONVERTER).to_string();
        let converter = resolve(&converter_name, search_path.as_deref(), &cwd)
            .ok_or(DockError::ToolNotFound { tool: "babel", name: converter_name })?;

        info!("Using converter {} and docking engine {}", converter.display(), engine.display());
        Ok(Self { converter, engine })
    }
}

fn resolve(name: &str, search_path: Option<&OsStr>, cwd: &Path) -> Option<PathBuf> {
    match which::which_in(name, search_path, cwd) {
        Ok(path) => {
            debug!("Resolved '{}' to {}", name, path.display());
            Some(path)
        }
        Err(e) => {
            debug!("Could not resolve '{}': {}", name, e);
            None
        }
    }
}

/// `platform.system()`-style name of the host OS.
pub fn platform_name() -> &'static str {
    match env::consts::OS {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        other => other,
    }
}

/// `{platform}-vina`, with `.exe` on Windows only.
pub fn default_engine_name() -> String {
    let suffix = if cfg!(windows) { ".exe" } else { "" };
    format!("{}-vina{}", platform_name(), suffix)
}
