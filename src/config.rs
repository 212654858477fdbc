/// Configuration: resolved once at startup from the environment.
/// There is no config file; every section falls back to a default.

use crate::error::Error;
use log::warn;
use std::path::PathBuf;
use std::str::FromStr;

/// Icon location, relative to the home directory.
pub const ICON_PATH: &str = ".xtermng/icon/xtermng.png";
pub const DEFAULT_SHELL: &str = "/bin/sh";

#[derive(Debug, Clone)]
pub struct Config {
    pub home: PathBuf,
    pub font: FontConfig,
    pub window: WindowConfig,
    pub shell: ShellConfig,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    pub default_scale: f64,
    pub step: f64,
    pub min_scale: f64,
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub program: String,
    pub working_dir: PathBuf,
}

/// How the two panes are arranged. `Stacked` also binds Ctrl+Shift+W.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    #[default]
    SideBySide,
    Stacked,
}

impl FromStr for Layout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "side-by-side" => Ok(Layout::SideBySide),
            "stacked" => Ok(Layout::Stacked),
            other => Err(Error::UnknownLayout(other.into())),
        }
    }
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            default_scale: 1.0,
            step: 0.1,
            min_scale: 0.1,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "XtermNG".into(),
            width: 1200,
            height: 700,
        }
    }
}

impl Config {
    /// Resolve from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Resolve using `var` to look up environment variables.
    /// Empty values count as unset.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        let home = lookup("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(passwd_home);

        let shell = ShellConfig {
            program: lookup("SHELL").unwrap_or_else(|| DEFAULT_SHELL.into()),
            working_dir: home.clone(),
        };

        let layout = match lookup("XTERMNG_LAYOUT") {
            Some(value) => value.parse().unwrap_or_else(|e| {
                warn!("{e}; using side-by-side");
                Layout::default()
            }),
            None => Layout::default(),
        };

        Self {
            home,
            font: FontConfig::default(),
            window: WindowConfig::default(),
            shell,
            layout,
        }
    }

    /// Where the window icon is expected, whether or not it exists.
    pub fn icon_path(&self) -> PathBuf {
        self.home.join(ICON_PATH)
    }

    /// The window icon, if the file is present.
    pub fn icon(&self) -> Option<PathBuf> {
        let path = self.icon_path();
        path.exists().then_some(path)
    }
}

fn passwd_home() -> PathBuf {
    nix::unistd::User::from_uid(nix::unistd::getuid())
        .ok()
        .flatten()
        .map(|user| user.dir)
        .unwrap_or_else(|| PathBuf::from("."))
}
