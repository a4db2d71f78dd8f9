//! Locates the configuration file for a run.
//!
//! Resolution order:
//!
//! 1. `--config <path>`
//! 2. `<root>/objc-lint.toml`, then `<root>/.objc-lint.toml`
//! 3. `config.toml` in the global directory (`$OBJC_LINT_CONFIG_DIR` or `~/.objc-lint/`)
//! 4. Built-in defaults

use std::path::{Path, PathBuf};

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line.
    Explicit(PathBuf),
    /// Found next to the headers.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// The file to load, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "{}", p.display()),
            Self::Project(p) => write!(f, "{} (project)", p.display()),
            Self::Global(p) => write!(f, "{} (global)", p.display()),
            Self::Default => f.write_str("built-in defaults"),
        }
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["objc-lint.toml", ".objc-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Environment variable overriding the global config directory.
pub const CONFIG_DIR_ENV: &str = "OBJC_LINT_CONFIG_DIR";

/// Resolves the configuration for headers under `root`.
#[must_use]
pub fn resolve(root: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_in(root, explicit, global_config_dir().as_deref())
}

// Takes the global directory as a parameter so tests never touch the environment.
fn resolve_in(root: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> ConfigSource {
    if let Some(path) = explicit {
        return ConfigSource::Explicit(path.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Default,
    }
}

/// The global config directory: `$OBJC_LINT_CONFIG_DIR`, else `~/.objc-lint`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => home::home_dir().map(|home| home.join(".objc-lint")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) -> PathBuf {
        fs::write(path, "").unwrap();
        path.to_path_buf()
    }

    #[test]
    fn explicit_path_wins_without_existence_check() {
        let root = TempDir::new().unwrap();
        touch(&root.path().join("objc-lint.toml"));

        let source = resolve_in(root.path(), Some(Path::new("/missing/lint.toml")), None);
        assert_eq!(
            source,
            ConfigSource::Explicit(PathBuf::from("/missing/lint.toml"))
        );
    }

    #[test]
    fn plain_project_name_preferred_over_dotfile() {
        let root = TempDir::new().unwrap();
        let dotfile = touch(&root.path().join(".objc-lint.toml"));

        assert_eq!(
            resolve_in(root.path(), None, None),
            ConfigSource::Project(dotfile)
        );

        let plain = touch(&root.path().join("objc-lint.toml"));
        assert_eq!(
            resolve_in(root.path(), None, None),
            ConfigSource::Project(plain)
        );
    }

    #[test]
    fn global_only_when_project_has_none() {
        let root = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        assert_eq!(
            resolve_in(root.path(), None, Some(global.path())),
            ConfigSource::Default
        );

        let global_file = touch(&global.path().join("config.toml"));
        assert_eq!(
            resolve_in(root.path(), None, Some(global.path())),
            ConfigSource::Global(global_file)
        );

        touch(&root.path().join("objc-lint.toml"));
        assert!(matches!(
            resolve_in(root.path(), None, Some(global.path())),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn directory_named_like_config_is_skipped() {
        let root = TempDir::new().unwrap();
        fs::create_dir(root.path().join("objc-lint.toml")).unwrap();

        assert_eq!(resolve_in(root.path(), None, None), ConfigSource::Default);
    }

    #[test]
    fn describes_source() {
        assert_eq!(ConfigSource::Default.to_string(), "built-in defaults");
        assert!(ConfigSource::Default.path().is_none());
        assert_eq!(
            ConfigSource::Global(PathBuf::from("/etc/lint.toml")).to_string(),
            "/etc/lint.toml (global)"
        );
    }
}
