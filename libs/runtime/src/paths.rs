use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

/// Resolve the application home directory.
///
/// - `explicit`: a user-provided path; `~` and `~/...` are expanded.
/// - `default_subdir`: subdirectory under the platform home used when no
///   explicit path was given (e.g. ".ticketdesk").
/// - `create`: create the resolved directory (and parents) if missing.
pub fn resolve_home_dir(
    explicit: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match explicit {
        Some(raw) => expand_tilde(&raw)?,
        None => platform_home()?.join(default_subdir),
    };

    let absolute = if resolved.is_relative() {
        std::env::current_dir()
            .context("cannot determine current directory")?
            .join(resolved)
    } else {
        resolved
    };

    if create {
        std::fs::create_dir_all(&absolute)
            .with_context(|| format!("cannot create home dir '{}'", absolute.display()))?;
    }

    Ok(absolute)
}

/// Expand a leading `~` or `~/` into the platform home directory.
fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return platform_home();
    }
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_home()?.join(rest));
    }
    Ok(PathBuf::from(raw))
}

/// Platform user home: $HOME on Unix, %APPDATA% on Windows.
fn platform_home() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "APPDATA";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    std::env::var_os(var)
        .map(PathBuf::from)
        .filter(|p| !p.as_os_str().is_empty() && Path::new(p).is_absolute())
        .ok_or_else(|| anyhow!("environment variable {} is not set to an absolute path", var))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn with_home<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
        #[cfg(target_os = "windows")]
        std::env::set_var("APPDATA", dir);
        #[cfg(not(target_os = "windows"))]
        std::env::set_var("HOME", dir);
        f()
    }

    #[test]
    fn default_subdir_under_platform_home() {
        let tmp = tempdir().unwrap();
        let resolved = with_home(tmp.path(), || {
            resolve_home_dir(None, ".ticketdesk", true).unwrap()
        });
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(".ticketdesk"));
        assert!(resolved.exists());
    }

    #[test]
    fn tilde_is_expanded() {
        let tmp = tempdir().unwrap();
        let resolved = with_home(tmp.path(), || {
            resolve_home_dir(Some("~/.custom_home".into()), ".ticketdesk", false).unwrap()
        });
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with(".custom_home"));
    }

    #[test]
    fn absolute_path_kept_as_is() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("explicit");
        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().into()), ".ticketdesk", true).unwrap();
        assert_eq!(resolved, target);
        assert!(target.exists());
    }
}
