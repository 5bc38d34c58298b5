//! Path resolution for caller-supplied path strings.
//!
//! Resolution is purely lexical: nothing here touches the filesystem, so a
//! path that does not exist yet (a file about to be written) resolves the
//! same way as one that does.

use std::path::{is_separator, Component, Path, PathBuf};

/// Expand a leading `~` or `~user` to a home directory.
///
/// Paths without the shorthand, and paths whose home directory cannot be
/// determined, are returned as written.
pub fn expand_user(path: &str) -> PathBuf {
    let Some(stripped) = path.strip_prefix('~') else {
        return PathBuf::from(path);
    };

    let (user, rest) = match stripped.find(is_separator) {
        Some(idx) => (&stripped[..idx], stripped[idx..].trim_start_matches(is_separator)),
        None => (stripped, ""),
    };

    let home = if user.is_empty() {
        dirs::home_dir()
    } else {
        user_home(user)
    };

    match home {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => PathBuf::from(path),
    }
}

/// Home directory for a named user, from the password database.
#[cfg(unix)]
fn user_home(user: &str) -> Option<PathBuf> {
    match nix::unistd::User::from_name(user) {
        Ok(Some(entry)) => Some(entry.dir),
        Ok(None) => None,
        Err(e) => {
            tracing::debug!(user = %user, error = %e, "User lookup failed");
            None
        }
    }
}

/// Home directory for a named user; only the current user is known here.
#[cfg(not(unix))]
fn user_home(user: &str) -> Option<PathBuf> {
    let current = std::env::var("USERNAME").ok()?;
    if current.eq_ignore_ascii_case(user) {
        dirs::home_dir()
    } else {
        None
    }
}

/// Resolve a path string to an absolute, normalized path.
///
/// Home shorthand is expanded first; a relative result is joined onto
/// `base`, or the working directory when no base is given.
pub fn resolve_path(path: &str, base: Option<&Path>) -> PathBuf {
    let expanded = expand_user(path);

    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        let base = base
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok());
        match base {
            Some(base) => base.join(&expanded),
            None => expanded,
        }
    };

    let resolved = normalize_path(&absolute);
    tracing::trace!(input = %path, resolved = %resolved.display(), "Resolved path");
    resolved
}

/// Fold `.` and `..` components without consulting the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `..` above the root stays at the root
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(component.as_os_str()),
            },
            _ => normalized.push(component.as_os_str()),
        }
    }
    normalized
}
