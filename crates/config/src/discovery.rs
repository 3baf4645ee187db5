//! Default configuration file discovery

use layerconf_types::{LoadError, Result};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Return the first existing `directory/file_name` combination.
///
/// Directories are searched in order and, within a directory, file names are
/// tried in order, so the first directory wins over any later one. A leading
/// `~` in a directory is expanded to the home directory; directories that
/// cannot be expanded are skipped. Finding nothing is `Ok(None)`.
pub fn find_default_path<D, F>(directories: &[D], file_names: &[F]) -> Result<Option<PathBuf>>
where
    D: AsRef<Path>,
    F: AsRef<Path>,
{
    for directory in directories {
        let directory = directory.as_ref();
        let Some(expanded) = expand_home(directory) else {
            debug!(
                directory = %directory.display(),
                "Skipping config directory, home expansion failed"
            );
            continue;
        };

        for file_name in file_names {
            let candidate = expanded.join(file_name);
            trace!(candidate = %candidate.display(), "Probing config candidate");
            if file_exists(&candidate)? {
                return Ok(Some(candidate));
            }
        }
    }

    Ok(None)
}

/// Expand a leading `~` to the current user's home directory.
///
/// Paths without the shorthand are returned unchanged. Returns `None` when the
/// home directory is unknown or the path uses the `~user` form.
pub fn expand_home(path: &Path) -> Option<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir()?;
            if rest.as_os_str().is_empty() {
                Some(home)
            } else {
                Some(home.join(rest))
            }
        }
        // "~user" is a single component that doesn't strip
        Err(_) if path.as_os_str().to_string_lossy().starts_with('~') => None,
        Err(_) => Some(path.to_path_buf()),
    }
}

/// Check whether a regular file can be opened at `path`.
///
/// A missing path is `Ok(false)`, as is anything that opens but is not a
/// regular file. Every other I/O failure is reported, so an unreadable
/// config is never mistaken for an absent one.
pub fn file_exists(path: &Path) -> Result<bool> {
    let probe_error = |source: io::Error| LoadError::DiscoveryIo {
        path: path.to_path_buf(),
        source,
    };

    match File::open(path) {
        Ok(file) => Ok(file.metadata().map_err(probe_error)?.is_file()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(probe_error(err)),
    }
}

/// Directory containing the running executable.
///
/// Useful as a candidate directory for processes started without a meaningful
/// working directory or home (launchd, systemd units).
pub fn executable_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|source| LoadError::DiscoveryIo {
        path: PathBuf::new(),
        source,
    })?;

    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| LoadError::DiscoveryIo {
            path: exe.clone(),
            source: io::Error::new(io::ErrorKind::NotFound, "executable has no parent directory"),
        })
}
