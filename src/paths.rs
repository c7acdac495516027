//! Repository-root and Generator binary resolution.
//!
//! Nothing in the harness hard-codes an absolute path: the repo root comes
//! from `GQLGEN_BENCH_ROOT` when set, otherwise from walking up from the
//! current directory until the schema fixture is found.

use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the repository root.
pub const REPO_ROOT_ENV: &str = "GQLGEN_BENCH_ROOT";

/// Environment variable overriding the Generator binary path.
pub const GENERATOR_ENV: &str = "GQLGEN_BENCH_GENERATOR";

/// Environment variable overriding the Generator source directory for builds.
pub const GENERATOR_SRC_ENV: &str = "GQLGEN_BENCH_GENERATOR_SRC";

/// File name of the Generator binary.
#[cfg(not(windows))]
pub const GENERATOR_BINARY: &str = "graphql-go-gen";
#[cfg(windows)]
pub const GENERATOR_BINARY: &str = "graphql-go-gen.exe";

/// Repo-relative location of the fixed workload schema.
const SCHEMA_REL_PATH: &str = "testdata/schema.graphql";

/// Resolve the repository root.
///
/// Order: `GQLGEN_BENCH_ROOT`, then the nearest ancestor of the current
/// directory containing `testdata/schema.graphql`, then the current
/// directory itself.
pub fn repo_root() -> Result<PathBuf> {
    if let Some(root) = env::var_os(REPO_ROOT_ENV) {
        let root = PathBuf::from(root);
        if !root.is_dir() {
            return Err(Error::setup(format!(
                "{REPO_ROOT_ENV} points at a non-directory: {}",
                root.display()
            )));
        }
        return Ok(root);
    }

    let cwd = env::current_dir()?;
    let mut probe = cwd.as_path();
    loop {
        if probe.join(SCHEMA_REL_PATH).is_file() {
            return Ok(probe.to_path_buf());
        }
        match probe.parent() {
            Some(parent) => probe = parent,
            None => return Ok(cwd),
        }
    }
}

/// Path of the schema fixture copied into every workload.
pub fn schema_path() -> Result<PathBuf> {
    let path = repo_root()?.join(SCHEMA_REL_PATH);
    if !path.is_file() {
        return Err(Error::setup(format!(
            "schema fixture not found: {}",
            path.display()
        )));
    }
    Ok(path)
}

/// Locate the Generator binary without building it.
///
/// Order: `GQLGEN_BENCH_GENERATOR`, the current directory, then `$PATH`.
#[must_use]
pub fn find_generator() -> Option<PathBuf> {
    if let Some(path) = env::var_os(GENERATOR_ENV) {
        let path = PathBuf::from(path);
        if path.is_file() {
            return Some(path);
        }
    }

    if let Ok(cwd) = env::current_dir() {
        let local = cwd.join(GENERATOR_BINARY);
        if local.is_file() {
            return Some(local);
        }
    }

    let path_var = env::var_os("PATH")?;
    env::split_paths(&path_var)
        .map(|dir| dir.join(GENERATOR_BINARY))
        .find(|candidate| candidate.is_file())
}

/// Directory holding the Generator's Go sources for `build_generator`.
pub fn generator_source_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(GENERATOR_SRC_ENV) {
        return Ok(PathBuf::from(dir));
    }
    repo_root()
}

/// Join a relative path onto a base, passing absolute paths through.
#[must_use]
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_against_keeps_absolute_paths() {
        let base = Path::new("/base");
        let abs = if cfg!(windows) {
            Path::new("C:\\x\\y")
        } else {
            Path::new("/x/y")
        };
        assert_eq!(resolve_against(base, abs), abs.to_path_buf());
        assert_eq!(
            resolve_against(base, Path::new("sub/file")),
            Path::new("/base/sub/file")
        );
    }

    #[test]
    fn schema_fixture_exists_in_repo() {
        // The fixture ships with the repo; resolve from the manifest dir to
        // stay independent of the test runner's working directory.
        let manifest = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        assert!(manifest.join(SCHEMA_REL_PATH).is_file());
    }
}
