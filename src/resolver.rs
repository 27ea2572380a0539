use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use nix::unistd::{access, AccessFlags};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Command not found: {0}")]
    NotFound(String),
    #[error("Empty command")]
    EmptyProgram,
}

/// Looks programs up on a search path, the way `execvp` would.
pub struct PathResolver {
    search_path: OsString,
}

impl PathResolver {
    pub fn new(search_path: impl Into<OsString>) -> Self {
        PathResolver {
            search_path: search_path.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(env::var_os("PATH").unwrap_or_default())
    }

    pub fn resolve(&self, program: &str) -> Result<PathBuf, ResolveError> {
        if program.is_empty() {
            return Err(ResolveError::EmptyProgram);
        }

        // Names with a slash are never searched for.
        if program.contains('/') {
            let path = Path::new(program);
            return if is_executable(path) {
                Ok(path.to_path_buf())
            } else {
                Err(ResolveError::NotFound(program.to_string()))
            };
        }

        env::split_paths(&self.search_path)
            .map(|dir| dir.join(program))
            .find(|candidate| is_executable(candidate))
            .ok_or_else(|| ResolveError::NotFound(program.to_string()))
    }
}

fn is_executable(path: &Path) -> bool {
    path.is_file() && access(path, AccessFlags::X_OK).is_ok()
}
