//! The passphrase file.
//!
//! The unlock passphrase is kept verbatim in a file under the data directory
//! so non-interactive callers (editor integrations, scripts) can open the
//! vault without prompting. Presence of the file is the "vault is configured"
//! signal. The file is written owner-only on Unix.

use std::fs;
use std::path::{Path, PathBuf};

use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::Zeroizing;

use crate::config::Config;
use crate::error::{Result, VaultError};

const PASSPHRASE_FILE: &str = "passphrase";

/// Handle to the on-disk passphrase.
pub struct PassphraseFile {
    path: PathBuf,
}

impl PassphraseFile {
    /// Passphrase file at the default location (`<data_dir>/passphrase`).
    pub fn new() -> Self {
        Self {
            path: Config::dir().join(PASSPHRASE_FILE),
        }
    }

    /// Passphrase file at an explicit path (used by tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a passphrase has been configured.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write the passphrase exactly as given. No trailing newline is added
    /// and none is stripped on read; the stored bytes are the passphrase.
    pub fn store(&self, passphrase: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                VaultError::Storage(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }
        fs::write(&self.path, passphrase.as_bytes())
            .map_err(|e| VaultError::Storage(format!("cannot write passphrase file: {}", e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                VaultError::Storage(format!("cannot restrict passphrase file permissions: {}", e))
            })?;
        }

        debug!(path = %self.path.display(), "passphrase stored");
        Ok(())
    }

    /// Read the stored passphrase verbatim. `None` when not configured.
    pub fn load(&self) -> Result<Option<Zeroizing<String>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path)
            .map_err(|e| VaultError::Storage(format!("cannot read passphrase file: {}", e)))?;
        Ok(Some(Zeroizing::new(contents)))
    }

    /// Constant-time comparison of `candidate` against the stored passphrase.
    /// `false` when no passphrase is configured.
    pub fn verify(&self, candidate: &str) -> Result<bool> {
        match self.load()? {
            Some(stored) => Ok(stored.as_bytes().ct_eq(candidate.as_bytes()).into()),
            None => Ok(false),
        }
    }

    /// Delete the passphrase file. Succeeds when it does not exist.
    pub fn remove(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| VaultError::Storage(format!("cannot remove passphrase file: {}", e)))?;
            debug!(path = %self.path.display(), "passphrase removed");
        }
        Ok(())
    }
}

impl Default for PassphraseFile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn in_temp_dir() -> (TempDir, PassphraseFile) {
        let dir = TempDir::new().unwrap();
        let file = PassphraseFile::with_path(dir.path().join("passphrase"));
        (dir, file)
    }

    #[test]
    fn test_load_without_store_is_none() {
        let (_dir, file) = in_temp_dir();
        assert!(!file.exists());
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_stores_and_loads_verbatim() {
        let (_dir, file) = in_temp_dir();
        // Trailing whitespace is part of the passphrase, not noise.
        file.store("hunter2\n").unwrap();
        assert!(file.exists());
        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded.as_str(), "hunter2\n");
    }

    #[test]
    fn test_verify_checks_the_stored_value() {
        let (_dir, file) = in_temp_dir();
        assert!(!file.verify("anything").unwrap());
        file.store("hunter2").unwrap();
        assert!(file.verify("hunter2").unwrap());
        assert!(!file.verify("hunter3").unwrap());
        assert!(!file.verify("hunter2\n").unwrap());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (_dir, file) = in_temp_dir();
        file.remove().unwrap();
        file.store("secret").unwrap();
        file.remove().unwrap();
        assert!(!file.exists());
        file.remove().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_written_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, file) = in_temp_dir();
        file.store("secret").unwrap();
        let mode = std::fs::metadata(file.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
