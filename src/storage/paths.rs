use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{BankError, BankResult};

/// Manages filesystem paths used for persisted client state.
#[derive(Debug, Clone)]
pub struct ClientPaths {
    /// Root directory for all client data.
    root_dir: PathBuf,
    /// Directory holding the key/value store entries.
    store_dir: PathBuf,
}

impl ClientPaths {
    /// Directory name for the device key/value store.
    pub const STORE_DIR_NAME: &'static str = "store";

    /// Create a new path manager rooted at the provided directory.
    pub fn new(root: impl AsRef<Path>) -> BankResult<Self> {
        let root_dir = root.as_ref().to_path_buf();
        if root_dir.as_os_str().is_empty() {
            return Err(BankError::Storage(
                "Client root directory cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            store_dir: root_dir.join(Self::STORE_DIR_NAME),
            root_dir,
        })
    }

    /// Ensure the directory structure exists, creating missing folders.
    pub fn ensure_directories(&self) -> BankResult<()> {
        fs::create_dir_all(&self.root_dir)?;
        fs::create_dir_all(&self.store_dir)?;
        Ok(())
    }

    /// Directory that backs the key/value store.
    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Root directory for all client-managed data.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_derived_from_root() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ClientPaths::new(temp_dir.path()).unwrap();

        assert_eq!(paths.root_dir(), temp_dir.path());
        assert_eq!(
            paths.store_dir(),
            temp_dir.path().join(ClientPaths::STORE_DIR_NAME)
        );
    }

    #[test]
    fn empty_root_directory_rejected() {
        let result = ClientPaths::new("");
        assert!(matches!(result, Err(BankError::Storage(_))));
    }

    #[test]
    fn ensure_directories_creates_tree() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ClientPaths::new(temp_dir.path().join("nested")).unwrap();

        paths.ensure_directories().unwrap();

        assert!(paths.root_dir().exists());
        assert!(paths.store_dir().exists());
    }
}
