use crate::essentials::*;

use std::path::{Path, PathBuf};

/// Somewhere to keep uploaded files, handing back a URL for each
pub trait FileStorage {
    fn store(&self, folder: &str, filename: &str, bytes: &[u8]) -> Result<String>;
}

/// Files kept on the local disk, addressed with `file://` URLs
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_start_matches('.')
        .to_owned()
}

impl FileStorage for LocalStorage {
    fn store(&self, folder: &str, filename: &str, bytes: &[u8]) -> Result<String> {
        let base = Path::new(filename)
            .file_name()
            .map(|name| sanitize(&name.to_string_lossy()))
            .unwrap_or_default();
        if base.is_empty() {
            return Err(Error::Invalid(format!("Can't store a file named \"{filename}\"")));
        }

        let dir = self.root.join(sanitize(folder));
        std::fs::create_dir_all(&dir)?;

        // Never overwrite a previous upload
        let mut path = dir.join(&base);
        let mut counter = 1;
        while path.exists() {
            path = dir.join(format!("{counter}_{base}"));
            counter += 1;
        }
        std::fs::write(&path, bytes)?;
        log::debug!("Stored {} bytes in {}", bytes.len(), path.display());

        let path = std::fs::canonicalize(&path)?;
        Ok(format!("file://{}", path.display()))
    }
}
