use anyhow::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Fichier de sortie écrit de manière atomique (fichier temporaire + rename).
pub struct OutputFile {
    path: PathBuf,
}

impl OutputFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remplace le contenu du fichier ; un lecteur concurrent voit l'ancien
    /// ou le nouveau contenu, jamais un mélange.
    pub fn write(&self, contents: &[u8]) -> anyhow::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(contents)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)
            .with_context(|| format!("atomic rename to {}", self.path.display()))?;
        Ok(())
    }
}
