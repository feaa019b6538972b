use crate::model::Dataset;
use anyhow::Context;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Support de persistance du jeu de données (employés, shifts, absences,
/// affectations).
pub trait Storage {
    fn load(&self) -> anyhow::Result<Dataset>;
    /// Sauvegarde de manière atomique.
    fn save(&self, dataset: &Dataset) -> anyhow::Result<()>;

    /// Charge, applique `f`, puis sauvegarde si `f` réussit.
    fn update<R, F>(&self, f: F) -> anyhow::Result<R>
    where
        Self: Sized,
        F: FnOnce(&mut Dataset) -> anyhow::Result<R>,
    {
        let mut dataset = self.load()?;
        let out = f(&mut dataset)?;
        self.save(&dataset)?;
        Ok(out)
    }
}

/// Fichier JSON unique ; un fichier absent vaut un jeu vide.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if path.is_dir() {
            anyhow::bail!("{} is a directory", path.display());
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        }
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Dataset> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no dataset yet, starting empty");
            return Ok(Dataset::default());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        serde_json::from_slice(&data)
            .with_context(|| format!("parsing dataset {}", self.path.display()))
    }

    fn save(&self, dataset: &Dataset) -> anyhow::Result<()> {
        let dir = self.dir();
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;

        let mut writer = BufWriter::new(tmp);
        serde_json::to_writer_pretty(&mut writer, dataset)?;
        writer.flush()?;
        let tmp = writer.into_inner().map_err(|err| err.into_error())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;

        debug!(
            path = %self.path.display(),
            employees = dataset.employees.len(),
            assignments = dataset.assignments.len(),
            "dataset saved"
        );
        Ok(())
    }
}
