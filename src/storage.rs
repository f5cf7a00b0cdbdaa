use crate::error::{Error, Result};
use crate::models::ContactRecord;
use directories::ProjectDirs;
use std::cell::{Cell, RefCell};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Header row written at the top of every directory file.
pub const DIRECTORY_HEADER: [&str; 3] = ["Supplier Name", "Contact Name", "Email"];

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "example", "SteelEnquiry")
}

pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|proj| proj.data_dir().to_path_buf())
}

pub(crate) fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Replaces `path` with `bytes` in one step.
///
/// The content goes to a temporary file in the same directory which is
/// synced and then renamed over the target, so readers see either the old
/// file or the new one. An existing file's permissions carry over to the
/// replacement. The temporary file is removed on every error path.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_err = |e: std::io::Error| Error::StorageWrite(format!("{}: {}", path.display(), e));

    ensure_dir(path).map_err(write_err)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    // keep the permissions the user gave the existing file
    if let Ok(meta) = fs::metadata(path) {
        if meta.is_file() {
            tmp.as_file()
                .set_permissions(meta.permissions())
                .map_err(write_err)?;
        }
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    log::debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

/// Durable home of the contact directory.
///
/// Implementations read and write the whole record list at once; the
/// directory store never patches individual rows in place.
pub trait DirectoryBackend {
    fn exists(&self) -> bool;

    /// Creates an empty store holding only the header.
    fn initialize(&self) -> Result<()>;

    fn read_records(&self) -> Result<Vec<ContactRecord>>;

    /// Replaces the whole store with `records`.
    fn write_records(&self, records: &[ContactRecord]) -> Result<()>;
}

/// Comma-separated directory file with a header row.
#[derive(Debug, Clone)]
pub struct CsvFileBackend {
    path: PathBuf,
}

impl CsvFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn encode(records: &[ContactRecord]) -> Result<Vec<u8>> {
        let encode_err = |e: csv::Error| Error::StorageWrite(e.to_string());
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(DIRECTORY_HEADER).map_err(encode_err)?;
        for record in records {
            writer
                .write_record([&record.supplier, &record.contact_name, &record.email])
                .map_err(encode_err)?;
        }
        writer
            .into_inner()
            .map_err(|e| Error::StorageWrite(e.to_string()))
    }
}

impl DirectoryBackend for CsvFileBackend {
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn initialize(&self) -> Result<()> {
        write_atomic(&self.path, &Self::encode(&[])?)
    }

    fn read_records(&self) -> Result<Vec<ContactRecord>> {
        let read_err = |e: csv::Error| Error::StorageRead(format!("{}: {}", self.path.display(), e));
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)
            .map_err(read_err)?;

        let mut out = Vec::new();
        for row in reader.records() {
            let row = row.map_err(read_err)?;
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            match (row.get(0), row.get(1), row.get(2)) {
                (Some(supplier), Some(contact_name), Some(email)) => {
                    if row.len() > 3 {
                        log::warn!(
                            "{} line {}: ignoring {} extra field(s)",
                            self.path.display(),
                            line,
                            row.len() - 3
                        );
                    }
                    out.push(ContactRecord::new(supplier, contact_name, email));
                }
                _ => {
                    return Err(Error::StorageRead(format!(
                        "{} line {}: expected 3 fields, found {}",
                        self.path.display(),
                        line,
                        row.len()
                    )));
                }
            }
        }
        log::debug!("read {} contact(s) from {}", out.len(), self.path.display());
        Ok(out)
    }

    fn write_records(&self, records: &[ContactRecord]) -> Result<()> {
        write_atomic(&self.path, &Self::encode(records)?)
    }
}

/// Directory kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: RefCell<Option<Vec<ContactRecord>>>,
    fail_writes: Cell<bool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that already holds `records`.
    pub fn with_records(records: Vec<ContactRecord>) -> Self {
        Self {
            records: RefCell::new(Some(records)),
            fail_writes: Cell::new(false),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.get() {
            return Err(Error::StorageWrite("memory backend is read-only".into()));
        }
        Ok(())
    }
}

impl DirectoryBackend for MemoryBackend {
    fn exists(&self) -> bool {
        self.records.borrow().is_some()
    }

    fn initialize(&self) -> Result<()> {
        self.check_writable()?;
        *self.records.borrow_mut() = Some(Vec::new());
        Ok(())
    }

    fn read_records(&self) -> Result<Vec<ContactRecord>> {
        self.records
            .borrow()
            .clone()
            .ok_or_else(|| Error::StorageRead("directory has not been initialized".into()))
    }

    fn write_records(&self, records: &[ContactRecord]) -> Result<()> {
        self.check_writable()?;
        *self.records.borrow_mut() = Some(records.to_vec());
        Ok(())
    }
}
