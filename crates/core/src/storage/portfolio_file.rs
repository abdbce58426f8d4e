use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::errors::CoreError;

/// The portfolio store: a UTF-8 text file holding one uppercase ticker
/// symbol per line, newline-terminated, in insertion order.
///
/// The file is the sole source of truth — every operation reloads it
/// and mutations write straight back, so there is no in-memory state
/// to drift. A writer mutex serializes the read-modify-write sequence
/// within this process; cross-process writers are assumed not to exist.
///
/// A missing or unreadable file is `StoreUnavailable` on every
/// operation: it is an infrastructure fault, distinct from the
/// `DuplicateSymbol`/`SymbolNotFound` business outcomes.
pub struct PortfolioFile {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl PortfolioFile {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty store file if none exists yet. Intended for
    /// first-run setup; regular operations never create the file.
    pub fn ensure_exists(&self) -> Result<(), CoreError> {
        if !self.path.exists() {
            fs::write(&self.path, b"")?;
        }
        Ok(())
    }

    /// True iff an exact (case-normalized) match is present.
    pub fn contains(&self, symbol: &str) -> Result<bool, CoreError> {
        let wanted = symbol.trim().to_uppercase();
        Ok(self.load()?.iter().any(|line| *line == wanted))
    }

    /// Append a symbol, normalized to uppercase.
    /// Fails with `DuplicateSymbol` without touching the file if it is
    /// already present.
    pub fn add(&self, symbol: &str) -> Result<(), CoreError> {
        let _guard = self.guard();
        let normalized = symbol.trim().to_uppercase();

        let contents = fs::read_to_string(&self.path)?;
        if Self::parse(&contents).iter().any(|line| *line == normalized) {
            return Err(CoreError::DuplicateSymbol(normalized));
        }

        let mut file = fs::OpenOptions::new().append(true).open(&self.path)?;
        // An externally edited file may lack its final newline; repair
        // it so the appended symbol cannot fuse with the last line.
        if !contents.is_empty() && !contents.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        file.write_all(format!("{normalized}\n").as_bytes())?;
        Ok(())
    }

    /// Rewrite the store omitting the first exact match of `symbol`.
    /// Fails with `SymbolNotFound` (file untouched) when no match exists.
    pub fn remove(&self, symbol: &str) -> Result<(), CoreError> {
        let _guard = self.guard();
        let normalized = symbol.trim().to_uppercase();

        let mut lines = self.load()?;
        let idx = lines
            .iter()
            .position(|line| *line == normalized)
            .ok_or(CoreError::SymbolNotFound(normalized))?;
        lines.remove(idx);

        self.save(&lines)
    }

    /// Full current contents in storage order.
    pub fn list(&self) -> Result<Vec<String>, CoreError> {
        self.load()
    }

    fn load(&self) -> Result<Vec<String>, CoreError> {
        Ok(Self::parse(&fs::read_to_string(&self.path)?))
    }

    fn parse(contents: &str) -> Vec<String> {
        contents
            .lines()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect()
    }

    fn save(&self, lines: &[String]) -> Result<(), CoreError> {
        let mut body = String::with_capacity(lines.len() * 6);
        for line in lines {
            body.push_str(line);
            body.push('\n');
        }
        fs::write(&self.path, body)?;
        Ok(())
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned lock only means another writer panicked; the file
        // itself is still the source of truth.
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}
