use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

/// Log file target that is only created when the first line is written
///
/// Clones share one file handle. A file deleted while logging is recreated on the
/// next write.
#[derive(Debug, Clone)]
pub struct LazyFileWriter {
    path: PathBuf,
    file: Arc<Mutex<Option<File>>>,
}

impl LazyFileWriter {
    /// Writer for `path`; nothing touches the filesystem yet
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: Arc::new(Mutex::new(None)),
        }
    }

    /// Target path of the log file
    #[must_use]
    pub fn path(&self) -> &Path { &self.path }
}

/// Handle given to the formatter for each event
#[derive(Debug)]
pub struct LazyWriter {
    path: PathBuf,
    file: Arc<Mutex<Option<File>>>,
}

impl LazyWriter {
    fn open(&self) -> io::Result<File> { OpenOptions::new().create(true).append(true).open(&self.path) }
}

impl Write for LazyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file mutex poisoned"))?;

        if guard.is_none() || !self.path.exists() {
            *guard = Some(self.open()?);
        }
        if let Some(Ok(written)) = guard.as_mut().map(|file| file.write(buf)) {
            return Ok(written);
        }

        let mut file = self.open()?;
        let written = file.write(buf)?;
        *guard = Some(file);
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file mutex poisoned"))?;
        match guard.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for LazyFileWriter {
    type Writer = LazyWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LazyWriter {
            path: self.path.clone(),
            file: Arc::clone(&self.file),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;

    #[test]
    fn test_file_is_created_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LazyFileWriter::new(dir.path().join("lazy.log"));
        let mut handle = writer.make_writer();
        assert!(!writer.path().exists());

        handle.write_all(b"first\n").unwrap();
        assert!(writer.path().exists());

        writer.clone().make_writer().write_all(b"second\n").unwrap();
        assert_eq!(std::fs::read_to_string(writer.path()).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_deleted_file_is_recreated() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LazyFileWriter::new(dir.path().join("lazy.log"));
        writer.make_writer().write_all(b"before\n").unwrap();
        std::fs::remove_file(writer.path()).unwrap();

        writer.make_writer().write_all(b"after\n").unwrap();
        assert_eq!(std::fs::read_to_string(writer.path()).unwrap(), "after\n");
    }
}
