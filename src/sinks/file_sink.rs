use super::{Sink, SinkState};
use crate::util::lock;
use crate::{Formatter, Level, LoggerError};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, LineWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Appends log lines to a file.
///
/// The file is created if it does not exist; missing parent directories are created as well.
/// After [`Sink::close`], the sink refuses to write.
pub struct FileSink {
    state: SinkState,
    path: PathBuf,
    file: Mutex<Option<LineWriter<File>>>,
}

impl FileSink {
    /// Opens the file for appending.
    ///
    /// # Errors
    ///
    /// [`LoggerError::Io`] if the file or its directory cannot be created or opened.
    pub fn try_new<P: AsRef<Path>>(path: P) -> Result<Self, LoggerError> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            state: SinkState::default(),
            path,
            file: Mutex::new(Some(LineWriter::new(file))),
        })
    }

    /// Builder-style setter for the threshold.
    #[must_use]
    pub fn with_level(self, level: Level) -> Self {
        self.state.set_level(level);
        self
    }

    /// Builder-style setter for the formatter.
    #[must_use]
    pub fn with_formatter(self, formatter: Formatter) -> Self {
        self.state.set_formatter(formatter);
        self
    }

    /// The path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `false` after the sink was closed.
    #[must_use]
    pub fn is_open(&self) -> bool {
        lock(&self.file).is_some()
    }
}

impl Sink for FileSink {
    fn level(&self) -> Level {
        self.state.level()
    }
    fn set_level(&self, level: Level) {
        self.state.set_level(level);
    }
    fn formatter(&self) -> Formatter {
        self.state.formatter()
    }
    fn set_formatter(&self, formatter: Formatter) {
        self.state.set_formatter(formatter);
    }

    fn write(&self, line: &str) -> io::Result<()> {
        match lock(&self.file).as_mut() {
            Some(file) => {
                let mut buffer = String::with_capacity(line.len() + 1);
                buffer.push_str(line);
                buffer.push('\n');
                file.write_all(buffer.as_bytes())
            }
            None => Err(io::Error::other(format!(
                "file sink for {} is closed",
                self.path.display()
            ))),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match lock(&self.file).as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    fn close(&self) {
        if let Some(mut file) = lock(&self.file).take() {
            file.flush().ok();
        }
    }

    fn validate_logs(&self, expected: &[(&'static str, &'static str, &'static str)]) {
        self.flush().ok();
        let f = File::open(&self.path).unwrap_or_else(|e| {
            panic!(
                "validate_logs: can't open file {} due to {e:?}",
                self.path.display()
            )
        });
        let lines: Vec<String> = BufReader::new(f)
            .lines()
            .map(|line| line.expect("validate_logs: can't read file"))
            .collect();
        super::memory_sink::validate_lines(&lines, expected, &self.path.display().to_string());
    }
}

impl std::fmt::Debug for FileSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSink")
            .field("path", &self.path)
            .field("level", &self.state.level())
            .field("open", &self.is_open())
            .finish()
    }
}
