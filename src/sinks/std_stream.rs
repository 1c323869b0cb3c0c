use std::io::{Error as IoError, Stderr, StderrLock, Stdout, StdoutLock, Write};

// Abstraction over stdout and stderr
pub(crate) enum StdStream {
    Out(Stdout),
    Err(Stderr),
}
impl StdStream {
    pub(crate) fn lock(&self) -> StdStreamLock<'_> {
        match self {
            StdStream::Out(s) => StdStreamLock::Out(s.lock()),
            StdStream::Err(s) => StdStreamLock::Err(s.lock()),
        }
    }
    pub(crate) fn name(&self) -> &'static str {
        match self {
            StdStream::Out(_) => "stdout",
            StdStream::Err(_) => "stderr",
        }
    }
}

pub(crate) enum StdStreamLock<'a> {
    Out(StdoutLock<'a>),
    Err(StderrLock<'a>),
}
impl Write for StdStreamLock<'_> {
    fn write(&mut self, buffer: &[u8]) -> std::result::Result<usize, IoError> {
        match self {
            StdStreamLock::Out(l) => l.write(buffer),
            StdStreamLock::Err(l) => l.write(buffer),
        }
    }
    fn flush(&mut self) -> std::result::Result<(), IoError> {
        match self {
            StdStreamLock::Out(l) => l.flush(),
            StdStreamLock::Err(l) => l.flush(),
        }
    }
}
