// error.rs
//
// Copyright (c) 2026  gifprobe developers
//
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors encountered while decoding GIF metadata
#[derive(Debug)]
pub enum Error {
    /// A wrapped I/O error.
    Io(io::Error),
    /// Input path does not exist.
    FileNotFound(PathBuf),
    /// A fixed-size read or skip ran past the end of the stream.
    TruncatedStream,
    /// Non-ASCII bytes in the header signature / version.
    InvalidEncoding,
}

/// Gifprobe result type
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Io(err) => err.fmt(fmt),
            Error::FileNotFound(p) => {
                write!(fmt, "file not found: {}", p.display())
            }
            _ => fmt::Debug::fmt(self, fmt),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
