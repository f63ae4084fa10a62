use std::fmt;

/// Storage engine error type.
#[derive(Debug)]
pub enum FsError {
    Io(std::io::Error),    // underlying read/write/create failure
    NotFound(String),      // no live inode with that name
    AlreadyExists(String), // create with a name already in use
    OutOfSpace,            // no free block, or projected size exceeds remaining space
    TableFull,             // no free inode slot
    InvalidRange(String),  // bad read indices or element count
    OutOfRange(u64),       // block index beyond the bitmap
    InvalidName(String),   // empty, too long, or contains NUL
    Corrupted(String),     // superblock fails the mount sanity check
}

impl From<std::io::Error> for FsError {
    fn from(e: std::io::Error) -> Self {
        FsError::Io(e)
    }
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "disk I/O error: {}", e),
            Self::NotFound(name) => write!(f, "file not found: {}", name),
            Self::AlreadyExists(name) => write!(f, "file already exists: {}", name),
            Self::OutOfSpace => write!(f, "insufficient space on disk"),
            Self::TableFull => write!(f, "no free inode slot"),
            Self::InvalidRange(msg) => write!(f, "invalid range: {}", msg),
            Self::OutOfRange(index) => write!(f, "block index out of range: {}", index),
            Self::InvalidName(name) => write!(f, "invalid file name: {:?}", name),
            Self::Corrupted(msg) => write!(f, "file system corrupted: {}", msg),
        }
    }
}

impl std::error::Error for FsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Unified result type of the storage engine.
pub type Result<T> = std::result::Result<T, FsError>;
