use std::io::Result;

/// Random-access byte-range view of a disk image.
///
/// Offsets are absolute positions inside the image. A short read or write
/// is an error; callers rely on whole ranges moving in one call.
pub trait DiskImage: Send + Sync {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()>;
    fn write_at(&self, offset: u64, buf: &[u8]) -> Result<()>;
}
