use serde::{Deserialize, Serialize};

use crate::disk::DiskImage;
use crate::fs::config::{BLOCK_SIZE, INODE_SLOT_SIZE};
use crate::fs::error::{FsError, Result};

/// Byte offset of the superblock record.
pub const SUPER_BLOCK_START: u64 = 0;

/// Encoded size of the record: five little-endian u64 fields.
pub const SUPER_BLOCK_SIZE: usize = 40;

/// Fixed geometry record at the head of the disk image.
///
/// Written once when the image is formatted and read back on every mount.
/// bincode's fixed-width little-endian integer encoding lays the five
/// fields out back to back, which is exactly the on-disk format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperBlock {
    pub disk_size: u64,
    pub max_inodes: u64,
    pub total_blocks: u64,
    pub inode_table_start: u64,
    pub data_start: u64,
}

impl SuperBlock {
    /// Computes the layout for a disk of `disk_size` bytes: the bitmap sits
    /// at `BLOCK_SIZE`, the inode table right after it, the data region
    /// after the table.
    pub fn new(disk_size: u64, max_inodes: u64) -> Self {
        let total_blocks = disk_size / BLOCK_SIZE;
        let bitmap_size = total_blocks / 8;
        let inode_table_start = BLOCK_SIZE + bitmap_size;
        let data_start = inode_table_start + max_inodes * INODE_SLOT_SIZE;

        Self {
            disk_size,
            max_inodes,
            total_blocks,
            inode_table_start,
            data_start,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| FsError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| FsError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }

    pub fn write<D: DiskImage>(&self, disk: &D) -> Result<()> {
        disk.write_at(SUPER_BLOCK_START, &self.encode()?)?;
        Ok(())
    }

    pub fn read<D: DiskImage>(disk: &D) -> Result<Self> {
        let mut data = [0u8; SUPER_BLOCK_SIZE];
        disk.read_at(SUPER_BLOCK_START, &mut data)?;
        Self::decode(&data)
    }

    /// Cheap structural check applied at mount. The record carries no magic
    /// or checksum, so this only rejects geometry that cannot match the
    /// layout formula above.
    pub fn validate(&self) -> Result<()> {
        let expected = SuperBlock::new(self.disk_size, self.max_inodes);
        if self.max_inodes == 0 || self.data_start >= self.disk_size || *self != expected {
            return Err(FsError::Corrupted("superblock geometry mismatch".into()));
        }
        Ok(())
    }
}
