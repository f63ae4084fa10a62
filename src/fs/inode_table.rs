use serde::{Deserialize, Serialize};

use crate::disk::DiskImage;
use crate::fs::config::{INODE_SLOT_SIZE, MAX_FILENAME_LEN};
use crate::fs::error::{FsError, Result};
use crate::fs::super_block::SuperBlock;

/// Encoded size of the record inside a slot: 32-byte name + size + start.
pub const INODE_RECORD_SIZE: usize = 48;

/// Directory record mapping a filename to its payload.
///
/// `size` counts 4-byte integer elements, not bytes. `start_block` is an
/// absolute byte offset into the data region, always block-aligned.
/// A size of zero marks the slot free; there is no separate in-use flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inode {
    pub filename: [u8; MAX_FILENAME_LEN],
    pub size: u64,
    pub start_block: u64,
}

/// A usable name fits the field with at least one trailing NUL and does
/// not contain NUL itself.
pub fn validate_name(name: &str) -> Result<()> {
    let bytes = name.as_bytes();
    if bytes.is_empty() || bytes.len() >= MAX_FILENAME_LEN || bytes.contains(&0) {
        return Err(FsError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl Inode {
    /// Builds a live record from a validated name.
    pub fn new(name: &str, size: u64, start_block: u64) -> Result<Self> {
        validate_name(name)?;
        let bytes = name.as_bytes();

        let mut filename = [0u8; MAX_FILENAME_LEN];
        filename[..bytes.len()].copy_from_slice(bytes);

        Ok(Self {
            filename,
            size,
            start_block,
        })
    }

    pub fn is_free(&self) -> bool {
        self.size == 0
    }

    /// Null-trimmed filename.
    pub fn name(&self) -> String {
        let end = self
            .filename
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(MAX_FILENAME_LEN);
        String::from_utf8_lossy(&self.filename[..end]).into_owned()
    }

    pub fn byte_len(&self) -> u64 {
        self.size * 4
    }

    pub fn encode(&self) -> Result<[u8; INODE_SLOT_SIZE as usize]> {
        let bytes = bincode::serialize(self)
            .map_err(|e| FsError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        let mut slot = [0u8; INODE_SLOT_SIZE as usize];
        slot[..bytes.len()].copy_from_slice(&bytes);
        Ok(slot)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| FsError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }
}

/// Fixed-capacity array of inode slots right after the bitmap.
///
/// All lookups are linear scans in slot order; freed slots are reused in
/// place, never compacted.
#[derive(Debug, Clone)]
pub struct InodeTable {
    start: u64,
    max_inodes: u64,
}

impl InodeTable {
    pub fn new(sb: &SuperBlock) -> Self {
        Self {
            start: sb.inode_table_start,
            max_inodes: sb.max_inodes,
        }
    }

    pub fn slot_offset(&self, index: u64) -> u64 {
        self.start + index * INODE_SLOT_SIZE
    }

    /// Zeroes every slot. Format-time only.
    pub fn initialize<D: DiskImage>(&self, disk: &D) -> Result<()> {
        let zeros = vec![0u8; (self.max_inodes * INODE_SLOT_SIZE) as usize];
        disk.write_at(self.start, &zeros)?;
        Ok(())
    }

    /// Offset of the first slot whose size field is zero.
    pub fn find_free_slot<D: DiskImage>(&self, disk: &D) -> Result<u64> {
        let mut slot = [0u8; INODE_SLOT_SIZE as usize];
        for index in 0..self.max_inodes {
            let offset = self.slot_offset(index);
            disk.read_at(offset, &mut slot)?;
            if Inode::decode(&slot)?.is_free() {
                return Ok(offset);
            }
        }
        Err(FsError::TableFull)
    }

    /// Every live inode plus the cumulative element total. A read failure
    /// mid-scan stops the scan and returns what was found so far, so a
    /// partially initialized table still lists.
    pub fn list<D: DiskImage>(&self, disk: &D) -> Result<(Vec<Inode>, u64)> {
        let mut inodes = Vec::new();
        let mut total = 0u64;

        let mut slot = [0u8; INODE_SLOT_SIZE as usize];
        for index in 0..self.max_inodes {
            if disk.read_at(self.slot_offset(index), &mut slot).is_err() {
                break;
            }
            let inode = Inode::decode(&slot)?;
            if !inode.is_free() {
                total += inode.size;
                inodes.push(inode);
            }
        }

        Ok((inodes, total))
    }

    /// Locates the live inode with the given null-trimmed name.
    pub fn find_by_name<D: DiskImage>(&self, disk: &D, name: &str) -> Result<(u64, Inode)> {
        let mut slot = [0u8; INODE_SLOT_SIZE as usize];
        for index in 0..self.max_inodes {
            let offset = self.slot_offset(index);
            if disk.read_at(offset, &mut slot).is_err() {
                break;
            }
            let inode = Inode::decode(&slot)?;
            if !inode.is_free() && inode.name() == name {
                return Ok((offset, inode));
            }
        }
        Err(FsError::NotFound(name.to_string()))
    }

    pub fn write_slot<D: DiskImage>(&self, disk: &D, offset: u64, inode: &Inode) -> Result<()> {
        disk.write_at(offset, &inode.encode()?)?;
        Ok(())
    }

    /// Clearing a slot means writing the all-zero record back in place.
    pub fn clear_slot<D: DiskImage>(&self, disk: &D, offset: u64) -> Result<()> {
        disk.write_at(offset, &[0u8; INODE_SLOT_SIZE as usize])?;
        Ok(())
    }

    /// Occupied slots with their indices, for the diagnostic printer.
    pub fn live_slots<D: DiskImage>(&self, disk: &D) -> Result<Vec<(u64, Inode)>> {
        let mut slots = Vec::new();
        let mut slot = [0u8; INODE_SLOT_SIZE as usize];
        for index in 0..self.max_inodes {
            disk.read_at(self.slot_offset(index), &mut slot)?;
            let inode = Inode::decode(&slot)?;
            if !inode.is_free() {
                slots.push((index, inode));
            }
        }
        Ok(slots)
    }

    pub fn max_inodes(&self) -> u64 {
        self.max_inodes
    }
}
