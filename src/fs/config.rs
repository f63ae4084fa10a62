/// Size of one logical block. The bitmap tracks occupancy at this
/// granularity and data allocations are block-aligned.
pub const BLOCK_SIZE: u64 = 4096;

/// Total size of the backing image created by the front end: 1 GiB.
pub const DISK_SIZE: u64 = 1024 * 1024 * 1024;

/// Capacity of the inode table on a freshly formatted disk.
pub const MAX_INODES: u64 = 1024;

/// On-disk size of one inode slot. The encoded record is 48 bytes
/// (32-byte name + size + start offset); the rest of the slot is zero.
pub const INODE_SLOT_SIZE: u64 = 64;

/// Width of the null-padded filename field. Names keep at least one
/// trailing NUL, so the longest usable name is one byte shorter.
pub const MAX_FILENAME_LEN: usize = 32;

/// Capacity of the staging buffer used by the order operation: 2 MiB.
/// The scratch paging file is truncated to the same length.
pub const STAGING_BUFFER_SIZE: u64 = 2 * 1024 * 1024;

pub const DEFAULT_DISK_PATH: &str = "virtual_disk.img";
pub const DEFAULT_SCRATCH_PATH: &str = "paging_file.bin";
