use std::path::PathBuf;

use log::{debug, info};
use rand::Rng;

use crate::disk::DiskImage;
use crate::fs::bitmap::BlockBitmap;
use crate::fs::error::{FsError, Result};
use crate::fs::inode_table::{validate_name, Inode, InodeTable};
use crate::fs::super_block::SuperBlock;

pub mod bitmap;
pub mod config;
pub mod error;
pub mod inode_table;
pub mod order;
pub mod super_block;

/// The storage engine: one disk image plus the components that interpret
/// its layout. Constructed once by the front end and threaded through every
/// operation; the handle lives as long as the context.
#[derive(Debug)]
pub struct FileSystem<D: DiskImage> {
    disk: D,
    super_block: SuperBlock,
    bitmap: BlockBitmap,
    inode_table: InodeTable,
    scratch_path: PathBuf,
}

impl<D: DiskImage> FileSystem<D> {
    /// Formats a blank image: writes the superblock, pre-marks the metadata
    /// blocks in the bitmap and zeroes the inode table.
    pub fn format(disk: D, super_block: SuperBlock, scratch_path: PathBuf) -> Result<Self> {
        super_block.validate()?;
        super_block.write(&disk)?;

        let bitmap = BlockBitmap::new(&super_block);
        bitmap.initialize(&disk)?;

        let inode_table = InodeTable::new(&super_block);
        inode_table.initialize(&disk)?;

        info!(
            "formatted disk: {} bytes, {} blocks, {} inode slots",
            super_block.disk_size, super_block.total_blocks, super_block.max_inodes
        );

        Ok(Self {
            disk,
            super_block,
            bitmap,
            inode_table,
            scratch_path,
        })
    }

    /// Mounts an already formatted image by re-reading its superblock.
    pub fn mount(disk: D, scratch_path: PathBuf) -> Result<Self> {
        let super_block = SuperBlock::read(&disk)?;
        super_block.validate()?;

        let bitmap = BlockBitmap::new(&super_block);
        let inode_table = InodeTable::new(&super_block);

        info!("mounted disk: {} bytes", super_block.disk_size);

        Ok(Self {
            disk,
            super_block,
            bitmap,
            inode_table,
            scratch_path,
        })
    }

    pub fn super_block(&self) -> &SuperBlock {
        &self.super_block
    }

    /// Allocates one block and a directory slot for `name`, then fills the
    /// data range with `size` pseudo-random integers. The engine does not
    /// accept caller-supplied content.
    pub fn create_file(&self, name: &str, size: u64) -> Result<()> {
        validate_name(name)?;
        if size == 0 {
            return Err(FsError::InvalidRange("element count must be positive".into()));
        }
        let bytes = size.checked_mul(4).ok_or(FsError::OutOfSpace)?;

        if self.inode_table.find_by_name(&self.disk, name).is_ok() {
            return Err(FsError::AlreadyExists(name.to_string()));
        }

        let slot = self.inode_table.find_free_slot(&self.disk)?;
        let start = self.bitmap.find_free(&self.disk)?;

        // Remaining space is estimated from the candidate start offset, not
        // the actual free-block count; fragmentation skews the estimate.
        if bytes > self.super_block.disk_size - (start - self.super_block.data_start) {
            return Err(FsError::OutOfSpace);
        }

        let inode = Inode::new(name, size, start)?;
        self.bitmap
            .set(&self.disk, self.bitmap.block_index_of(start), true)?;
        self.inode_table.write_slot(&self.disk, slot, &inode)?;

        let mut data = vec![0u8; bytes as usize];
        let mut rng = rand::thread_rng();
        for chunk in data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rng.gen_range(0..100_000u32).to_le_bytes());
        }
        self.disk.write_at(start, &data)?;

        debug!("created {} with {} elements at offset {}", name, size, start);
        Ok(())
    }

    /// Reclaims the metadata of `name`: clears its bitmap bit and zeroes
    /// its slot. The data bytes stay in place until overwritten.
    pub fn remove_file(&self, name: &str) -> Result<()> {
        let (offset, inode) = self.inode_table.find_by_name(&self.disk, name)?;

        self.bitmap.set(
            &self.disk,
            self.bitmap.block_index_of(inode.start_block),
            false,
        )?;
        self.inode_table.clear_slot(&self.disk, offset)?;

        debug!("removed {}", name);
        Ok(())
    }

    /// Every live inode plus the sum of their element counts. An empty
    /// table is a valid result with zero entries.
    pub fn list_files(&self) -> Result<(Vec<Inode>, u64)> {
        self.inode_table.list(&self.disk)
    }

    /// Elements `start..end` of `name` as signed integers. `start == end`
    /// yields an empty sequence.
    pub fn read_file(&self, name: &str, start: i64, end: i64) -> Result<Vec<i32>> {
        if start < 0 || end < 0 || start > end {
            return Err(FsError::InvalidRange(format!(
                "bad element indices {}..{}",
                start, end
            )));
        }

        let (_, inode) = self.inode_table.find_by_name(&self.disk, name)?;
        if end as u64 > inode.size {
            return Err(FsError::InvalidRange(format!(
                "end index {} beyond file size {}",
                end, inode.size
            )));
        }

        let count = (end - start) as usize;
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut data = vec![0u8; count * 4];
        self.disk
            .read_at(inode.start_block + start as u64 * 4, &mut data)?;

        Ok(data
            .chunks_exact(4)
            .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
            .collect())
    }

    /// Replaces `a` and `b` with a single file `new_name` holding A's bytes
    /// followed by B's. The sources go through the standard remove path and
    /// the new file through the standard allocation path.
    pub fn concat_files(&self, a: &str, b: &str, new_name: &str) -> Result<()> {
        validate_name(new_name)?;

        let (_, inode_a) = self.inode_table.find_by_name(&self.disk, a)?;
        let (_, inode_b) = self.inode_table.find_by_name(&self.disk, b)?;

        self.remove_file(a)?;
        self.remove_file(b)?;

        let new_size = inode_a.size + inode_b.size;
        let bytes = new_size.checked_mul(4).ok_or(FsError::OutOfSpace)?;

        // The estimate keeps using A's original start offset as its basis.
        if bytes > self.super_block.disk_size - (inode_a.start_block - self.super_block.data_start)
        {
            return Err(FsError::OutOfSpace);
        }

        let slot = self.inode_table.find_free_slot(&self.disk)?;
        let start = self.bitmap.find_free(&self.disk)?;

        let inode = Inode::new(new_name, new_size, start)?;
        self.bitmap
            .set(&self.disk, self.bitmap.block_index_of(start), true)?;
        self.inode_table.write_slot(&self.disk, slot, &inode)?;

        // the sources' bytes are still physically present after removal
        let split = inode_a.byte_len() as usize;
        let mut data = vec![0u8; bytes as usize];
        self.disk.read_at(inode_a.start_block, &mut data[..split])?;
        self.disk.read_at(inode_b.start_block, &mut data[split..])?;
        self.disk.write_at(start, &data)?;

        debug!("concatenated {} + {} into {}", a, b, new_name);
        Ok(())
    }

    /// Read-only bitmap dump for diagnostics.
    pub fn allocated_blocks(&self) -> Result<Vec<u64>> {
        self.bitmap.allocated_blocks(&self.disk)
    }

    /// Read-only inode table dump for diagnostics.
    pub fn live_slots(&self) -> Result<Vec<(u64, Inode)>> {
        self.inode_table.live_slots(&self.disk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::MemDisk;
    use crate::fs::config::BLOCK_SIZE;

    // 1 MiB disk with 8 inode slots; plenty for the scenarios below while
    // keeping the in-memory image small.
    fn test_fs(tag: &str) -> FileSystem<MemDisk> {
        test_fs_sized(tag, 1024 * 1024, 8)
    }

    fn test_fs_sized(tag: &str, disk_size: u64, max_inodes: u64) -> FileSystem<MemDisk> {
        let sb = SuperBlock::new(disk_size, max_inodes);
        let scratch =
            std::env::temp_dir().join(format!("vdfs_scratch_{}_{}.bin", std::process::id(), tag));
        FileSystem::format(MemDisk::new(disk_size), sb, scratch).unwrap()
    }

    // The §3 invariant: a bit is set iff it is reserved or it is the origin
    // block of a live inode.
    fn assert_bitmap_matches_inodes(fs: &FileSystem<MemDisk>) {
        let allocated = fs.allocated_blocks().unwrap();
        let (inodes, _) = fs.list_files().unwrap();
        let mut expected: Vec<u64> = (0..fs.bitmap.reserved_blocks()).collect();
        expected.extend(
            inodes
                .iter()
                .map(|inode| fs.bitmap.block_index_of(inode.start_block)),
        );
        expected.sort_unstable();
        assert_eq!(allocated, expected);
    }

    #[test]
    fn create_then_read_returns_all_elements() {
        let fs = test_fs("create_read");
        fs.create_file("a", 3).unwrap();

        let values = fs.read_file("a", 0, 3).unwrap();
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|&v| (0..100_000).contains(&v)));
    }

    #[test]
    fn the_reference_scenario() {
        let fs = test_fs("scenario");

        fs.create_file("a", 3).unwrap();
        assert_eq!(fs.read_file("a", 0, 3).unwrap().len(), 3);
        assert!(matches!(
            fs.create_file("a", 5),
            Err(FsError::AlreadyExists(_))
        ));
        fs.remove_file("a").unwrap();
        assert!(matches!(
            fs.read_file("a", 0, 3),
            Err(FsError::NotFound(_))
        ));
    }

    #[test]
    fn list_reports_entries_and_total() {
        let fs = test_fs("list");
        assert_eq!(fs.list_files().unwrap(), (Vec::new(), 0));

        fs.create_file("x", 10).unwrap();
        fs.create_file("y", 20).unwrap();
        fs.create_file("z", 30).unwrap();

        let (inodes, total) = fs.list_files().unwrap();
        assert_eq!(inodes.len(), 3);
        assert_eq!(total, 60);
        assert_eq!(
            inodes.iter().map(|i| i.name()).collect::<Vec<_>>(),
            vec!["x", "y", "z"]
        );
    }

    #[test]
    fn remove_twice_fails_not_found() {
        let fs = test_fs("remove_twice");
        fs.create_file("gone", 2).unwrap();
        fs.remove_file("gone").unwrap();
        assert!(matches!(fs.remove_file("gone"), Err(FsError::NotFound(_))));
    }

    #[test]
    fn read_range_boundaries() {
        let fs = test_fs("read_ranges");
        fs.create_file("f", 10).unwrap();

        assert_eq!(fs.read_file("f", 5, 5).unwrap(), Vec::<i32>::new());
        assert!(matches!(
            fs.read_file("f", 3, 2),
            Err(FsError::InvalidRange(_))
        ));
        assert!(matches!(
            fs.read_file("f", -1, 2),
            Err(FsError::InvalidRange(_))
        ));
        assert!(matches!(
            fs.read_file("f", 0, 11),
            Err(FsError::InvalidRange(_))
        ));
        let all = fs.read_file("f", 0, 10).unwrap();
        assert_eq!(fs.read_file("f", 2, 7).unwrap(), &all[2..7]);
    }

    #[test]
    fn create_rejects_oversized_and_zero_requests() {
        let fs = test_fs("create_limits");
        // 1 MiB disk can never hold 2 MiB of payload
        assert!(matches!(
            fs.create_file("big", 512 * 1024),
            Err(FsError::OutOfSpace)
        ));
        assert!(matches!(
            fs.create_file("empty", 0),
            Err(FsError::InvalidRange(_))
        ));
        assert!(matches!(fs.create_file("", 1), Err(FsError::InvalidName(_))));
        // nothing was allocated by the failed attempts
        assert_bitmap_matches_inodes(&fs);
    }

    #[test]
    fn table_full_after_exhausting_slots() {
        let fs = test_fs_sized("table_full", 1024 * 1024, 2);
        fs.create_file("one", 1).unwrap();
        fs.create_file("two", 1).unwrap();
        assert!(matches!(fs.create_file("three", 1), Err(FsError::TableFull)));
    }

    #[test]
    fn allocation_is_first_fit_by_block_index() {
        let fs = test_fs("first_fit");
        fs.create_file("a", 1).unwrap();
        fs.create_file("b", 1).unwrap();
        fs.create_file("c", 1).unwrap();

        let start_of = |name: &str| fs.inode_table.find_by_name(&fs.disk, name).unwrap().1.start_block;
        let base = fs.super_block.data_start + fs.bitmap.reserved_blocks() * BLOCK_SIZE;
        assert_eq!(start_of("a"), base);
        assert_eq!(start_of("b"), base + BLOCK_SIZE);
        assert_eq!(start_of("c"), base + 2 * BLOCK_SIZE);

        // the freed block is reused before any higher one
        fs.remove_file("b").unwrap();
        fs.create_file("d", 1).unwrap();
        assert_eq!(start_of("d"), base + BLOCK_SIZE);
    }

    #[test]
    fn bitmap_and_directory_stay_consistent() {
        let fs = test_fs("consistency");
        fs.create_file("a", 100).unwrap();
        assert_bitmap_matches_inodes(&fs);
        fs.create_file("b", 200).unwrap();
        fs.create_file("c", 300).unwrap();
        assert_bitmap_matches_inodes(&fs);
        fs.remove_file("b").unwrap();
        assert_bitmap_matches_inodes(&fs);
        fs.concat_files("a", "c", "ac").unwrap();
        assert_bitmap_matches_inodes(&fs);
        fs.remove_file("ac").unwrap();
        assert_bitmap_matches_inodes(&fs);
    }

    #[test]
    fn concat_preserves_payload_order_and_drops_sources() {
        let fs = test_fs("concat");
        fs.create_file("left", 40).unwrap();
        fs.create_file("right", 25).unwrap();

        let left = fs.read_file("left", 0, 40).unwrap();
        let right = fs.read_file("right", 0, 25).unwrap();

        fs.concat_files("left", "right", "joined").unwrap();

        let mut expected = left;
        expected.extend(right);
        assert_eq!(fs.read_file("joined", 0, 65).unwrap(), expected);

        let (inodes, total) = fs.list_files().unwrap();
        assert_eq!(inodes.len(), 1);
        assert_eq!(total, 65);
        assert!(matches!(
            fs.read_file("left", 0, 1),
            Err(FsError::NotFound(_))
        ));
        assert!(matches!(
            fs.read_file("right", 0, 1),
            Err(FsError::NotFound(_))
        ));
    }

    #[test]
    fn concat_requires_both_sources_up_front() {
        let fs = test_fs("concat_missing");
        fs.create_file("only", 5).unwrap();

        assert!(matches!(
            fs.concat_files("only", "missing", "out"),
            Err(FsError::NotFound(_))
        ));
        // the present source is untouched by the failed call
        assert_eq!(fs.read_file("only", 0, 5).unwrap().len(), 5);
        assert_bitmap_matches_inodes(&fs);
    }

    #[test]
    fn mount_sees_files_created_before() {
        let sb = SuperBlock::new(1024 * 1024, 8);
        let scratch = std::env::temp_dir().join(format!(
            "vdfs_scratch_{}_remount.bin",
            std::process::id()
        ));

        let disk = MemDisk::new(sb.disk_size);
        let fs = FileSystem::format(disk, sb, scratch.clone()).unwrap();
        fs.create_file("persist", 12).unwrap();
        let before = fs.read_file("persist", 0, 12).unwrap();
        let FileSystem { disk, .. } = fs;

        let fs = FileSystem::mount(disk, scratch).unwrap();
        assert_eq!(fs.read_file("persist", 0, 12).unwrap(), before);
    }

    #[test]
    fn mount_rejects_a_blank_image() {
        let scratch = std::env::temp_dir().join(format!(
            "vdfs_scratch_{}_blank.bin",
            std::process::id()
        ));
        let result = FileSystem::mount(MemDisk::new(1024 * 1024), scratch);
        assert!(matches!(result, Err(FsError::Corrupted(_))));
    }
}
