use colored::*;

use crate::disk::FileDisk;
use crate::fs::error::Result;
use crate::fs::FileSystem;

/// Read-only dumps of the on-disk structures, for inspection from the
/// shell. These consume the same mounted handle as every other operation.

pub fn print_super_block(fs: &FileSystem<FileDisk>) {
    let sb = fs.super_block();
    println!("{}", "Superblock".bright_yellow().bold());
    println!(
        "  disk size:          {} bytes ({:.2} MiB)",
        sb.disk_size,
        sb.disk_size as f64 / 1024.0 / 1024.0
    );
    println!("  max inodes:         {}", sb.max_inodes);
    println!("  total blocks:       {}", sb.total_blocks);
    println!("  inode table start:  {}", sb.inode_table_start);
    println!("  data start:         {}", sb.data_start);
}

pub fn print_bitmap(fs: &FileSystem<FileDisk>) -> Result<()> {
    let allocated = fs.allocated_blocks()?;
    println!("{}", "Allocated blocks".bright_yellow().bold());
    for line in allocated.chunks(16) {
        let rendered: Vec<String> = line.iter().map(|b| b.to_string()).collect();
        println!("  {}", rendered.join(" "));
    }
    println!("{} of {} blocks in use", allocated.len(), fs.super_block().total_blocks);
    Ok(())
}

pub fn print_inode_table(fs: &FileSystem<FileDisk>) -> Result<()> {
    let slots = fs.live_slots()?;
    println!("{}", "Inode table".bright_yellow().bold());
    if slots.is_empty() {
        println!("  {}", "all slots free".bright_black());
    }
    for (index, inode) in slots {
        println!(
            "  inode {:>4} -> {:<32} size {:>10}  start {}",
            index,
            inode.name(),
            inode.size,
            inode.start_block
        );
    }
    Ok(())
}
