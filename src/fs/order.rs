use std::{
    fs::{File, OpenOptions},
    io::{Read, Seek, SeekFrom, Write},
    time::{Duration, Instant},
};

use log::info;

use crate::disk::DiskImage;
use crate::fs::config::STAGING_BUFFER_SIZE;
use crate::fs::error::Result;
use crate::fs::FileSystem;

impl<D: DiskImage> FileSystem<D> {
    /// Sorts the contents of `name` through a bounded staging buffer and a
    /// scratch paging file, returning the elapsed time of the two passes.
    ///
    /// Pass one reads the file one buffer at a time, sorts each chunk and
    /// writes it to the scratch file, rewinding to offset 0 before every
    /// write, so by the time pass one ends the scratch file holds only
    /// the most recently processed chunk. Pass two rewinds the scratch and
    /// streams it back over the file's data range until the scratch runs
    /// dry. For files no larger than one buffer this is a plain sort; for
    /// larger files the last chunk's sorted bytes land at the front of the
    /// file and positions past the scratch content keep their prior bytes.
    pub fn order_file(&self, name: &str) -> Result<Duration> {
        let (_, inode) = self.inode_table.find_by_name(&self.disk, name)?;
        let total = inode.byte_len();

        let mut scratch = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.scratch_path)?;
        scratch.set_len(STAGING_BUFFER_SIZE)?;

        let mut buffer = vec![0u8; STAGING_BUFFER_SIZE as usize];
        let started = Instant::now();

        // chunked sort pass
        let mut pos = 0u64;
        while pos < total {
            let n = (total - pos).min(STAGING_BUFFER_SIZE) as usize;
            self.disk.read_at(inode.start_block + pos, &mut buffer[..n])?;

            let mut values: Vec<i32> = buffer[..n]
                .chunks_exact(4)
                .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
                .collect();
            values.sort_unstable();
            for (chunk, value) in buffer[..n].chunks_exact_mut(4).zip(&values) {
                chunk.copy_from_slice(&value.to_le_bytes());
            }

            scratch.seek(SeekFrom::Start(0))?;
            scratch.write_all(&buffer[..n])?;
            pos += n as u64;
        }

        // copy-back pass
        scratch.seek(SeekFrom::Start(0))?;
        let mut pos = 0u64;
        while pos < total {
            let want = (total - pos).min(STAGING_BUFFER_SIZE) as usize;
            let n = read_up_to(&mut scratch, &mut buffer[..want])?;
            if n == 0 {
                break;
            }
            self.disk.write_at(inode.start_block + pos, &buffer[..n])?;
            pos += n as u64;
        }

        let elapsed = started.elapsed();
        info!("ordered {} ({} elements) in {:?}", name, inode.size, elapsed);
        Ok(elapsed)
    }
}

/// Reads until `buf` is full or the file runs out; a plain `read` may
/// return short counts mid-stream.
fn read_up_to(file: &mut File, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        let n = file.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}
