/*
 * Copyright 2026 The cheekyfs authors
 *
 * This file is part of cheekyfs.
 *
 * cheekyfs is free software: you can redistribute it and/or modify it under the
 * terms of the GNU General Public License as published by the Free Software
 * Foundation, either version 3 of the License, or (at your option) any later
 * version.
 *
 * cheekyfs is distributed in the hope that it will be useful, but WITHOUT ANY
 * WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
 * A PARTICULAR PURPOSE. See the GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License along with
 * cheekyfs. If not, see <https://www.gnu.org/licenses/>.
 */

//! The block device this filesystem is layered over.
//!
//! A [`BlockDevice`] is an opaque collection of [`crate::MAX_BLOCKS`] fixed-size
//! blocks, addressed by [`crate::BlockId`] and read or written whole. It knows
//! nothing about files, directories or the header: everything above that line
//! is this crate's job.

use crate::{BlockId, BLOCK_SIZE, MAX_BLOCKS};

/// A single block's worth of bytes.
pub type Block = [u8; BLOCK_SIZE];

/// A fixed number of fixed-size, randomly addressable blocks.
///
/// Implementations are expected to do nothing but move bytes: no caching,
/// journaling or partial-block access. Every call site in this crate checks
/// the return value and surfaces [`crate::Error::BlockIo`] on failure without
/// retrying.
pub trait BlockDevice {
    /// Reads block `id` into `buf`. Returns `Err(())` on any I/O failure.
    fn get_block(&mut self, id: BlockId, buf: &mut Block) -> Result<(), ()>;

    /// Writes `buf` to block `id`. Returns `Err(())` on any I/O failure.
    fn put_block(&mut self, id: BlockId, buf: &Block) -> Result<(), ()>;
}

/// An in-memory [`BlockDevice`], useful for tests and for callers that don't
/// need the image to outlive the process.
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    blocks: Vec<Block>,
}

impl MemoryBlockDevice {
    /// Creates a device with all [`MAX_BLOCKS`] blocks zero-filled.
    pub fn new() -> Self {
        Self {
            blocks: vec![[0u8; BLOCK_SIZE]; MAX_BLOCKS],
        }
    }
}

impl Default for MemoryBlockDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockDevice for MemoryBlockDevice {
    fn get_block(&mut self, id: BlockId, buf: &mut Block) -> Result<(), ()> {
        let block = self.blocks.get(index(id)?).ok_or(())?;
        buf.copy_from_slice(block);
        Ok(())
    }

    fn put_block(&mut self, id: BlockId, buf: &Block) -> Result<(), ()> {
        let block = self.blocks.get_mut(index(id)?).ok_or(())?;
        block.copy_from_slice(buf);
        Ok(())
    }
}

fn index(id: BlockId) -> Result<usize, ()> {
    usize::try_from(id).map_err(|_| ())
}
