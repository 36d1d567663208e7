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

//! A small filesystem for a fixed-size, block-addressed storage medium.
//!
//! The filesystem is laid out on top of an opaque [`BlockDevice`], which exposes
//! nothing but a fixed number of fixed-size blocks addressed by number. Everything
//! above that line — the on-disk header, the file control block table, directory
//! membership, free space tracking and the open-file table — is implemented here.
//!
//! The design favours a small, closed, entirely in-memory working set (the whole
//! file table and free-block bitmap live in RAM once mounted) over generality:
//! the number of files, the number of blocks and the size of a path component are
//! all fixed at compile time.

mod block;
mod directory;
mod error;
mod fcb;
mod fs;
mod header;
mod open;
mod path;

pub use block::{BlockDevice, MemoryBlockDevice};
pub use error::{Error, Result};
pub use fcb::FileKind;
pub use fs::FileSystem;

/// Number of bytes in a single block.
pub const BLOCK_SIZE: usize = 128;

/// Total number of blocks on the device, including the header and FCB table.
pub const MAX_BLOCKS: usize = 512;

/// Maximum number of files (including the root directory) the filesystem can hold.
pub const MAX_FILES: usize = 64;

/// Maximum number of blocks a single data file may occupy.
pub const MAX_BLOCKS_PER_FILE: usize = 4;

/// Maximum length, in bytes, of a single path component (not counting the NUL
/// terminator reserved for on-disk storage).
pub const MAX_PATH_COMPONENT_LENGTH: usize = 6;

/// Maximum number of files that may be open at the same time.
pub const MAX_OPEN_FILES: usize = 4;

/// Identifies a block on the underlying device. `-1` means "no block".
pub type BlockId = i16;

/// Identifies a file control block slot. `-1` means "no file" and is used as the
/// root directory's parent.
pub type FileId = i8;

/// Sentinel `BlockId` meaning "no block is allocated here".
pub const NO_BLOCK: BlockId = -1;

/// Sentinel `FileId` meaning "no file" (the root's parent).
pub const NO_FILE: FileId = -1;

/// The file ID of the root directory. Fixed by construction: it is always the
/// first file control block created, and it is never deleted.
pub const ROOT_ID: FileId = 0;
