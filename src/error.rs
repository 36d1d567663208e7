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

//! The closed error taxonomy returned by every fallible operation.

use thiserror::Error;

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Every error a [`crate::FileSystem`] operation can return.
///
/// The set is closed and gapless: every discriminant is negative, they run
/// consecutively starting at [`Error::OutOfMemory`], and no operation ever
/// returns a value outside this enum.
#[repr(i32)]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Allocation of an in-memory structure (a directory list node, an open-file
    /// entry) failed.
    #[error("could not allocate memory")]
    OutOfMemory = -100,
    /// No file exists at the given path.
    #[error("the file specified by the path could not be found")]
    FileNotFound,
    /// An operation expected one file kind (data or directory) but found the
    /// other.
    #[error("file was not the correct type for the function")]
    BadFileType,
    /// A file descriptor was out of range or not currently open.
    #[error("supplied file descriptor was not valid")]
    BadFd,
    /// The underlying [`crate::BlockDevice`] reported an I/O failure.
    #[error("the block I/O layer encountered an error")]
    BlockIo,
    /// A `read`/`write` range crossed a block boundary; every access must stay
    /// within a single block.
    #[error("specified read or write operation would cross block boundaries")]
    BlockFault,
    /// `delete` was called on a non-empty directory.
    #[error("directory contains files and must be empty")]
    DirNotEmpty,
    /// A data file has used all [`crate::MAX_BLOCKS_PER_FILE`] blocks and cannot
    /// grow any further.
    #[error("file cannot grow any larger")]
    FileFull,
    /// A `read` requested bytes past the end of the file.
    #[error("file doesn't contain enough data to satisfy the read/write request")]
    NotEnoughData,
    /// A path component was longer than [`crate::MAX_PATH_COMPONENT_LENGTH`].
    #[error("file name is too long")]
    InvalidName,
    /// A file kind passed to [`crate::FileSystem::create`] was neither data nor
    /// directory.
    #[error("file type is invalid")]
    InvalidType,
    /// The on-disk header or a file control block failed validation while
    /// mounting an existing filesystem image.
    #[error("the data file that was loaded could not be validated")]
    InvalidDataFile,
    /// `create` was called with a path that already exists.
    #[error("another file with that name already exists")]
    NameTaken,
    /// A `start` offset passed to `read`/`write` was out of range (negative for
    /// `read`, less than `-1` for `write`).
    #[error("starting location when reading or writing is invalid")]
    InvalidStartLoc,
    /// A path failed basic structural validation: it didn't start with `/`,
    /// ended with a trailing `/`, or contained an empty component (e.g. `//`).
    #[error("path is invalid (i.e. doesn't start with a slash or ends with a slash)")]
    InvalidPath,
    /// There is no free file control block slot left to satisfy `create`.
    #[error("the filesystem is full, no more files can be created")]
    FileSystemFull,
    /// All [`crate::MAX_OPEN_FILES`] descriptor slots are in use.
    #[error("too many files are currently open")]
    TooManyOpen,
    /// The free-block bitmap has no block left to allocate.
    #[error("there are no more empty blocks to write to")]
    NoMoreBlocks,
    /// Reserved for the case where the error taxonomy itself has grown to
    /// include a non-negative discriminant. Unreachable in practice: every
    /// variant above is assigned a negative value by construction, and this
    /// variant is checked for in [`FileSystem::initialize`](crate::FileSystem::initialize).
    #[error("there are too many error codes, the first one needs to be reassigned to a more negative value")]
    AdjustErrorCodes,
    /// The compile-time layout doesn't leave enough blocks to hold the file
    /// control block table.
    #[error("there aren't enough blocks on the device to hold all the files' metadata")]
    NotEnoughBlocksForFiles,
    /// [`crate::BLOCK_SIZE`] is too small to hold a single file control block.
    #[error("the blocks are not large enough to hold a single file object")]
    BlocksTooSmallForFile,
    /// `delete` was called on the root directory, which can never be removed.
    #[error("deleting the root directory is not permitted")]
    CantDeleteRoot,
    /// `delete` was called on a file that is currently open.
    #[error("user tried to delete an open file")]
    FileOpen,
}

impl Error {
    /// The numeric code for this error, matching the taxonomy's contract that
    /// every code is negative and the set is gapless.
    pub fn code(self) -> i32 {
        self as i32
    }
}
