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

//! The file control block: the fixed-size record that describes one file.

use crate::{BlockId, FileId, MAX_BLOCKS_PER_FILE, MAX_PATH_COMPONENT_LENGTH, NO_BLOCK, NO_FILE};

/// Length, in bytes, of the on-disk name buffer: the component plus its NUL
/// terminator.
pub const NAME_BUF_LEN: usize = MAX_PATH_COMPONENT_LENGTH + 1;

/// On-disk size of a single file control block, in bytes.
///
/// `1` (kind) `+ NAME_BUF_LEN` (name) `+ 4` (size) `+ 1` (parent)
/// `+ MAX_BLOCKS_PER_FILE * 2` (block ids).
pub const FCB_SIZE: usize = 1 + NAME_BUF_LEN + 4 + 1 + MAX_BLOCKS_PER_FILE * 2;

/// What kind of object a file control block slot currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FileKind {
    /// The slot is free.
    None = 0,
    /// A regular, byte-addressable data file.
    Data = 1,
    /// A directory.
    Dir = 2,
}

impl FileKind {
    fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(FileKind::None),
            1 => Some(FileKind::Data),
            2 => Some(FileKind::Dir),
            _ => None,
        }
    }
}

/// A file control block: the metadata record for one file table slot.
///
/// The `blocks` field is only meaningful when `kind == FileKind::Data`; for a
/// directory it is never consulted and is always serialized as zero, since
/// directory membership is rebuilt at mount time from `parent` back-references
/// rather than stored here (see [`crate::directory`]).
#[derive(Debug, Clone)]
pub struct Fcb {
    pub kind: FileKind,
    name: [u8; NAME_BUF_LEN],
    /// For `Data`, the byte length of the file. For `Dir`, the number of
    /// immediate children.
    pub size: u32,
    pub parent: FileId,
    pub blocks: [BlockId; MAX_BLOCKS_PER_FILE],
}

impl Fcb {
    /// An empty (free) slot.
    pub fn empty() -> Self {
        Self {
            kind: FileKind::None,
            name: [0; NAME_BUF_LEN],
            size: 0,
            parent: NO_FILE,
            blocks: [NO_BLOCK; MAX_BLOCKS_PER_FILE],
        }
    }

    /// The root directory: file ID 0, named `/`, parentless.
    pub fn root() -> Self {
        let mut fcb = Self::empty();
        fcb.kind = FileKind::Dir;
        fcb.set_name("/");
        fcb
    }

    /// A fresh data file with no blocks allocated.
    pub fn new_data(name: &str, parent: FileId) -> Self {
        let mut fcb = Self::empty();
        fcb.kind = FileKind::Data;
        fcb.set_name(name);
        fcb.parent = parent;
        fcb
    }

    /// A fresh, empty directory.
    pub fn new_dir(name: &str, parent: FileId) -> Self {
        let mut fcb = Self::empty();
        fcb.kind = FileKind::Dir;
        fcb.set_name(name);
        fcb.parent = parent;
        fcb
    }

    /// The component name of this file, without the NUL terminator.
    pub fn name(&self) -> &str {
        let len = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(self.name.len());
        // The name is always set from a validated `&str`, so this can't fail.
        std::str::from_utf8(&self.name[..len]).unwrap_or("")
    }

    /// Overwrites the component name. `name` must already have been validated
    /// against [`MAX_PATH_COMPONENT_LENGTH`] by the caller (normally
    /// [`crate::path::parse`]); names that don't fit are silently truncated.
    pub fn set_name(&mut self, name: &str) {
        self.name = [0; NAME_BUF_LEN];
        let bytes = name.as_bytes();
        let len = bytes.len().min(MAX_PATH_COMPONENT_LENGTH);
        self.name[..len].copy_from_slice(&bytes[..len]);
    }

    pub fn is_none(&self) -> bool {
        self.kind == FileKind::None
    }

    pub fn is_data(&self) -> bool {
        self.kind == FileKind::Data
    }

    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Dir
    }

    /// Resets this slot to free, as `delete` does after unlinking a file.
    pub fn clear(&mut self) {
        *self = Self::empty();
    }

    /// Serializes this FCB to its fixed-size on-disk representation. For a
    /// directory, the block-id region is zeroed rather than reflecting
    /// whatever transient state `blocks` happens to hold.
    pub fn to_bytes(&self) -> [u8; FCB_SIZE] {
        let mut buf = [0u8; FCB_SIZE];
        let mut at = 0;

        buf[at] = self.kind as u8;
        at += 1;

        buf[at..at + NAME_BUF_LEN].copy_from_slice(&self.name);
        at += NAME_BUF_LEN;

        buf[at..at + 4].copy_from_slice(&self.size.to_le_bytes());
        at += 4;

        buf[at] = self.parent as u8;
        at += 1;

        if self.is_data() {
            for (i, block) in self.blocks.iter().enumerate() {
                let bytes = block.to_le_bytes();
                buf[at + i * 2..at + i * 2 + 2].copy_from_slice(&bytes);
            }
        }

        buf
    }

    /// Parses an FCB out of its fixed-size on-disk representation.
    ///
    /// Returns `None` if the kind tag isn't one of the three valid values;
    /// the caller (mount validation) turns that into
    /// [`crate::Error::InvalidDataFile`].
    pub fn from_bytes(buf: &[u8; FCB_SIZE]) -> Option<Self> {
        let mut at = 0;

        let kind = FileKind::from_tag(buf[at])?;
        at += 1;

        let mut name = [0u8; NAME_BUF_LEN];
        name.copy_from_slice(&buf[at..at + NAME_BUF_LEN]);
        at += NAME_BUF_LEN;

        let size = u32::from_le_bytes(buf[at..at + 4].try_into().unwrap());
        at += 4;

        let parent = buf[at] as i8;
        at += 1;

        let mut blocks = [NO_BLOCK; MAX_BLOCKS_PER_FILE];
        if kind == FileKind::Data {
            for (i, slot) in blocks.iter_mut().enumerate() {
                *slot = BlockId::from_le_bytes(
                    buf[at + i * 2..at + i * 2 + 2].try_into().unwrap(),
                );
            }
        }

        Some(Self {
            kind,
            name,
            size,
            parent,
            blocks,
        })
    }
}
