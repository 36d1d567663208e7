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

//! The public filesystem API: the ten entry points layered over a
//! [`BlockDevice`], a file table and an open-file table.

use static_assertions::const_assert;

use crate::block::BlockDevice;
use crate::directory::DirectoryLists;
use crate::error::{Error, Result};
use crate::fcb::{Fcb, FileKind, FCB_SIZE};
use crate::header::{Header, HEADER_SIZE};
use crate::open::OpenTable;
use crate::path;
use crate::{
    BlockId, FileId, BLOCK_SIZE, MAX_BLOCKS, MAX_BLOCKS_PER_FILE, MAX_FILES, NO_BLOCK, NO_FILE,
    ROOT_ID,
};

const_assert!(BLOCK_SIZE >= FCB_SIZE);
const_assert!(HEADER_SIZE <= BLOCK_SIZE);

/// Number of file control blocks that fit in a single block.
const FCBS_PER_BLOCK: usize = BLOCK_SIZE / FCB_SIZE;

/// A mounted filesystem: the file table, free-block map, directory lists and
/// open-file table, all layered over a [`BlockDevice`].
///
/// [`FileSystem::initialize`] must be called (and succeed) before any other
/// method is used; it plays the role the reference implementation's global
/// `initialized` flag plays, but scoped to this handle instead of the whole
/// process.
pub struct FileSystem<D: BlockDevice> {
    device: D,
    files: [Fcb; MAX_FILES],
    free_blocks: [bool; MAX_BLOCKS],
    dirs: DirectoryLists,
    open_files: OpenTable,
    initialized: bool,
}

impl<D: BlockDevice> FileSystem<D> {
    /// Wraps `device` in a filesystem handle. Call [`FileSystem::initialize`]
    /// before doing anything else with it.
    pub fn new(device: D) -> Self {
        Self {
            device,
            files: std::array::from_fn(|_| Fcb::empty()),
            free_blocks: [true; MAX_BLOCKS],
            dirs: DirectoryLists::new(),
            open_files: OpenTable::new(),
            initialized: false,
        }
    }

    /// Returns the wrapped block device, consuming the filesystem handle.
    pub fn into_device(self) -> D {
        self.device
    }

    // ---- initialize -----------------------------------------------------

    /// Mounts the filesystem image on the underlying device, or creates a
    /// fresh one.
    ///
    /// With `erase == false`, an existing, valid image is mounted in place;
    /// an unformatted device (block 0's first byte is zero) is formatted
    /// instead. With `erase == true`, the device is always reformatted and
    /// every non-metadata block is zeroed.
    ///
    /// May be called more than once; a second call releases the previous
    /// in-memory directory lists before rebuilding them.
    pub fn initialize(&mut self, erase: bool) -> Result<()> {
        let fcb_blocks = fcb_block_count();
        if fcb_blocks >= MAX_BLOCKS - 1 {
            return Err(Error::NotEnoughBlocksForFiles);
        }
        if BLOCK_SIZE < FCB_SIZE {
            return Err(Error::BlocksTooSmallForFile);
        }

        if self.initialized {
            self.dirs.reset();
        }
        self.initialized = true;

        self.free_blocks = [true; MAX_BLOCKS];

        let mut block0 = [0u8; BLOCK_SIZE];
        self.read_block(0, &mut block0)?;
        self.free_blocks[0] = false;

        if block0[0] != 0 && !erase {
            self.mount_existing(&block0)
        } else {
            self.create_fresh(erase)
        }
    }

    fn mount_existing(&mut self, block0: &[u8; BLOCK_SIZE]) -> Result<()> {
        let mut header_bytes = [0u8; HEADER_SIZE];
        header_bytes.copy_from_slice(&block0[..HEADER_SIZE]);
        let header = Header::from_bytes(&header_bytes).ok_or(Error::InvalidDataFile)?;
        if !header.matches_current() {
            return Err(Error::InvalidDataFile);
        }

        let mut current_block: Option<BlockId> = None;
        let mut block_buf = [0u8; BLOCK_SIZE];
        for id in 0..MAX_FILES as FileId {
            let block_id = block_of(id);
            let offset = offset_of(id);
            if current_block != Some(block_id) {
                self.read_block(block_id, &mut block_buf)?;
                self.free_blocks[block_id as usize] = false;
                current_block = Some(block_id);
            }
            let mut fcb_bytes = [0u8; FCB_SIZE];
            fcb_bytes.copy_from_slice(&block_buf[offset..offset + FCB_SIZE]);
            self.files[id as usize] = Fcb::from_bytes(&fcb_bytes).ok_or(Error::InvalidDataFile)?;
        }

        let root = &self.files[ROOT_ID as usize];
        if !root.is_dir() || root.name() != "/" || root.parent != NO_FILE {
            return Err(Error::InvalidDataFile);
        }

        for id in 0..MAX_FILES as FileId {
            let fcb = &self.files[id as usize];
            if fcb.is_none() {
                continue;
            }

            if id != ROOT_ID {
                let parent = fcb.parent;
                if parent < 0 || parent as usize >= MAX_FILES || parent == id {
                    return Err(Error::InvalidDataFile);
                }
                if !self.files[parent as usize].is_dir() {
                    return Err(Error::InvalidDataFile);
                }
            }

            if fcb.is_data() {
                self.validate_data_blocks(id)?;
            }
        }

        self.dirs.reset();
        for id in 0..MAX_FILES as FileId {
            if !self.files[id as usize].is_dir() {
                continue;
            }
            for other in 0..MAX_FILES as FileId {
                if other == id {
                    continue;
                }
                if !self.files[other as usize].is_none() && self.files[other as usize].parent == id
                {
                    self.dirs.append(id, other);
                }
            }
        }

        for id in 0..MAX_FILES as FileId {
            if self.files[id as usize].is_dir() {
                let expected = self.files[id as usize].size;
                if self.dirs.count(id) as u32 != expected {
                    return Err(Error::InvalidDataFile);
                }
            }
        }

        Ok(())
    }

    /// Validates I3/I4 for the data file at `id` and marks its blocks
    /// not-free, as part of mount.
    fn validate_data_blocks(&mut self, id: FileId) -> Result<()> {
        let blocks = self.files[id as usize].blocks;
        let size = self.files[id as usize].size;

        let mut used = 0usize;
        let mut seen_unused = false;
        for &block in blocks.iter() {
            if block == NO_BLOCK {
                seen_unused = true;
            } else {
                if seen_unused {
                    return Err(Error::InvalidDataFile);
                }
                used += 1;
            }
        }

        if used == 0 {
            if size != 0 {
                return Err(Error::InvalidDataFile);
            }
        } else if (size as usize - 1) / BLOCK_SIZE + 1 != used {
            return Err(Error::InvalidDataFile);
        }

        for &block in blocks.iter() {
            if block == NO_BLOCK {
                continue;
            }
            if block < 0 || block as usize >= MAX_BLOCKS {
                return Err(Error::InvalidDataFile);
            }
            if !self.free_blocks[block as usize] {
                return Err(Error::InvalidDataFile);
            }
            self.free_blocks[block as usize] = false;
        }

        Ok(())
    }

    fn create_fresh(&mut self, erase: bool) -> Result<()> {
        self.files = std::array::from_fn(|_| Fcb::empty());
        self.files[ROOT_ID as usize] = Fcb::root();

        // Zero every metadata block up front. Under the reference
        // implementation this fell out of writing the header and root into
        // freshly-zeroed buffers before the per-file save loop; doing it in
        // one pass here produces the same bytes.
        let fcb_blocks = fcb_block_count();
        for block in 1..=fcb_blocks as BlockId {
            self.write_block(block, &[0u8; BLOCK_SIZE])?;
        }

        self.save_fcb(ROOT_ID)?;

        let mut header_block = [0u8; BLOCK_SIZE];
        header_block[..HEADER_SIZE].copy_from_slice(&Header::current().to_bytes());
        self.write_block(0, &header_block)?;

        if erase {
            for block in (fcb_blocks as BlockId + 1)..MAX_BLOCKS as BlockId {
                self.write_block(block, &[0u8; BLOCK_SIZE])?;
            }
        }

        for id in 1..MAX_FILES as FileId {
            self.files[id as usize] = Fcb::empty();
            self.save_fcb(id)?;
            self.free_blocks[block_of(id) as usize] = false;
        }

        Ok(())
    }

    // ---- path resolution --------------------------------------------------

    fn resolve(&self, components: &[String]) -> Result<FileId> {
        let mut current = ROOT_ID;
        for name in components {
            if !self.files[current as usize].is_dir() {
                return Err(Error::BadFileType);
            }
            current = self
                .dirs
                .find_by_name(current, name, |id| self.files[id as usize].name().to_string())
                .ok_or(Error::FileNotFound)?;
        }
        Ok(current)
    }

    fn find_by_path(&self, path: &str) -> Result<FileId> {
        let components = path::parse(path)?;
        self.resolve(&components)
    }

    // ---- create / delete ----------------------------------------------

    /// Creates a regular file or directory at `path`. `kind` must be
    /// [`FileKind::Data`] or [`FileKind::Dir`].
    pub fn create(&mut self, path: &str, kind: FileKind) -> Result<()> {
        if kind == FileKind::None {
            return Err(Error::InvalidType);
        }

        let components = path::parse(path)?;
        if components.is_empty() {
            // The only path with no components is "/", which always exists.
            return Err(Error::NameTaken);
        }

        match self.resolve(&components) {
            Ok(_) => return Err(Error::NameTaken),
            Err(Error::FileNotFound) => {}
            Err(other) => return Err(other),
        }

        let (parent_components, name) = components.split_at(components.len() - 1);
        let name = &name[0];
        let parent_id = self.resolve(parent_components)?;
        if !self.files[parent_id as usize].is_dir() {
            return Err(Error::BadFileType);
        }

        let new_id = self
            .files
            .iter()
            .position(|fcb| fcb.is_none())
            .map(|i| i as FileId)
            .ok_or(Error::FileSystemFull)?;

        self.files[new_id as usize] = match kind {
            FileKind::Data => Fcb::new_data(name, parent_id),
            FileKind::Dir => Fcb::new_dir(name, parent_id),
            FileKind::None => unreachable!(),
        };

        self.dirs.append(parent_id, new_id);
        self.open_files.invalidate_cursors_into(parent_id);
        self.files[parent_id as usize].size += 1;

        self.save_fcb(new_id)?;
        self.save_fcb(parent_id)?;
        Ok(())
    }

    /// Deletes the file or directory at `path`.
    pub fn delete(&mut self, path: &str) -> Result<()> {
        let components = path::parse(path)?;
        if components.is_empty() {
            return Err(Error::CantDeleteRoot);
        }

        let id = self.resolve(&components)?;
        if self.open_files.is_open(id) {
            return Err(Error::FileOpen);
        }
        if self.files[id as usize].is_dir() && self.dirs.count(id) > 0 {
            return Err(Error::DirNotEmpty);
        }

        let parent = self.files[id as usize].parent;
        self.dirs.remove(parent, id);
        self.open_files.invalidate_cursors_into(parent);
        self.files[parent as usize].size = self.files[parent as usize].size.saturating_sub(1);

        if self.files[id as usize].is_data() {
            let blocks = self.files[id as usize].blocks;
            for block in blocks {
                if block == NO_BLOCK {
                    continue;
                }
                self.write_block(block, &[0u8; BLOCK_SIZE])?;
                self.free_blocks[block as usize] = true;
            }
        }

        self.files[id as usize].clear();
        self.save_fcb(id)?;
        self.save_fcb(parent)?;
        Ok(())
    }

    // ---- open / close / readdir ----------------------------------------

    /// Opens the file at `path`, returning a descriptor.
    pub fn open(&mut self, path: &str) -> Result<usize> {
        let id = self.find_by_path(path)?;
        self.open_files.open(id)
    }

    /// Closes descriptor `fd`.
    pub fn close(&mut self, fd: usize) -> Result<()> {
        self.open_files.close(fd)
    }

    /// Returns the next child name of the directory open on `fd`, or `None`
    /// once every child has been returned. Each call advances an internal
    /// cursor; re-opening the descriptor (closing and opening again) is the
    /// only way to restart iteration, except that any mutation of the
    /// directory (`create`/`delete` of a child) also restarts it.
    pub fn readdir(&mut self, fd: usize) -> Result<Option<String>> {
        let id = self.open_files.file_of(fd)?;
        if !self.files[id as usize].is_dir() {
            return Err(Error::BadFileType);
        }

        let next = match self.open_files.cursor(fd)? {
            None => self.dirs.first_child(id),
            Some(last) => self.dirs.next_sibling(last),
        };
        self.open_files.set_cursor(fd, next);
        Ok(next.map(|child| self.files[child as usize].name().to_string()))
    }

    // ---- read / write ----------------------------------------------------

    /// Copies `out.len()` bytes starting at `start` from the data file open
    /// on `fd`. `start` must be non-negative, and the whole range must lie
    /// inside a single block.
    pub fn read(&mut self, fd: usize, start: i32, out: &mut [u8]) -> Result<()> {
        let id = self.open_files.file_of(fd)?;
        if !self.files[id as usize].is_data() {
            return Err(Error::BadFileType);
        }
        if start < 0 {
            return Err(Error::InvalidStartLoc);
        }
        let start = start as usize;
        let length = out.len();
        let size = self.files[id as usize].size as usize;

        if length == 0 {
            return if start <= size {
                Ok(())
            } else {
                Err(Error::NotEnoughData)
            };
        }

        let end = start + length;
        if start / BLOCK_SIZE != (end - 1) / BLOCK_SIZE {
            return Err(Error::BlockFault);
        }
        if end > size {
            return Err(Error::NotEnoughData);
        }

        let block_id = self.files[id as usize].blocks[start / BLOCK_SIZE];
        let mut block_buf = [0u8; BLOCK_SIZE];
        self.read_block(block_id, &mut block_buf)?;
        let offset = start % BLOCK_SIZE;
        out.copy_from_slice(&block_buf[offset..offset + length]);
        Ok(())
    }

    /// Writes `buf` into the data file open on `fd`.
    ///
    /// `start == -1` appends `buf` to the end of the file, the only way to
    /// grow it. Otherwise `start` overwrites existing bytes and the whole
    /// range `[start, start+buf.len())` must already be within the file and
    /// within a single block.
    pub fn write(&mut self, fd: usize, start: i32, buf: &[u8]) -> Result<()> {
        let id = self.open_files.file_of(fd)?;
        if !self.files[id as usize].is_data() {
            return Err(Error::BadFileType);
        }
        if start < -1 {
            return Err(Error::InvalidStartLoc);
        }

        if start == -1 {
            self.write_append(id, buf)
        } else {
            self.write_overwrite(id, start as usize, buf)
        }
    }

    fn write_overwrite(&mut self, id: FileId, start: usize, buf: &[u8]) -> Result<()> {
        let length = buf.len();
        let size = self.files[id as usize].size as usize;
        if start + length > size {
            return Err(Error::NotEnoughData);
        }
        if length == 0 {
            return Ok(());
        }

        let end = start + length;
        if start / BLOCK_SIZE != (end - 1) / BLOCK_SIZE {
            return Err(Error::BlockFault);
        }

        let block_id = self.files[id as usize].blocks[start / BLOCK_SIZE];
        self.overlay_block(block_id, start % BLOCK_SIZE, buf)
    }

    fn write_append(&mut self, id: FileId, buf: &[u8]) -> Result<()> {
        let length = buf.len();
        let start = self.files[id as usize].size as usize;

        if length == 0 {
            return Ok(());
        }

        let end = start + length;
        if start / BLOCK_SIZE != (end - 1) / BLOCK_SIZE {
            return Err(Error::BlockFault);
        }
        if start >= BLOCK_SIZE * MAX_BLOCKS_PER_FILE {
            return Err(Error::FileFull);
        }

        let block_index = start / BLOCK_SIZE;
        let mut block_id = self.files[id as usize].blocks[block_index];
        if block_id == NO_BLOCK {
            block_id = self.allocate_block(id, block_index)?;
        }

        self.overlay_block(block_id, start % BLOCK_SIZE, buf)?;

        self.files[id as usize].size += length as u32;
        self.save_fcb(id)?;
        Ok(())
    }

    /// Reads block `block_id`, overlays `buf` at `offset`, writes it back.
    ///
    /// Relies on the invariant that every free block holds only zero bytes
    /// (enforced by `delete` and by formatting): a freshly-allocated block
    /// therefore reads back as zero without special-casing.
    fn overlay_block(&mut self, block_id: BlockId, offset: usize, buf: &[u8]) -> Result<()> {
        let mut block_buf = [0u8; BLOCK_SIZE];
        self.read_block(block_id, &mut block_buf)?;
        block_buf[offset..offset + buf.len()].copy_from_slice(buf);
        self.write_block(block_id, &block_buf)
    }

    fn allocate_block(&mut self, id: FileId, block_index: usize) -> Result<BlockId> {
        let block_id = self
            .free_blocks
            .iter()
            .position(|&free| free)
            .ok_or(Error::NoMoreBlocks)? as BlockId;
        self.free_blocks[block_id as usize] = false;
        self.files[id as usize].blocks[block_index] = block_id;
        Ok(block_id)
    }

    // ---- getsize / gettype -------------------------------------------------

    /// For a data file, its byte length; for a directory, its child count.
    pub fn getsize(&self, path: &str) -> Result<u32> {
        let id = self.find_by_path(path)?;
        Ok(self.files[id as usize].size)
    }

    /// Whether `path` names a data file or a directory.
    pub fn gettype(&self, path: &str) -> Result<FileKind> {
        let id = self.find_by_path(path)?;
        Ok(self.files[id as usize].kind)
    }

    // ---- persistence helpers -----------------------------------------

    fn save_fcb(&mut self, id: FileId) -> Result<()> {
        let block_id = block_of(id);
        let offset = offset_of(id);
        let bytes = self.files[id as usize].to_bytes();

        let mut block_buf = [0u8; BLOCK_SIZE];
        self.read_block(block_id, &mut block_buf)?;
        block_buf[offset..offset + FCB_SIZE].copy_from_slice(&bytes);
        self.write_block(block_id, &block_buf)
    }

    fn read_block(&mut self, id: BlockId, buf: &mut [u8; BLOCK_SIZE]) -> Result<()> {
        self.device.get_block(id, buf).map_err(|_| Error::BlockIo)
    }

    fn write_block(&mut self, id: BlockId, buf: &[u8; BLOCK_SIZE]) -> Result<()> {
        self.device.put_block(id, buf).map_err(|_| Error::BlockIo)
    }
}

fn fcb_block_count() -> usize {
    let mut n = MAX_FILES / FCBS_PER_BLOCK;
    if MAX_FILES % FCBS_PER_BLOCK != 0 {
        n += 1;
    }
    n
}

fn block_of(id: FileId) -> BlockId {
    1 + (id as usize / FCBS_PER_BLOCK) as BlockId
}

fn offset_of(id: FileId) -> usize {
    (id as usize % FCBS_PER_BLOCK) * FCB_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::MemoryBlockDevice;

    fn mounted() -> FileSystem<MemoryBlockDevice> {
        let mut fs = FileSystem::new(MemoryBlockDevice::new());
        fs.initialize(true).unwrap();
        fs
    }

    #[test]
    fn s1_fresh_filesystem_is_an_empty_root_dir() {
        let fs = mounted();
        assert_eq!(fs.getsize("/").unwrap(), 0);
        assert_eq!(fs.gettype("/").unwrap(), FileKind::Dir);
    }

    #[test]
    fn s2_create_adds_a_child_and_updates_parent_size() {
        let mut fs = mounted();
        fs.create("/test", FileKind::Data).unwrap();
        assert_eq!(fs.getsize("/").unwrap(), 1);
        assert_eq!(fs.gettype("/test").unwrap(), FileKind::Data);
        assert_eq!(fs.getsize("/test").unwrap(), 0);
    }

    #[test]
    fn s3_write_then_read_round_trips_and_rejects_over_read() {
        let mut fs = mounted();
        fs.create("/test", FileKind::Data).unwrap();
        let fd = fs.open("/test").unwrap();
        fs.write(fd, -1, b"ABCD").unwrap();
        assert_eq!(fs.getsize("/test").unwrap(), 4);

        let mut buf = [0u8; 4];
        fs.read(fd, 0, &mut buf).unwrap();
        assert_eq!(&buf, b"ABCD");

        let mut too_big = [0u8; 5];
        assert_eq!(fs.read(fd, 0, &mut too_big), Err(Error::NotEnoughData));
    }

    #[test]
    fn s4_delete_root_and_nonempty_dir_rules() {
        let mut fs = mounted();
        assert_eq!(fs.delete("/"), Err(Error::CantDeleteRoot));

        fs.create("/a", FileKind::Dir).unwrap();
        fs.create("/a/b", FileKind::Data).unwrap();
        assert_eq!(fs.delete("/a"), Err(Error::DirNotEmpty));

        fs.delete("/a/b").unwrap();
        fs.delete("/a").unwrap();
        assert_eq!(fs.gettype("/a"), Err(Error::FileNotFound));
    }

    #[test]
    fn s5_same_file_opened_twice_closes_independently() {
        let mut fs = mounted();
        fs.create("/f", FileKind::Data).unwrap();
        let fd1 = fs.open("/f").unwrap();
        let fd2 = fs.open("/f").unwrap();
        assert_ne!(fd1, fd2);

        fs.close(fd1).unwrap();
        assert_eq!(fs.close(fd1), Err(Error::BadFd));
        fs.close(fd2).unwrap();
    }

    #[test]
    fn s6_readdir_yields_children_in_order_then_none() {
        let mut fs = mounted();
        fs.create("/d", FileKind::Dir).unwrap();
        fs.create("/d/x", FileKind::Data).unwrap();
        fs.create("/d/y", FileKind::Data).unwrap();

        let dfd = fs.open("/d").unwrap();
        assert_eq!(fs.readdir(dfd).unwrap(), Some("x".to_string()));
        assert_eq!(fs.readdir(dfd).unwrap(), Some("y".to_string()));
        assert_eq!(fs.readdir(dfd).unwrap(), None);

        let ffd = fs.open("/d/x").unwrap();
        assert_eq!(fs.readdir(ffd), Err(Error::BadFileType));
    }

    #[test]
    fn path_component_at_the_limit_succeeds_one_over_fails() {
        let mut fs = mounted();
        fs.create("/abcdef", FileKind::Data).unwrap();
        assert_eq!(
            fs.create("/abcdefg", FileKind::Data),
            Err(Error::InvalidName)
        );
    }

    #[test]
    fn read_start_equal_size_with_zero_length_succeeds() {
        let mut fs = mounted();
        fs.create("/f", FileKind::Data).unwrap();
        let fd = fs.open("/f").unwrap();
        fs.write(fd, -1, b"hi").unwrap();
        fs.read(fd, 2, &mut []).unwrap();
    }

    #[test]
    fn append_fills_last_block_then_file_full() {
        let mut fs = mounted();
        fs.create("/f", FileKind::Data).unwrap();
        let fd = fs.open("/f").unwrap();
        let max = BLOCK_SIZE * MAX_BLOCKS_PER_FILE;
        let chunk = vec![0xAAu8; BLOCK_SIZE];
        for _ in 0..MAX_BLOCKS_PER_FILE {
            fs.write(fd, -1, &chunk).unwrap();
        }
        assert_eq!(fs.getsize("/f").unwrap() as usize, max);
        assert_eq!(fs.write(fd, -1, &[0u8]), Err(Error::FileFull));
    }

    #[test]
    fn write_across_block_boundary_is_rejected_without_mutation() {
        let mut fs = mounted();
        fs.create("/f", FileKind::Data).unwrap();
        let fd = fs.open("/f").unwrap();
        fs.write(fd, -1, &vec![0u8; BLOCK_SIZE - 1]).unwrap();

        let straddling = vec![0u8; 2];
        assert_eq!(fs.write(fd, -1, &straddling), Err(Error::BlockFault));
        assert_eq!(fs.getsize("/f").unwrap() as usize, BLOCK_SIZE - 1);
    }

    #[test]
    fn create_on_existing_path_is_name_taken() {
        let mut fs = mounted();
        fs.create("/f", FileKind::Data).unwrap();
        assert_eq!(fs.create("/f", FileKind::Dir), Err(Error::NameTaken));
    }

    #[test]
    fn create_under_a_data_file_is_bad_file_type() {
        let mut fs = mounted();
        fs.create("/f", FileKind::Data).unwrap();
        assert_eq!(
            fs.create("/f/x", FileKind::Data),
            Err(Error::BadFileType)
        );
    }

    #[test]
    fn delete_while_open_is_rejected() {
        let mut fs = mounted();
        fs.create("/f", FileKind::Data).unwrap();
        let _fd = fs.open("/f").unwrap();
        assert_eq!(fs.delete("/f"), Err(Error::FileOpen));
    }

    #[test]
    fn overwrite_mode_rejects_out_of_range_start() {
        let mut fs = mounted();
        fs.create("/f", FileKind::Data).unwrap();
        let fd = fs.open("/f").unwrap();
        fs.write(fd, -1, b"abc").unwrap();
        assert_eq!(fs.write(fd, 1, b"xxx"), Err(Error::NotEnoughData));
    }

    #[test]
    fn reopening_a_directory_restarts_iteration() {
        let mut fs = mounted();
        fs.create("/d", FileKind::Dir).unwrap();
        fs.create("/d/x", FileKind::Data).unwrap();

        let dfd = fs.open("/d").unwrap();
        assert_eq!(fs.readdir(dfd).unwrap(), Some("x".to_string()));
        assert_eq!(fs.readdir(dfd).unwrap(), None);

        // Creating a new child mid-iteration resets every cursor into /d.
        fs.create("/d/y", FileKind::Data).unwrap();
        assert_eq!(fs.readdir(dfd).unwrap(), Some("x".to_string()));
    }

    #[test]
    fn reinitialize_then_mount_preserves_created_files() {
        let mut fs = mounted();
        fs.create("/f", FileKind::Data).unwrap();
        let fd = fs.open("/f").unwrap();
        fs.write(fd, -1, b"hello").unwrap();
        fs.close(fd).unwrap();

        fs.initialize(false).unwrap();

        assert_eq!(fs.gettype("/f").unwrap(), FileKind::Data);
        assert_eq!(fs.getsize("/f").unwrap(), 5);
        let fd = fs.open("/f").unwrap();
        let mut buf = [0u8; 5];
        fs.read(fd, 0, &mut buf).unwrap();
        assert_eq!(&buf, b"hello");
    }

    #[test]
    fn p5_reinitialize_without_erase_is_idempotent_on_disk() {
        let mut fs = mounted();
        fs.create("/f", FileKind::Data).unwrap();
        fs.create("/d", FileKind::Dir).unwrap();

        fs.initialize(false).unwrap();
        let device = fs.into_device();

        let mut fs2 = FileSystem::new(device);
        fs2.initialize(false).unwrap();
        let mut before = fs2.into_device();

        let mut fs3 = FileSystem::new(before.clone());
        fs3.initialize(false).unwrap();
        let mut after = fs3.into_device();

        let mut a = [0u8; BLOCK_SIZE];
        let mut b = [0u8; BLOCK_SIZE];
        for block in 0..MAX_BLOCKS as BlockId {
            before.get_block(block, &mut a).unwrap();
            after.get_block(block, &mut b).unwrap();
            assert_eq!(a, b, "block {block} changed across a no-op mount");
        }
    }

    #[test]
    fn remount_survives_a_file_filled_to_exact_block_multiples() {
        let mut fs = mounted();
        fs.create("/f", FileKind::Data).unwrap();
        let fd = fs.open("/f").unwrap();
        let chunk = vec![0x42u8; BLOCK_SIZE];
        fs.write(fd, -1, &chunk).unwrap();
        assert_eq!(fs.getsize("/f").unwrap() as usize, BLOCK_SIZE);

        // Exactly one full block in use; a literal `size/BLOCK_SIZE+1`
        // block-count check would wrongly demand two.
        fs.initialize(false).unwrap();
        assert_eq!(fs.getsize("/f").unwrap() as usize, BLOCK_SIZE);

        let fd = fs.open("/f").unwrap();
        fs.write(fd, -1, &chunk).unwrap();
        fs.write(fd, -1, &chunk).unwrap();
        fs.write(fd, -1, &chunk).unwrap();
        assert_eq!(
            fs.getsize("/f").unwrap() as usize,
            BLOCK_SIZE * MAX_BLOCKS_PER_FILE
        );
        fs.initialize(false).unwrap();
        assert_eq!(
            fs.getsize("/f").unwrap() as usize,
            BLOCK_SIZE * MAX_BLOCKS_PER_FILE
        );
    }

    #[test]
    fn double_slash_path_is_invalid() {
        let fs = mounted();
        assert_eq!(fs.gettype("//x"), Err(Error::InvalidPath));
    }
}
