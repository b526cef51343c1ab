//! A minimal on-disk array format, read through a memory map.
//!
//! Layout (all integers little-endian):
//!
//! | bytes        | content                                  |
//! |--------------|------------------------------------------|
//! | 4            | magic `SLAB`                             |
//! | 1            | format version                           |
//! | 1            | element type code ([`ElementType::code`])|
//! | 1            | rank `R`                                 |
//! | `8 * R`      | extents, storage axis order, `u64`       |
//! | rest         | elements, row-major                      |

use std::fs::File;
use std::io::{
    BufWriter,
    Write,
};
use std::path::{
    Path,
    PathBuf,
};

use anyhow::{
    anyhow,
    bail,
    ensure,
    Context,
};
use log::debug;
use memmap2::Mmap;

use super::space::{
    gather,
    SlabSpace,
};
use super::store::{
    ArrayStore,
    Dataspace,
};
use crate::data_structs::{
    Element,
    ElementType,
};

pub const MAGIC: &[u8; 4] = b"SLAB";
pub const VERSION: u8 = 1;

const FIXED_HEADER_LEN: usize = 7;

fn header_len(rank: usize) -> usize {
    FIXED_HEADER_LEN + 8 * rank
}

fn data_len(
    dims: &[u64],
    dtype: ElementType,
) -> Option<u64> {
    dims.iter()
        .try_fold(dtype.size() as u64, |acc, d| acc.checked_mul(*d))
}

/// A raw array file opened for reading.
#[derive(Debug)]
pub struct RawArrayFile {
    path:  PathBuf,
    dims:  Vec<u64>,
    dtype: ElementType,
    mmap:  Mmap,
}

impl RawArrayFile {
    /// Maps the file at `path` and validates its header and length.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        let mmap = unsafe { Mmap::map(&file)? };
        let data = &mmap[..];

        ensure!(
            data.len() >= FIXED_HEADER_LEN && &data[..4] == MAGIC,
            "{} is not a raw array file",
            path.display()
        );
        ensure!(
            data[4] == VERSION,
            "unsupported raw array version {} (expected {})",
            data[4],
            VERSION
        );
        let dtype = ElementType::from_code(data[5])
            .ok_or_else(|| anyhow!("unknown element type code {}", data[5]))?;
        let rank = data[6] as usize;
        ensure!(
            data.len() >= header_len(rank),
            "header truncated: rank {} needs {} bytes, file has {}",
            rank,
            header_len(rank),
            data.len()
        );

        let dims = data[FIXED_HEADER_LEN..header_len(rank)]
            .chunks_exact(8)
            .map(|chunk| {
                let mut word = [0u8; 8];
                word.copy_from_slice(chunk);
                u64::from_le_bytes(word)
            })
            .collect::<Vec<_>>();

        let expected = data_len(&dims, dtype)
            .ok_or_else(|| anyhow!("array of extents {:?} is too large", dims))?;
        let actual = (data.len() - header_len(rank)) as u64;
        if actual != expected {
            bail!(
                "data section of {} is {} bytes, extents {:?} of {} need {}",
                path.display(),
                actual,
                dims,
                dtype,
                expected
            );
        }

        debug!(
            "Opened {}: extents {:?}, element type {}",
            path.display(),
            dims,
            dtype
        );
        Ok(Self {
            path,
            dims,
            dtype,
            mmap,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of elements.
    pub fn len(&self) -> u64 {
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn data(&self) -> &[u8] {
        &self.mmap[header_len(self.dims.len())..]
    }
}

impl ArrayStore for RawArrayFile {
    type Space = SlabSpace;

    fn dims(&self) -> anyhow::Result<Vec<u64>> {
        Ok(self.dims.clone())
    }

    fn element_type(&self) -> ElementType {
        self.dtype
    }

    fn file_space(&self) -> anyhow::Result<SlabSpace> {
        let mut space = SlabSpace::new(&self.dims);
        space.select_all()?;
        Ok(space)
    }

    fn mem_space(
        &self,
        dims: &[u64],
    ) -> anyhow::Result<SlabSpace> {
        let mut space = SlabSpace::new(dims);
        space.select_all()?;
        Ok(space)
    }

    fn read_into<T: Element>(
        &self,
        mem: &SlabSpace,
        file: &SlabSpace,
        buf: &mut [T],
    ) -> anyhow::Result<()> {
        ensure!(
            file.dims() == self.dims.as_slice(),
            "source space extents {:?} do not match {:?} of {}",
            file.dims(),
            self.dims,
            self.path.display()
        );
        gather(self.data(), self.dtype, mem, file, buf)
    }
}

/// Writes a raw array file element by element, in row-major order.
pub struct RawArrayWriter {
    writer:   BufWriter<File>,
    dtype:    ElementType,
    expected: u64,
    written:  u64,
    scratch:  Vec<u8>,
}

impl RawArrayWriter {
    /// Creates (or truncates) `path` and writes the header.
    pub fn create<P: AsRef<Path>>(
        path: P,
        dims: &[u64],
        dtype: ElementType,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let rank = u8::try_from(dims.len())
            .map_err(|_| anyhow!("rank {} is not supported", dims.len()))?;
        let expected = data_len(dims, dtype)
            .ok_or_else(|| anyhow!("array of extents {:?} is too large", dims))?
            / dtype.size() as u64;

        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(MAGIC)?;
        writer.write_all(&[VERSION, dtype.code(), rank])?;
        for dim in dims {
            writer.write_all(&dim.to_le_bytes())?;
        }

        Ok(Self {
            writer,
            dtype,
            expected,
            written: 0,
            scratch: Vec::new(),
        })
    }

    pub fn element_type(&self) -> ElementType {
        self.dtype
    }

    /// Appends `values`, converted to the file's element type.
    pub fn write_slice<T: Element>(
        &mut self,
        values: &[T],
    ) -> anyhow::Result<()> {
        ensure!(
            self.written + values.len() as u64 <= self.expected,
            "writing {} more elements would exceed the {} declared",
            values.len(),
            self.expected
        );
        self.scratch.clear();
        for (i, value) in values.iter().enumerate() {
            self.dtype
                .encode(*value, &mut self.scratch)
                .ok_or_else(|| {
                    anyhow!(
                        "element {} ({:?}) is not representable as {}",
                        self.written + i as u64,
                        value,
                        self.dtype
                    )
                })?;
        }
        self.writer.write_all(&self.scratch)?;
        self.written += values.len() as u64;
        Ok(())
    }

    /// Flushes the file, failing if fewer elements than declared were written.
    pub fn finish(mut self) -> anyhow::Result<()> {
        ensure!(
            self.written == self.expected,
            "{} of {} elements written",
            self.written,
            self.expected
        );
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_then_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.slab");

        let mut writer = RawArrayWriter::create(&path, &[2, 3], ElementType::I32).unwrap();
        writer.write_slice(&[0i64, 1, 2]).unwrap();
        writer.write_slice(&[3i64, 4, 5]).unwrap();
        writer.finish().unwrap();

        let file = RawArrayFile::open(&path).unwrap();
        assert_eq!(file.dims().unwrap(), vec![2, 3]);
        assert_eq!(file.element_type(), ElementType::I32);
        assert_eq!(file.len(), 6);

        let mut source = file.file_space().unwrap();
        source.select_none().unwrap();
        source.select_hyperslab_or(&[1, 1], &[1, 2]).unwrap();
        let dest = file.mem_space(&[2]).unwrap();
        let mut buf = vec![0f32; 2];
        file.read_into(&dest, &source, &mut buf).unwrap();
        assert_eq!(buf, vec![4.0, 5.0]);
    }

    #[test]
    fn test_short_write_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.slab");
        let mut writer = RawArrayWriter::create(&path, &[4], ElementType::U8).unwrap();
        writer.write_slice(&[1u8, 2]).unwrap();
        assert!(writer.finish().is_err());
        // The header promises 4 elements, the data section holds 2.
        assert!(RawArrayFile::open(&path).is_err());
    }

    #[test]
    fn test_unrepresentable_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("u8.slab");
        let mut writer = RawArrayWriter::create(&path, &[1], ElementType::U8).unwrap();
        assert!(writer.write_slice(&[300i32]).is_err());
    }

    #[test]
    fn test_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.slab");
        std::fs::write(&path, b"NOPE\x01\x01\x00").unwrap();
        let err = RawArrayFile::open(&path).unwrap_err();
        assert!(err.to_string().contains("not a raw array file"));
    }
}
