use alloc::vec;
use alloc::vec::Vec;
use super::error::IpcResult;
use super::table::{Handle, Table};

pub const MAX_SHM_SEGMENTS: usize = 32;

struct Segment {
    data: Vec<u8>,
    ref_count: usize,
    cow: bool,
    write_count: usize,
}

/// Anonymous shared-memory segments with copy-on-write splitting. The
/// physical/virtual memory manager this would normally sit on is out of
/// scope; segments are backed directly by the kernel heap allocator.
#[derive(Default)]
pub struct ShmTable {
    segments: Table<Segment, MAX_SHM_SEGMENTS>,
}

impl ShmTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves a slot for a segment of `size` bytes. The name parameter
    /// IPC objects are conventionally opened with is accepted and ignored;
    /// there is no name-to-id registry.
    pub fn open(&mut self, size: usize) -> IpcResult<Handle> {
        self.segments.insert(Segment {
            data: vec![0u8; size],
            ref_count: 0,
            cow: true,
            write_count: 0,
        })
    }

    /// First `map` of a segment claims it directly. Every subsequent map
    /// duplicates the backing bytes into a fresh segment (copy-on-write)
    /// and returns its handle instead of aliasing the original.
    pub fn map(&mut self, handle: Handle) -> IpcResult<Handle> {
        let seg = self.segments.get_mut(handle)?;
        if seg.ref_count == 0 {
            seg.ref_count = 1;
            return Ok(handle);
        }
        if seg.cow {
            let data = seg.data.clone();
            seg.write_count += 1;
            self.segments.insert(Segment {
                data,
                ref_count: 1,
                cow: true,
                write_count: 0,
            })
        } else {
            seg.ref_count += 1;
            Ok(handle)
        }
    }

    pub fn read(&self, handle: Handle, offset: usize, out: &mut [u8]) -> IpcResult<usize> {
        let seg = self.segments.get(handle)?;
        let end = (offset + out.len()).min(seg.data.len());
        if offset >= end {
            return Ok(0);
        }
        let n = end - offset;
        out[..n].copy_from_slice(&seg.data[offset..end]);
        Ok(n)
    }

    pub fn write(&mut self, handle: Handle, offset: usize, data: &[u8]) -> IpcResult<usize> {
        let seg = self.segments.get_mut(handle)?;
        let end = (offset + data.len()).min(seg.data.len());
        if offset >= end {
            return Ok(0);
        }
        let n = end - offset;
        seg.data[offset..end].copy_from_slice(&data[..n]);
        Ok(n)
    }

    pub fn write_count(&self, handle: Handle) -> IpcResult<usize> {
        Ok(self.segments.get(handle)?.write_count)
    }

    pub fn unmap(&mut self, handle: Handle) -> IpcResult<()> {
        let seg = self.segments.get_mut(handle)?;
        seg.ref_count = seg.ref_count.saturating_sub(1);
        if seg.ref_count == 0 {
            self.segments.remove(handle)?;
        }
        Ok(())
    }

    /// Accepted, has no effect on identity: matches the documented source
    /// behavior where unlink never marks a segment unlinkable.
    pub fn unlink(&mut self, _name: &str) -> IpcResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case]
    fn map_then_write_then_read_round_trips() {
        let mut shm = ShmTable::new();
        let handle = shm.open(16).unwrap();
        let mapped = shm.map(handle).unwrap();
        assert_eq!(mapped, handle);
        shm.write(mapped, 0, b"hi").unwrap();
        let mut out = [0u8; 2];
        shm.read(mapped, 0, &mut out).unwrap();
        assert_eq!(&out, b"hi");
    }

    #[test_case]
    fn second_map_triggers_copy_on_write_split() {
        let mut shm = ShmTable::new();
        let original = shm.open(8).unwrap();
        let first = shm.map(original).unwrap();
        shm.write(first, 0, b"abcd").unwrap();
        let second = shm.map(original).unwrap();
        assert_ne!(second, first);
        let mut out = [0u8; 4];
        shm.read(second, 0, &mut out).unwrap();
        assert_eq!(&out, b"abcd");
        shm.write(second, 0, b"xxxx").unwrap();
        let mut original_view = [0u8; 4];
        shm.read(first, 0, &mut original_view).unwrap();
        assert_eq!(&original_view, b"abcd");
        assert_eq!(shm.write_count(original).unwrap(), 1);
    }

    #[test_case]
    fn unmap_to_zero_refcount_frees_slot() {
        let mut shm = ShmTable::new();
        let handle = shm.open(4).unwrap();
        shm.map(handle).unwrap();
        shm.unmap(handle).unwrap();
        assert!(shm.read(handle, 0, &mut [0u8; 1]).is_err());
    }
}
