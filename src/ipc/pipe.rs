use crate::data_structures::ring_buffer::RingBuffer;
use super::error::{IpcError, IpcResult};
use super::table::{Handle, Table};

pub const PIPE_BUFFER_SIZE: usize = 4096;
pub const MAX_PIPES: usize = 64;

/// A fixed-capacity byte pipe. `pipe_open` hands both ends the same
/// handle; callers distinguish read from write by which method they
/// call, not by which handle they hold. `ref_count` starts at 2 (one
/// for each end); the buffer is freed only once both ends have closed.
struct Pipe {
    buffer: RingBuffer<u8, PIPE_BUFFER_SIZE>,
    ref_count: u32,
}

impl Pipe {
    fn new() -> Self {
        Self {
            buffer: RingBuffer::new(),
            ref_count: 2,
        }
    }

    /// Writes as much of `data` as fits, returning the number of bytes
    /// accepted. Never blocks; a full buffer yields a short write.
    fn write(&mut self, data: &[u8]) -> usize {
        let mut written = 0;
        for &byte in data {
            if !self.buffer.push_back(byte) {
                break;
            }
            written += 1;
        }
        written
    }

    /// Reads up to `out.len()` bytes, returning the number actually read.
    fn read(&mut self, out: &mut [u8]) -> usize {
        let mut count = 0;
        for slot in out.iter_mut() {
            match self.buffer.pop_front() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        count
    }
}

#[derive(Default)]
pub struct PipeTable {
    pipes: Table<Pipe, MAX_PIPES>,
}

impl PipeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self) -> IpcResult<Handle> {
        self.pipes.insert(Pipe::new())
    }

    pub fn write(&mut self, handle: Handle, data: &[u8]) -> IpcResult<usize> {
        Ok(self.pipes.get_mut(handle)?.write(data))
    }

    pub fn read(&mut self, handle: Handle, out: &mut [u8]) -> IpcResult<usize> {
        Ok(self.pipes.get_mut(handle)?.read(out))
    }

    /// Decrements `ref_count`; only frees the buffer and the table slot
    /// once both ends have closed (§4.7, Data-Model `Pipe` invariant).
    pub fn close(&mut self, handle: Handle) -> IpcResult<()> {
        let pipe = self.pipes.get_mut(handle).map_err(|_| IpcError::NotFound)?;
        pipe.ref_count -= 1;
        if pipe.ref_count == 0 {
            self.pipes.remove(handle).map(|_| ()).map_err(|_| IpcError::NotFound)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case]
    fn write_then_read_preserves_order() {
        let mut pipes = PipeTable::new();
        let handle = pipes.open().unwrap();
        assert_eq!(pipes.write(handle, b"abc").unwrap(), 3);
        let mut out = [0u8; 3];
        assert_eq!(pipes.read(handle, &mut out).unwrap(), 3);
        assert_eq!(&out, b"abc");
    }

    #[test_case]
    fn write_beyond_capacity_short_writes() {
        let mut pipes = PipeTable::new();
        let handle = pipes.open().unwrap();
        let data = alloc::vec![1u8; PIPE_BUFFER_SIZE + 10];
        let written = pipes.write(handle, &data).unwrap();
        assert_eq!(written, PIPE_BUFFER_SIZE);
    }

    #[test_case]
    fn read_from_empty_pipe_returns_zero() {
        let mut pipes = PipeTable::new();
        let handle = pipes.open().unwrap();
        let mut out = [0u8; 4];
        assert_eq!(pipes.read(handle, &mut out).unwrap(), 0);
    }

    #[test_case]
    fn closing_one_end_keeps_the_pipe_alive() {
        let mut pipes = PipeTable::new();
        let handle = pipes.open().unwrap();
        pipes.write(handle, b"x").unwrap();
        pipes.close(handle).unwrap();
        let mut out = [0u8; 1];
        assert_eq!(pipes.read(handle, &mut out).unwrap(), 1);
        assert_eq!(&out, b"x");
    }

    #[test_case]
    fn closing_both_ends_frees_the_pipe() {
        let mut pipes = PipeTable::new();
        let handle = pipes.open().unwrap();
        pipes.close(handle).unwrap();
        pipes.close(handle).unwrap();
        assert!(pipes.write(handle, b"x").is_err());
        assert!(pipes.read(handle, &mut [0u8; 1]).is_err());
    }

    #[test_case]
    fn closing_beyond_the_refcount_fails() {
        let mut pipes = PipeTable::new();
        let handle = pipes.open().unwrap();
        pipes.close(handle).unwrap();
        pipes.close(handle).unwrap();
        assert!(pipes.close(handle).is_err());
    }
}
