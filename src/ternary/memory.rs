use alloc::vec;
use alloc::vec::Vec;
use super::trit::Trit;

/// A linear array of trits with a trivial first-fit bump allocator layered
/// on top. Allocated cells are marked `Pos`; free cells are `Neu`. This
/// means a region can only be allocated from cells that have never been
/// written to with a non-neutral value by other means.
pub struct TernaryMemory {
    cells: Vec<Trit>,
    read_only: bool,
    used: usize,
}

impl TernaryMemory {
    pub fn new(size: usize) -> Self {
        Self {
            cells: vec![Trit::Neu; size],
            read_only: false,
            used: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn used(&self) -> usize {
        self.used
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn read(&self, addr: usize) -> Trit {
        self.cells.get(addr).copied().unwrap_or(Trit::Unknown)
    }

    pub fn write(&mut self, addr: usize, value: Trit) -> bool {
        if self.read_only || !value.is_valid() {
            return false;
        }
        match self.cells.get_mut(addr) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn read_block(&self, addr: usize, len: usize) -> Option<Vec<Trit>> {
        self.cells.get(addr..addr.checked_add(len)?).map(|s| s.to_vec())
    }

    pub fn write_block(&mut self, addr: usize, data: &[Trit]) -> bool {
        if self.read_only {
            return false;
        }
        let Some(end) = addr.checked_add(data.len()) else {
            return false;
        };
        if end > self.cells.len() {
            return false;
        }
        self.cells[addr..end].copy_from_slice(data);
        true
    }

    /// Copies `len` trits from `src[src_addr..]` into `self[dst_addr..]`.
    pub fn copy_from(&mut self, src: &TernaryMemory, src_addr: usize, dst_addr: usize, len: usize) -> bool {
        if self.read_only {
            return false;
        }
        if src_addr + len > src.cells.len() || dst_addr + len > self.cells.len() {
            return false;
        }
        let data = src.cells[src_addr..src_addr + len].to_vec();
        self.cells[dst_addr..dst_addr + len].copy_from_slice(&data);
        true
    }

    /// Overlap-safe move within the same memory.
    pub fn move_within(&mut self, src_addr: usize, dst_addr: usize, len: usize) -> bool {
        if self.read_only {
            return false;
        }
        if src_addr + len > self.cells.len() || dst_addr + len > self.cells.len() {
            return false;
        }
        let staged = self.cells[src_addr..src_addr + len].to_vec();
        self.cells[dst_addr..dst_addr + len].copy_from_slice(&staged);
        true
    }

    pub fn fill(&mut self, addr: usize, len: usize, value: Trit) -> bool {
        if self.read_only || !value.is_valid() {
            return false;
        }
        if addr + len > self.cells.len() {
            return false;
        }
        for slot in &mut self.cells[addr..addr + len] {
            *slot = value;
        }
        true
    }

    pub fn find_trit(&self, start: usize, value: Trit) -> Option<usize> {
        self.cells
            .get(start..)?
            .iter()
            .position(|&t| t == value)
            .map(|i| i + start)
    }

    pub fn find_pattern(&self, start: usize, pattern: &[Trit]) -> Option<usize> {
        if pattern.is_empty() || start >= self.cells.len() {
            return None;
        }
        self.cells[start..]
            .windows(pattern.len())
            .position(|window| window == pattern)
            .map(|i| i + start)
    }

    /// First-fit scan for a run of `size` neutral cells; marks them `Pos`
    /// on success.
    pub fn allocate(&mut self, size: usize) -> Option<usize> {
        if size == 0 || self.read_only {
            return None;
        }
        let mut run_start = None;
        let mut run_len = 0usize;
        for i in 0..self.cells.len() {
            if self.cells[i] == Trit::Neu {
                if run_start.is_none() {
                    run_start = Some(i);
                }
                run_len += 1;
                if run_len == size {
                    let start = run_start.unwrap();
                    for slot in &mut self.cells[start..start + size] {
                        *slot = Trit::Pos;
                    }
                    self.used += size;
                    return Some(start);
                }
            } else {
                run_start = None;
                run_len = 0;
            }
        }
        None
    }

    pub fn deallocate(&mut self, addr: usize, size: usize) -> bool {
        if self.read_only || addr + size > self.cells.len() {
            return false;
        }
        for slot in &mut self.cells[addr..addr + size] {
            *slot = Trit::Neu;
        }
        self.used = self.used.saturating_sub(size);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case]
    fn write_then_read_round_trips() {
        let mut mem = TernaryMemory::new(4);
        assert!(mem.write(1, Trit::Pos));
        assert_eq!(mem.read(1), Trit::Pos);
    }

    #[test_case]
    fn read_only_rejects_writes() {
        let mut mem = TernaryMemory::new(4);
        mem.set_read_only(true);
        assert!(!mem.write(0, Trit::Pos));
        assert_eq!(mem.read(0), Trit::Neu);
    }

    #[test_case]
    fn out_of_range_read_is_unknown() {
        let mem = TernaryMemory::new(2);
        assert_eq!(mem.read(10), Trit::Unknown);
    }

    #[test_case]
    fn allocate_marks_cells_positive_and_reusable_after_free() {
        let mut mem = TernaryMemory::new(8);
        let addr = mem.allocate(3).unwrap();
        assert_eq!(mem.read(addr), Trit::Pos);
        assert_eq!(mem.used(), 3);
        assert!(mem.deallocate(addr, 3));
        assert_eq!(mem.read(addr), Trit::Neu);
        assert_eq!(mem.used(), 0);
    }

    #[test_case]
    fn allocate_fails_when_no_run_is_large_enough() {
        let mut mem = TernaryMemory::new(2);
        mem.allocate(2).unwrap();
        assert_eq!(mem.allocate(1), None);
    }

    #[test_case]
    fn find_pattern_locates_subsequence() {
        let mut mem = TernaryMemory::new(5);
        mem.write(2, Trit::Pos);
        mem.write(3, Trit::Neg);
        let found = mem.find_pattern(0, &[Trit::Pos, Trit::Neg]);
        assert_eq!(found, Some(2));
    }

    #[test_case]
    fn move_within_handles_overlap() {
        let mut mem = TernaryMemory::new(5);
        mem.write(0, Trit::Pos);
        mem.write(1, Trit::Neg);
        assert!(mem.move_within(0, 1, 2));
        assert_eq!(mem.read(1), Trit::Pos);
        assert_eq!(mem.read(2), Trit::Neg);
    }
}
