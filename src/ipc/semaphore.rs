use super::error::{IpcError, IpcResult};
use super::table::{Handle, Table};
use crate::sched;

pub const MAX_SEMAPHORES: usize = 32;
const DEADLOCK_CHECK_INTERVAL: u32 = 1000;

struct Semaphore {
    value: i32,
    max_value: i32,
    wait_count: u32,
    deadlock_detected: bool,
}

/// Counting semaphores with a conservative, periodic deadlock probe. The
/// probe fires only when every live semaphore is simultaneously blocked,
/// which is sufficient to catch a total-system stall but not a cycle
/// among a subset of semaphores.
#[derive(Default)]
pub struct SemaphoreTable {
    semaphores: Table<Semaphore, MAX_SEMAPHORES>,
}

impl SemaphoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, initial_value: i32) -> IpcResult<Handle> {
        self.semaphores.insert(Semaphore {
            value: initial_value,
            max_value: initial_value,
            wait_count: 0,
            deadlock_detected: false,
        })
    }

    fn total_wait_count(&self) -> u32 {
        self.semaphores.iter().map(|(_, s)| s.wait_count).sum()
    }

    fn live_count(&self) -> u32 {
        self.semaphores.len() as u32
    }

    /// Returns true if a system-wide deadlock is indicated: every live
    /// semaphore's waiters sum to `total`, and this semaphore itself is
    /// both blocked and contributing to that sum.
    fn check_deadlock(&mut self, handle: Handle) -> bool {
        let total = self.total_wait_count();
        let live = self.live_count();
        let Ok(sem) = self.semaphores.get_mut(handle) else {
            return false;
        };
        if sem.value <= 0 && sem.wait_count > 0 && total > 0 && total == live {
            sem.deadlock_detected = true;
            true
        } else {
            false
        }
    }

    /// Spins until `value > 0`, then claims a unit. Returns `Deadlock` if
    /// the periodic probe detects a total-system stall, restoring
    /// `wait_count` before returning.
    pub fn wait(&mut self, handle: Handle) -> IpcResult<()> {
        {
            let sem = self.semaphores.get_mut(handle)?;
            sem.wait_count += 1;
        }
        let mut spins: u32 = 0;
        loop {
            let value = self.semaphores.get(handle)?.value;
            if value > 0 {
                break;
            }
            spins = spins.wrapping_add(1);
            if spins % DEADLOCK_CHECK_INTERVAL == 0 && self.check_deadlock(handle) {
                let sem = self.semaphores.get_mut(handle)?;
                sem.wait_count -= 1;
                return Err(IpcError::Deadlock);
            }
            sched::yield_now();
        }
        let sem = self.semaphores.get_mut(handle)?;
        sem.value -= 1;
        sem.wait_count -= 1;
        Ok(())
    }

    pub fn trywait(&mut self, handle: Handle) -> IpcResult<()> {
        let sem = self.semaphores.get_mut(handle)?;
        if sem.value <= 0 {
            return Err(IpcError::WouldBlock);
        }
        sem.value -= 1;
        Ok(())
    }

    pub fn post(&mut self, handle: Handle) -> IpcResult<()> {
        let sem = self.semaphores.get_mut(handle)?;
        if sem.value < sem.max_value {
            sem.value += 1;
        }
        Ok(())
    }

    pub fn value(&self, handle: Handle) -> IpcResult<i32> {
        Ok(self.semaphores.get(handle)?.value)
    }

    pub fn deadlock_detected(&self, handle: Handle) -> IpcResult<bool> {
        Ok(self.semaphores.get(handle)?.deadlock_detected)
    }

    pub fn close(&mut self, handle: Handle) -> IpcResult<()> {
        self.semaphores.remove(handle).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case]
    fn mutual_exclusion_round_trip() {
        let mut sems = SemaphoreTable::new();
        let handle = sems.open(1).unwrap();
        sems.wait(handle).unwrap();
        assert_eq!(sems.value(handle).unwrap(), 0);
        sems.post(handle).unwrap();
        assert_eq!(sems.value(handle).unwrap(), 1);
        sems.wait(handle).unwrap();
        assert_eq!(sems.value(handle).unwrap(), 0);
    }

    #[test_case]
    fn post_saturates_at_max_value() {
        let mut sems = SemaphoreTable::new();
        let handle = sems.open(1).unwrap();
        sems.post(handle).unwrap();
        assert_eq!(sems.value(handle).unwrap(), 1);
    }

    #[test_case]
    fn trywait_fails_without_blocking_when_empty() {
        let mut sems = SemaphoreTable::new();
        let handle = sems.open(0).unwrap();
        assert_eq!(sems.trywait(handle), Err(IpcError::WouldBlock));
    }

    #[test_case]
    fn deadlock_detected_when_only_live_semaphore_is_exhausted_and_waited_on() {
        let mut sems = SemaphoreTable::new();
        let handle = sems.open(0).unwrap();
        {
            let sem = sems.semaphores.get_mut(handle).unwrap();
            sem.wait_count = 1;
        }
        assert!(sems.check_deadlock(handle));
        assert!(sems.deadlock_detected(handle).unwrap());
    }
}
