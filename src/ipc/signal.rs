use alloc::boxed::Box;
use alloc::vec::Vec;
use super::error::{IpcError, IpcResult};

pub const MAX_SIGNALS: usize = 32;

pub type SignalHandler = Box<dyn Fn(u32) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    Blocked,
    Pending,
    Delivered,
}

/// Per-process (modeled here as a single global instance) signal state:
/// a handler table, a mask, and a delivery state per signal number.
pub struct SignalState {
    handlers: Vec<Option<SignalHandler>>,
    masked: [bool; MAX_SIGNALS],
    pending: [bool; MAX_SIGNALS],
    delivery: [DeliveryState; MAX_SIGNALS],
}

impl SignalState {
    pub fn new() -> Self {
        let mut handlers = Vec::with_capacity(MAX_SIGNALS);
        for _ in 0..MAX_SIGNALS {
            handlers.push(None);
        }
        Self {
            handlers,
            masked: [false; MAX_SIGNALS],
            pending: [false; MAX_SIGNALS],
            delivery: [DeliveryState::Delivered; MAX_SIGNALS],
        }
    }

    pub fn register(&mut self, sig: usize, handler: SignalHandler) -> IpcResult<()> {
        let slot = self.handlers.get_mut(sig).ok_or(IpcError::InvalidArgument)?;
        *slot = Some(handler);
        Ok(())
    }

    pub fn mask(&mut self, sig: usize) -> IpcResult<()> {
        *self.masked.get_mut(sig).ok_or(IpcError::InvalidArgument)? = true;
        Ok(())
    }

    pub fn unmask(&mut self, sig: usize) -> IpcResult<()> {
        let slot = self.masked.get_mut(sig).ok_or(IpcError::InvalidArgument)?;
        *slot = false;
        if self.pending.get(sig).copied().unwrap_or(false) {
            self.dispatch(sig)?;
        }
        Ok(())
    }

    pub fn set_mask(&mut self, mask: &[bool; MAX_SIGNALS]) {
        self.masked = *mask;
    }

    pub fn get_mask(&self) -> [bool; MAX_SIGNALS] {
        self.masked
    }

    pub fn delivery_state(&self, sig: usize) -> Option<DeliveryState> {
        self.delivery.get(sig).copied()
    }

    pub fn is_pending(&self, sig: usize) -> bool {
        self.pending.get(sig).copied().unwrap_or(false)
    }

    /// Sends `sig`. If masked, the signal is recorded pending rather than
    /// delivered. Otherwise it is dispatched immediately.
    pub fn send(&mut self, sig: usize) -> IpcResult<()> {
        if sig >= MAX_SIGNALS {
            return Err(IpcError::InvalidArgument);
        }
        if self.masked[sig] {
            self.pending[sig] = true;
            self.delivery[sig] = DeliveryState::Blocked;
            Ok(())
        } else {
            self.dispatch(sig)
        }
    }

    fn dispatch(&mut self, sig: usize) -> IpcResult<()> {
        let handler = self.handlers.get(sig).ok_or(IpcError::InvalidArgument)?;
        self.pending[sig] = false;
        self.delivery[sig] = DeliveryState::Delivered;
        if let Some(handler) = handler {
            handler(sig as u32);
        }
        Ok(())
    }

    /// Dispatches every pending, unmasked signal in ascending signal-number
    /// order. Used when several signals become unmasked at once.
    pub fn dispatch_pending_in_order(&mut self) -> IpcResult<()> {
        for sig in 0..MAX_SIGNALS {
            if self.pending[sig] && !self.masked[sig] {
                self.dispatch(sig)?;
            }
        }
        Ok(())
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    #[test_case]
    fn masked_signal_stays_pending_until_unmasked() {
        static COUNT: AtomicU32 = AtomicU32::new(0);
        let mut state = SignalState::new();
        state.register(10, Box::new(|_| { COUNT.fetch_add(1, Ordering::SeqCst); })).unwrap();
        state.mask(10).unwrap();
        state.send(10).unwrap();
        assert!(state.is_pending(10));
        assert_eq!(state.delivery_state(10), Some(DeliveryState::Blocked));
        assert_eq!(COUNT.load(Ordering::SeqCst), 0);

        state.unmask(10).unwrap();
        assert_eq!(COUNT.load(Ordering::SeqCst), 1);
        assert!(!state.is_pending(10));
    }

    #[test_case]
    fn second_unmask_does_not_redeliver() {
        static COUNT: AtomicU32 = AtomicU32::new(0);
        let mut state = SignalState::new();
        state.register(5, Box::new(|_| { COUNT.fetch_add(1, Ordering::SeqCst); })).unwrap();
        state.mask(5).unwrap();
        state.send(5).unwrap();
        state.unmask(5).unwrap();
        state.unmask(5).unwrap();
        assert_eq!(COUNT.load(Ordering::SeqCst), 1);
    }

    #[test_case]
    fn unmasked_signal_delivers_immediately() {
        static COUNT: AtomicU32 = AtomicU32::new(0);
        let mut state = SignalState::new();
        state.register(1, Box::new(|_| { COUNT.fetch_add(1, Ordering::SeqCst); })).unwrap();
        state.send(1).unwrap();
        assert_eq!(COUNT.load(Ordering::SeqCst), 1);
        assert!(!state.is_pending(1));
    }

    #[test_case]
    fn out_of_range_signal_is_rejected() {
        let mut state = SignalState::new();
        assert!(state.send(MAX_SIGNALS).is_err());
        assert!(state.mask(MAX_SIGNALS).is_err());
    }
}
