use alloc::vec::Vec;
use super::error::{IpcError, IpcResult};
use super::table::{Handle, Table};

pub const MAX_QUEUES: usize = 16;

/// Priority encoding: high = -1, normal = 0, low = +1. Ascending numeric
/// order puts high-priority messages at the head of the queue.
pub type Priority = i8;

pub const PRIORITY_HIGH: Priority = -1;
pub const PRIORITY_NORMAL: Priority = 0;
pub const PRIORITY_LOW: Priority = 1;

struct Message {
    data: Vec<u8>,
    priority: Priority,
}

struct Queue {
    messages: Vec<Message>,
    max_messages: usize,
    max_message_size: usize,
}

/// Priority-ordered message queues. Insertion walks from the head,
/// advancing while the head's priority is `<=` the incoming message's
/// priority, and inserts after — this keeps ties FIFO within a priority
/// class without a secondary sequence counter.
#[derive(Default)]
pub struct MessageQueueTable {
    queues: Table<Queue, MAX_QUEUES>,
}

impl MessageQueueTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, max_messages: usize, max_message_size: usize) -> IpcResult<Handle> {
        self.queues.insert(Queue {
            messages: Vec::new(),
            max_messages,
            max_message_size,
        })
    }

    pub fn send(&mut self, handle: Handle, data: &[u8], priority: Priority) -> IpcResult<()> {
        let queue = self.queues.get_mut(handle)?;
        if queue.messages.len() >= queue.max_messages {
            return Err(IpcError::TableFull);
        }
        if data.len() > queue.max_message_size {
            return Err(IpcError::InvalidArgument);
        }
        let insert_at = queue
            .messages
            .iter()
            .take_while(|m| m.priority <= priority)
            .count();
        queue.messages.insert(
            insert_at,
            Message {
                data: data.to_vec(),
                priority,
            },
        );
        Ok(())
    }

    pub fn receive(&mut self, handle: Handle, out: &mut [u8]) -> IpcResult<(usize, Priority)> {
        let queue = self.queues.get_mut(handle)?;
        if queue.messages.is_empty() {
            return Err(IpcError::WouldBlock);
        }
        let msg = queue.messages.remove(0);
        let n = msg.data.len().min(out.len());
        out[..n].copy_from_slice(&msg.data[..n]);
        Ok((n, msg.priority))
    }

    pub fn len(&self, handle: Handle) -> IpcResult<usize> {
        Ok(self.queues.get(handle)?.messages.len())
    }

    pub fn close(&mut self, handle: Handle) -> IpcResult<()> {
        self.queues.remove(handle).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case]
    fn priority_order_matches_scenario() {
        let mut mq = MessageQueueTable::new();
        let handle = mq.open(10, 64).unwrap();
        mq.send(handle, b"A", PRIORITY_NORMAL).unwrap();
        mq.send(handle, b"B", PRIORITY_LOW).unwrap();
        mq.send(handle, b"C", PRIORITY_HIGH).unwrap();
        mq.send(handle, b"D", PRIORITY_NORMAL).unwrap();

        let mut out = [0u8; 1];
        let order = [b'C', b'A', b'D', b'B'];
        for expected in order {
            let (n, _) = mq.receive(handle, &mut out).unwrap();
            assert_eq!(n, 1);
            assert_eq!(out[0], expected);
        }
    }

    #[test_case]
    fn receive_from_empty_queue_fails() {
        let mut mq = MessageQueueTable::new();
        let handle = mq.open(4, 16).unwrap();
        assert_eq!(mq.receive(handle, &mut [0u8; 1]), Err(IpcError::WouldBlock));
    }

    #[test_case]
    fn send_rejects_oversized_message() {
        let mut mq = MessageQueueTable::new();
        let handle = mq.open(4, 2).unwrap();
        assert_eq!(mq.send(handle, b"abc", PRIORITY_NORMAL), Err(IpcError::InvalidArgument));
    }

    #[test_case]
    fn send_rejects_when_queue_is_full() {
        let mut mq = MessageQueueTable::new();
        let handle = mq.open(1, 16).unwrap();
        mq.send(handle, b"x", PRIORITY_NORMAL).unwrap();
        assert_eq!(mq.send(handle, b"y", PRIORITY_NORMAL), Err(IpcError::TableFull));
    }
}
