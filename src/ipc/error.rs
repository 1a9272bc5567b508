use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpcError {
    NotFound,
    TableFull,
    StaleHandle,
    WouldBlock,
    Deadlock,
    InvalidArgument,
}

impl fmt::Display for IpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            IpcError::NotFound => "object not found",
            IpcError::TableFull => "object table is full",
            IpcError::StaleHandle => "handle refers to a freed generation",
            IpcError::WouldBlock => "operation would block",
            IpcError::Deadlock => "deadlock detected",
            IpcError::InvalidArgument => "invalid argument",
        };
        write!(f, "{}", msg)
    }
}

pub type IpcResult<T> = Result<T, IpcError>;
