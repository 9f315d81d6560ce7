//! Failures of the data server write path and their mapping onto NFSv4 status
//! codes.
//!
//! Every fault ends up as an `nfsstat4` in a well formed reply, nothing is
//! allowed to escape the operation handler.

use std::fmt;
use std::io;

use crate::protocol::xdr::nfs4::nfsstat4;

/// Storage step that failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StoreOp {
    Open,
    Write,
    Size,
    Close,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreOp::Open => "open",
            StoreOp::Write => "write",
            StoreOp::Size => "size",
            StoreOp::Close => "close",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// No PUTFH ran before WRITE in this compound.
    #[error("no current file handle")]
    NoFileHandle,

    /// The backing file could not be opened, written, measured or closed.
    #[error("storage {op} failed: {source}")]
    Storage {
        op: StoreOp,
        #[source]
        source: io::Error,
    },

    /// The byte count written does not fit the `count4` of the reply.
    #[error("byte count {0} does not fit count4")]
    InvalidCount(usize),

    /// A collaborator failed with a status of its own.
    #[error("protocol error {0:?}")]
    Status(nfsstat4),

    #[error(transparent)]
    Unclassified(#[from] anyhow::Error),
}

impl WriteError {
    /// Adapter for `map_err` on storage results.
    pub fn storage(op: StoreOp) -> impl FnOnce(io::Error) -> WriteError {
        move |source| WriteError::Storage { op, source }
    }

    /// Status code sent to the client.
    pub fn status(&self) -> nfsstat4 {
        match self {
            WriteError::NoFileHandle => nfsstat4::NFS4ERR_NOFILEHANDLE,
            WriteError::Storage { .. } | WriteError::InvalidCount(_) => nfsstat4::NFS4ERR_IO,
            WriteError::Status(stat) => *stat,
            WriteError::Unclassified(_) => nfsstat4::NFS4ERR_IO,
        }
    }
}

impl From<nfsstat4> for WriteError {
    fn from(stat: nfsstat4) -> Self {
        WriteError::Status(stat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_faults_map_to_io() {
        let err = WriteError::storage(StoreOp::Open)(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.status(), nfsstat4::NFS4ERR_IO);
        assert_eq!(err.to_string(), "storage open failed: permission denied");
        assert_eq!(WriteError::InvalidCount(usize::MAX).status(), nfsstat4::NFS4ERR_IO);
    }

    #[test]
    fn protocol_status_passes_through() {
        assert_eq!(WriteError::from(nfsstat4::NFS4ERR_STALE).status(), nfsstat4::NFS4ERR_STALE);
        assert_eq!(WriteError::from(nfsstat4::NFS4ERR_ACCESS).status(), nfsstat4::NFS4ERR_ACCESS);
    }

    #[test]
    fn missing_file_handle_has_its_own_status() {
        assert_eq!(WriteError::NoFileHandle.status(), nfsstat4::NFS4ERR_NOFILEHANDLE);
    }

    #[test]
    fn unclassified_faults_map_to_io() {
        let err = WriteError::from(anyhow::anyhow!("worker vanished"));
        assert_eq!(err.status(), nfsstat4::NFS4ERR_IO);
        assert_eq!(err.to_string(), "worker vanished");
    }
}
