//! NFS version 4 operations served by a pNFS data server.
//!
//! A data server only sees I/O traffic: clients that obtained a layout from
//! the metadata server send COMPOUND requests of the form `PUTFH, WRITE` to
//! it. [handle_compound] decodes such a request, runs the operations in order
//! and encodes the reply. Evaluation stops at the first operation that does
//! not return `NFS4_OK`; the status of that operation becomes the status of
//! the whole COMPOUND.
//!
//! Supported operations:
//!
//! - PUTFH - set the current file handle
//! - WRITE - write to the object behind the current file handle
//!
//! Any other operation defined by the minor version of the request is
//! answered with `NFS4ERR_NOTSUPP`, operation numbers it does not define with
//! `OP_ILLEGAL`. Both end the request.
//!
//! Sessions are not implemented: a 4.1 or 4.2 COMPOUND starting with
//! `SEQUENCE` gets `NFS4ERR_NOTSUPP` for it.

use std::fmt;
use std::io::{Read, Write};
use std::ops::RangeInclusive;
use std::sync::Arc;

use num_traits::cast::FromPrimitive;
use tracing::{debug, warn};

use crate::protocol::rpc;
use crate::protocol::xdr::nfs4::{self, nfs_opnum4, nfs_resop4, nfsstat4};
use crate::protocol::xdr::{deserialize, Serialize};
use crate::vfs::Inode;

mod putfh;
mod write;

use putfh::nfsop4_putfh;
use write::nfsop4_write;

pub use write::process_write;

/// Minor versions accepted in COMPOUND.
pub const MINOR_VERSIONS: RangeInclusive<u32> = 0..=2;

/// State carried from one operation to the next within a single COMPOUND
#[derive(Clone, Default)]
pub struct CompoundState {
    current: Option<Arc<dyn Inode>>,
}

impl CompoundState {
    /// State with the current file handle already set
    pub fn with_current_inode(inode: Arc<dyn Inode>) -> Self {
        CompoundState { current: Some(inode) }
    }

    /// Object selected by the last PUTFH, if any
    pub fn current_inode(&self) -> Option<&Arc<dyn Inode>> {
        self.current.as_ref()
    }

    pub fn set_current_inode(&mut self, inode: Arc<dyn Inode>) {
        self.current = Some(inode);
    }
}

impl fmt::Debug for CompoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompoundState")
            .field("current", &self.current.as_ref().map(|inode| inode.id()))
            .finish()
    }
}

/// Handles the body of an NFSv4 COMPOUND call
///
/// # Arguments
///
/// * `input` - Input stream positioned at the COMPOUND4args
/// * `output` - Output stream receiving the COMPOUND4res
/// * `context` - Server context containing the metadata provider and the store
///
/// # Returns
///
/// * `Result<(), anyhow::Error>` - Err only when the request stream itself is
///   truncated or the reply cannot be written
pub async fn handle_compound(
    input: &mut impl Read,
    output: &mut impl Write,
    context: &rpc::Context,
) -> Result<(), anyhow::Error> {
    let tag = deserialize::<Vec<u8>>(input)?;
    let minorversion = deserialize::<u32>(input)?;
    if !MINOR_VERSIONS.contains(&minorversion) {
        warn!("Unsupported NFSv4 minor version {}", minorversion);
        nfs4::COMPOUND4res {
            status: nfsstat4::NFS4ERR_MINOR_VERS_MISMATCH,
            tag,
            resarray: Vec::new(),
        }
        .serialize(output)?;
        return Ok(());
    }

    let count = deserialize::<u32>(input)?;
    debug!("compound4(minor version {}, {} operations)", minorversion, count);

    let mut state = CompoundState::default();
    let mut resarray = Vec::new();
    let mut status = nfsstat4::NFS4_OK;
    for _ in 0..count {
        let opnum = deserialize::<u32>(input)?;
        let res = match nfs_opnum4::from_u32(opnum) {
            Some(nfs_opnum4::OP_PUTFH) => {
                nfs_resop4::PUTFH(nfsop4_putfh(input, &mut state, context).await)
            }
            Some(nfs_opnum4::OP_WRITE) => {
                nfs_resop4::WRITE(nfsop4_write(input, &state, context).await)
            }
            Some(op) if op != nfs_opnum4::OP_ILLEGAL && op.minor_version() <= minorversion => {
                warn!("Unsupported operation {:?}", op);
                nfs_resop4::NOTSUPP(op)
            }
            _ => {
                warn!("Illegal operation {}", opnum);
                nfs_resop4::ILLEGAL(nfs4::ILLEGAL4res::default())
            }
        };
        status = res.status();
        resarray.push(res);
        if status != nfsstat4::NFS4_OK {
            break;
        }
    }

    nfs4::COMPOUND4res { status, tag, resarray }.serialize(output)?;
    Ok(())
}
