//! `PUTFH` (operation 22): replace the current file handle.

use std::io::Read;

use tracing::{debug, warn};

use super::CompoundState;
use crate::protocol::rpc;
use crate::protocol::xdr::deserialize;
use crate::protocol::xdr::nfs4::{nfsstat4, PUTFH4args, PUTFH4res};

/// Handles `NFSv4` `PUTFH` operation (operation 22)
///
/// Resolves the file handle through the metadata provider and makes the
/// object it names the current one for the following operations.
///
/// # Arguments
///
/// * `input` - Input stream positioned at the `PUTFH4args`
/// * `state` - Compound state receiving the new current file handle
/// * `context` - Server context containing the metadata provider
///
/// # Returns
///
/// * `PUTFH4res` - `NFS4_OK`, or the status explaining why the handle was
///   rejected
pub(super) async fn nfsop4_putfh(
    input: &mut impl Read,
    state: &mut CompoundState,
    context: &rpc::Context,
) -> PUTFH4res {
    let args = match deserialize::<PUTFH4args>(input) {
        Ok(args) => args,
        Err(e) => {
            warn!("PUTFH: cannot decode arguments: {:?}", e);
            return PUTFH4res { status: nfsstat4::NFS4ERR_BADXDR };
        }
    };

    match context.vfs.fh_to_inode(&args.object).await {
        Ok(inode) => {
            debug!("putfh4 --> object {}", inode.id());
            state.set_current_inode(inode);
            PUTFH4res { status: nfsstat4::NFS4_OK }
        }
        Err(stat) => {
            debug!("putfh4 {:?} --> {:?}", args.object, stat);
            PUTFH4res { status: stat }
        }
    }
}
