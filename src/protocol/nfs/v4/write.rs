//! `WRITE` (operation 38) on a pNFS data server, RFC 8881 section 18.32.
//!
//! The bytes go to the backing file of the current object in the storage
//! pool. The first write to an object whose recorded size is still zero
//! truncates the backing file, discarding whatever a previous incarnation of
//! the object left behind. After the write the recorded size of the object is
//! set to the length of the backing file, which is authoritative: writes at
//! scattered offsets leave gaps and earlier content keeps its extent.
//!
//! The backing file is synced before the reply, so every successful write is
//! reported as `FILE_SYNC4` whatever stability the client asked for.
//!
//! Reading the recorded size, writing and storing the new size are separate
//! steps. Concurrent writes to the same object may interleave between them
//! and the last one to finish decides the recorded size.

use std::io::Read;

use tracing::{debug, error, warn};

use super::CompoundState;
use crate::error::{StoreOp, WriteError};
use crate::protocol::rpc;
use crate::protocol::xdr::deserialize;
use crate::protocol::xdr::nfs4::{count4, nfsstat4, stable_how4, WRITE4args, WRITE4res, WRITE4resok};

/// Handles `NFSv4` `WRITE` operation (operation 38)
///
/// Decodes the arguments following the operation number and writes them to
/// the object selected by the current file handle.
///
/// # Arguments
///
/// * `input` - Input stream positioned at the `WRITE4args`
/// * `state` - Compound state holding the current file handle
/// * `context` - Server context containing the store and the write verifier
///
/// # Returns
///
/// * `WRITE4res` - `NFS4ERR_BADXDR` when the arguments cannot be decoded,
///   otherwise the result of [process_write]
pub(super) async fn nfsop4_write(
    input: &mut impl Read,
    state: &CompoundState,
    context: &rpc::Context,
) -> WRITE4res {
    match deserialize::<WRITE4args>(input) {
        Ok(args) => process_write(args, state, context).await,
        Err(e) => {
            warn!("WRITE: cannot decode arguments: {:?}", e);
            WRITE4res::Err(nfsstat4::NFS4ERR_BADXDR)
        }
    }
}

/// Executes WRITE against the current object of `state`
///
/// Never fails: every fault is logged and turned into the status of the
/// returned result.
///
/// # Arguments
///
/// * `args` - Decoded WRITE arguments; all of `args.data` is written
/// * `state` - Compound state holding the current file handle
/// * `context` - Server context containing the store and the write verifier
pub async fn process_write(
    args: WRITE4args,
    state: &CompoundState,
    context: &rpc::Context,
) -> WRITE4res {
    match write(args, state, context).await {
        Ok(resok) => WRITE4res::Ok(resok),
        Err(err @ (WriteError::NoFileHandle | WriteError::Status(_))) => {
            warn!("WRITE: {} --> {:?}", err, err.status());
            WRITE4res::Err(err.status())
        }
        Err(err) => {
            error!("WRITE: {:#} --> {:?}", err, err.status());
            WRITE4res::Err(err.status())
        }
    }
}

async fn write(
    args: WRITE4args,
    state: &CompoundState,
    context: &rpc::Context,
) -> Result<WRITE4resok, WriteError> {
    let inode = state.current_inode().cloned().ok_or(WriteError::NoFileHandle)?;
    let WRITE4args { offset, stable, data, .. } = args;
    let length = data.len();
    debug!("write4(object {}, offset {}, length {}, stable {:?})", inode.id(), offset, length, stable);

    // only a freshly allocated object has a recorded size of zero
    let truncate = inode.size().await? == 0;

    let key = inode.key();
    let store = context.store.clone();
    let (written, size) = tokio::task::spawn_blocking(move || {
        let mut file = store.open(&key, truncate).map_err(WriteError::storage(StoreOp::Open))?;
        let written =
            file.write(&data, offset, length).map_err(WriteError::storage(StoreOp::Write))?;
        let size = file.size().map_err(WriteError::storage(StoreOp::Size))?;
        file.close().map_err(WriteError::storage(StoreOp::Close))?;
        Ok::<_, WriteError>((written, size))
    })
    .await
    .map_err(|e| WriteError::Unclassified(anyhow::Error::new(e).context("storage task failed")))??;

    let count = count4::try_from(written).map_err(|_| WriteError::InvalidCount(written))?;

    inode.set_size(size).await?;
    debug!("{}@{} written, {} requested, new file size {}", written, offset, length, size);

    Ok(WRITE4resok {
        count,
        committed: stable_how4::FILE_SYNC4,
        writeverf: context.write_verifier,
    })
}
