//! Metadata provider interface of the data server.
//!
//! The data server only stores bytes. Everything it knows about an object
//! (its identity, the size recorded by the metadata side, whether its file
//! handle is still valid) comes through the traits defined here:
//!
//! - [DataServerFileSystem] turns file handles into inodes and supplies the
//!   write verifier of the running server instance
//! - [Inode] exposes the recorded size and the key of the backing object
//!
//! File handles follow a generation scheme: a handle carries the generation
//! of the server instance that issued it, handles from an older generation
//! are stale, handles from a newer one are bogus.
//!
//! [MemoryFileSystem] and [MemoryInode] are simple in-memory implementations
//! suitable for tests and for deployments where the data server owns the size
//! bookkeeping itself.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{self, AtomicU64};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::protocol::xdr::nfs4::{fileid4, nfs_fh4, nfsstat4, verifier4};

/// An object stored on the data server, as seen through the metadata provider
#[async_trait]
pub trait Inode: Send + Sync {
    /// Identifier of the object, unique within the file system
    fn id(&self) -> fileid4;

    /// Name of the backing object in the storage pool.
    ///
    /// Must be stable for the lifetime of the object; by default it is the
    /// decimal object id.
    fn key(&self) -> String {
        self.id().to_string()
    }

    /// Size currently recorded for the object
    async fn size(&self) -> Result<u64, nfsstat4>;

    /// Records a new size for the object
    async fn set_size(&self, size: u64) -> Result<(), nfsstat4>;
}

/// Resolves file handles presented to the data server
#[async_trait]
pub trait DataServerFileSystem: Send + Sync {
    /// Generation number of this server instance.
    ///
    /// Must change whenever the server restarts; it is embedded in file
    /// handles and, by default, used as the write verifier.
    fn generation(&self) -> u64;

    /// Looks up the inode with the given id
    async fn inode(&self, id: fileid4) -> Result<Arc<dyn Inode>, nfsstat4>;

    /// Builds the file handle of an object id
    fn id_to_fh(&self, id: fileid4) -> nfs_fh4 {
        let mut data = Vec::with_capacity(16);
        data.extend_from_slice(&self.generation().to_le_bytes());
        data.extend_from_slice(&id.to_le_bytes());
        nfs_fh4 { data }
    }

    /// Extracts the object id from a file handle, checking its generation
    fn fh_to_id(&self, fh: &nfs_fh4) -> Result<fileid4, nfsstat4> {
        if fh.data.len() != 16 {
            return Err(nfsstat4::NFS4ERR_BADHANDLE);
        }
        let (generation, id) = fh.data.split_at(8);
        let generation =
            u64::from_le_bytes(generation.try_into().map_err(|_| nfsstat4::NFS4ERR_BADHANDLE)?);
        let id = u64::from_le_bytes(id.try_into().map_err(|_| nfsstat4::NFS4ERR_BADHANDLE)?);
        match generation.cmp(&self.generation()) {
            Ordering::Less => Err(nfsstat4::NFS4ERR_STALE),
            Ordering::Greater => Err(nfsstat4::NFS4ERR_BADHANDLE),
            Ordering::Equal => Ok(id),
        }
    }

    /// Resolves a file handle straight to its inode
    async fn fh_to_inode(&self, fh: &nfs_fh4) -> Result<Arc<dyn Inode>, nfsstat4> {
        let id = self.fh_to_id(fh)?;
        self.inode(id).await
    }

    /// Write verifier returned by WRITE.
    ///
    /// Constant for the lifetime of the server instance so that clients can
    /// detect restarts.
    fn server_id(&self) -> verifier4 {
        self.generation().to_be_bytes()
    }
}

/// Inode keeping its size in memory
#[derive(Debug)]
pub struct MemoryInode {
    id: fileid4,
    size: AtomicU64,
}

impl MemoryInode {
    pub fn new(id: fileid4, size: u64) -> Self {
        MemoryInode { id, size: AtomicU64::new(size) }
    }

    /// Size without going through the async interface
    pub fn recorded_size(&self) -> u64 {
        self.size.load(atomic::Ordering::Acquire)
    }
}

#[async_trait]
impl Inode for MemoryInode {
    fn id(&self) -> fileid4 {
        self.id
    }

    async fn size(&self) -> Result<u64, nfsstat4> {
        Ok(self.recorded_size())
    }

    async fn set_size(&self, size: u64) -> Result<(), nfsstat4> {
        self.size.store(size, atomic::Ordering::Release);
        Ok(())
    }
}

/// File system whose inodes are registered explicitly
pub struct MemoryFileSystem {
    generation: u64,
    inodes: RwLock<HashMap<fileid4, Arc<MemoryInode>>>,
}

impl MemoryFileSystem {
    pub fn new(generation: u64) -> Self {
        MemoryFileSystem { generation, inodes: RwLock::new(HashMap::new()) }
    }

    /// Registers an object with the given recorded size, replacing any
    /// previous object with the same id.
    pub fn insert(&self, id: fileid4, size: u64) -> Result<Arc<MemoryInode>, nfsstat4> {
        let inode = Arc::new(MemoryInode::new(id, size));
        self.inodes
            .write()
            .map_err(|_| nfsstat4::NFS4ERR_SERVERFAULT)?
            .insert(id, inode.clone());
        Ok(inode)
    }

    /// Forgets an object; its file handles become stale.
    pub fn remove(&self, id: fileid4) -> Result<Option<Arc<MemoryInode>>, nfsstat4> {
        Ok(self.inodes.write().map_err(|_| nfsstat4::NFS4ERR_SERVERFAULT)?.remove(&id))
    }
}

impl Default for MemoryFileSystem {
    /// Uses the start time of the process as generation.
    fn default() -> Self {
        let generation = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or_default();
        Self::new(generation)
    }
}

#[async_trait]
impl DataServerFileSystem for MemoryFileSystem {
    fn generation(&self) -> u64 {
        self.generation
    }

    async fn inode(&self, id: fileid4) -> Result<Arc<dyn Inode>, nfsstat4> {
        let inodes = self.inodes.read().map_err(|_| nfsstat4::NFS4ERR_SERVERFAULT)?;
        inodes
            .get(&id)
            .map(|inode| inode.clone() as Arc<dyn Inode>)
            .ok_or(nfsstat4::NFS4ERR_STALE)
    }
}
