//! Execution context shared by the operations of one data server.
//!
//! The context bundles what an operation needs besides its arguments: the
//! metadata provider resolving file handles, the pool the bytes are written
//! to and the write verifier of this server instance. It is created once at
//! startup and cloned cheaply into every request.

use std::fmt;
use std::sync::Arc;

use crate::config::DataServerConfig;
use crate::ds_store::PositionalFileStore;
use crate::protocol::xdr::nfs4::verifier4;
use crate::vfs;

#[derive(Clone)]
pub struct Context {
    /// Metadata provider resolving file handles to inodes
    pub vfs: Arc<dyn vfs::DataServerFileSystem>,

    /// Storage for object content, rooted at the configured pool directory
    pub store: PositionalFileStore,

    /// Verifier returned by every WRITE of this server instance
    pub write_verifier: verifier4,
}

impl Context {
    /// Builds the context of a server instance, opening objects under the
    /// pool root of `config`.
    pub fn new(config: &DataServerConfig, vfs: Arc<dyn vfs::DataServerFileSystem>) -> Self {
        let store = PositionalFileStore::new(config.pool_root());
        let write_verifier = vfs.server_id();
        Context { vfs, store, write_verifier }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("rpc::Context")
            .field("pool_root", &self.store.root())
            .field("write_verifier", &self.write_verifier)
            .finish()
    }
}
