#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

use nfs_mamont_ds::config::DataServerConfig;
use nfs_mamont_ds::protocol::nfs::v4::handle_compound;
use nfs_mamont_ds::protocol::rpc::Context;
use nfs_mamont_ds::vfs::{DataServerFileSystem, MemoryFileSystem};
use nfs_mamont_ds::xdr::nfs4::{
    self, fileid4, nfs_argop4, stable_how4, PUTFH4args, WRITE4args, COMPOUND4args, COMPOUND4res,
};
use nfs_mamont_ds::xdr::{self, Serialize};

pub const GENERATION: u64 = 7;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Data server with an empty pool in a temporary directory
pub struct Fixture {
    pub pool: tempfile::TempDir,
    pub fs: Arc<MemoryFileSystem>,
    pub context: Context,
}

impl Fixture {
    pub fn new() -> Self {
        let pool = tempfile::tempdir().expect("create pool directory");
        Self::with_pool_root(pool, None)
    }

    /// Fixture whose store points at `root` instead of the temporary pool
    pub fn with_pool_root(pool: tempfile::TempDir, root: Option<PathBuf>) -> Self {
        init_tracing();
        let fs = Arc::new(MemoryFileSystem::new(GENERATION));
        let root = root.unwrap_or_else(|| pool.path().to_path_buf());
        let context = Context::new(&DataServerConfig::new(root), fs.clone());
        Fixture { pool, fs, context }
    }

    pub fn object_path(&self, id: fileid4) -> PathBuf {
        self.pool.path().join(id.to_string())
    }

    pub fn read_object(&self, id: fileid4) -> Vec<u8> {
        std::fs::read(self.object_path(id)).expect("read backing file")
    }

    pub fn putfh(&self, id: fileid4) -> nfs_argop4 {
        nfs_argop4::PUTFH(PUTFH4args { object: self.fs.id_to_fh(id) })
    }

    pub async fn compound(&self, argarray: Vec<nfs_argop4>) -> COMPOUND4res {
        let args = COMPOUND4args { tag: b"test".to_vec(), minorversion: 1, argarray };
        self.compound_raw(&args).await
    }

    pub async fn compound_raw(&self, args: &COMPOUND4args) -> COMPOUND4res {
        let mut input = Vec::new();
        args.serialize(&mut input).expect("serialize compound");
        self.compound_bytes(input).await
    }

    pub async fn compound_bytes(&self, input: Vec<u8>) -> COMPOUND4res {
        let mut output = Vec::new();
        handle_compound(&mut Cursor::new(input), &mut output, &self.context)
            .await
            .expect("handle_compound");
        xdr::deserialize::<COMPOUND4res>(&mut Cursor::new(output)).expect("deserialize reply")
    }
}

pub fn write_args(offset: u64, data: &[u8]) -> WRITE4args {
    WRITE4args {
        stateid: nfs4::stateid4::default(),
        offset,
        stable: stable_how4::FILE_SYNC4,
        data: data.to_vec(),
    }
}

pub fn write_op(offset: u64, data: &[u8]) -> nfs_argop4 {
    nfs_argop4::WRITE(write_args(offset, data))
}
