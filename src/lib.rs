//! NFS Mamont DS - the WRITE path of a pNFS data server
//!
//! In pNFS (parallel NFS, RFC 8881 section 12) a metadata server hands out
//! layouts that direct clients to data servers, which hold the file content.
//! This library implements what a data server does with the WRITE operations
//! it receives: the bytes are stored with positional writes into one backing
//! file per object inside a pool directory, and the size of the object is
//! updated from the backing file.
//!
//! ## Main Components
//!
//! - `protocol`: XDR codec, NFSv4 types and the COMPOUND dispatcher with the
//!   PUTFH and WRITE operations.
//!
//! - `ds_store`: positional file store, one backing file per object key.
//!
//! - `vfs`: interface to the metadata provider resolving file handles to
//!   inodes, plus an in-memory implementation.
//!
//! - `config`: data server configuration (storage pool location).
//!
//! - `error`: write path failures and their NFSv4 status codes.
//!
//! ## Standards Compliance
//!
//! - RFC 7530: Network File System (NFS) Version 4 Protocol
//! - RFC 8881: Network File System (NFS) Version 4 Minor Version 1 Protocol
//! - RFC 4506: XDR: External Data Representation Standard
//!
//! ## Usage
//!
//! Implement `DataServerFileSystem` (or use `MemoryFileSystem`), build an
//! `rpc::Context` from a `DataServerConfig` and pass COMPOUND bodies to
//! `protocol::nfs::v4::handle_compound`.

pub mod config;
pub mod ds_store;
pub mod error;
pub mod protocol;
pub mod vfs;

pub use protocol::xdr;
