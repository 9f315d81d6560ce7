//! NFS protocol operations.
//!
//! - `v4`: the NFS version 4 COMPOUND procedure, restricted to the operations
//!   a pNFS data server receives on its I/O path (PUTFH and WRITE).

pub mod v4;
