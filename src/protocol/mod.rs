//! Protocol module implements the wire side of the data server.
//!
//! - `xdr`: External Data Representation (RFC 4506) codec and the NFSv4 data
//!   types carried by the data server.
//!
//! - `nfs`: the NFSv4 operations themselves, dispatched from COMPOUND.
//!
//! - `rpc`: the execution context handed to every operation.
//!
//! The RPC transport (record marking, authentication, call headers) sits
//! outside this crate; it hands the COMPOUND body to
//! [nfs::v4::handle_compound] and sends back whatever that writes.

pub mod nfs;
pub mod rpc;
pub mod xdr;
