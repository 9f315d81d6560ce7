//! XDR data types and constants of NFS version 4 (RFC 7530, RFC 8881) used by
//! the data server: the COMPOUND envelope, status codes and the arguments and
//! results of the PUTFH and WRITE operations.

// Only a slice of the protocol is served, the rest of the types are kept for completeness
#![allow(dead_code)]
// Preserve RFC naming conventions (e.g. WRITE4args, nfsstat4)
#![allow(non_camel_case_types)]

use std::io::{Read, Write};

use num_derive::{FromPrimitive, ToPrimitive};

use super::{
    deserialize, invalid_data, Deserialize, DeserializeEnum, DeserializeStruct, Serialize,
    SerializeEnum, SerializeStruct,
};

/// Size in bytes of the opaque verifiers (`verifier4`).
pub const NFS4_VERIFIER_SIZE: usize = 8;
/// Maximum size in bytes of a file handle.
pub const NFS4_FHSIZE: usize = 128;
/// Size in bytes of the opaque part of a state id.
pub const NFS4_OTHER_SIZE: usize = 12;

pub type offset4 = u64;
pub type count4 = u32;
pub type length4 = u64;
pub type seqid4 = u32;
pub type fileid4 = u64;
pub type verifier4 = [u8; NFS4_VERIFIER_SIZE];

/// Status codes returned by NFSv4 operations and by COMPOUND itself.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum nfsstat4 {
    /// Everything went fine.
    #[default]
    NFS4_OK = 0,
    /// Caller is not privileged or not the owner of the target.
    NFS4ERR_PERM = 1,
    /// No such file or directory.
    NFS4ERR_NOENT = 2,
    /// Hard I/O error while processing the operation.
    NFS4ERR_IO = 5,
    /// No such device or address.
    NFS4ERR_NXIO = 6,
    /// Caller lacks the required permission.
    NFS4ERR_ACCESS = 13,
    NFS4ERR_EXIST = 17,
    NFS4ERR_XDEV = 18,
    NFS4ERR_NOTDIR = 20,
    NFS4ERR_ISDIR = 21,
    /// Invalid argument.
    NFS4ERR_INVAL = 22,
    /// File grew beyond the server limit.
    NFS4ERR_FBIG = 27,
    /// No space left on the device.
    NFS4ERR_NOSPC = 28,
    /// Modification attempted on a read-only file system.
    NFS4ERR_ROFS = 30,
    NFS4ERR_MLINK = 31,
    NFS4ERR_NAMETOOLONG = 63,
    NFS4ERR_NOTEMPTY = 66,
    /// Quota exceeded.
    NFS4ERR_DQUOT = 69,
    /// The file handle refers to an object that no longer exists.
    NFS4ERR_STALE = 70,
    /// The file handle failed internal consistency checks.
    NFS4ERR_BADHANDLE = 10001,
    NFS4ERR_BAD_COOKIE = 10003,
    /// Operation is not supported.
    NFS4ERR_NOTSUPP = 10004,
    NFS4ERR_TOOSMALL = 10005,
    /// Failure on the server that has no protocol counterpart.
    NFS4ERR_SERVERFAULT = 10006,
    NFS4ERR_BADTYPE = 10007,
    /// Try again later.
    NFS4ERR_DELAY = 10008,
    NFS4ERR_DENIED = 10010,
    NFS4ERR_EXPIRED = 10011,
    NFS4ERR_LOCKED = 10012,
    NFS4ERR_GRACE = 10013,
    NFS4ERR_FHEXPIRED = 10014,
    NFS4ERR_SHARE_DENIED = 10015,
    NFS4ERR_WRONGSEC = 10016,
    NFS4ERR_RESOURCE = 10018,
    NFS4ERR_MOVED = 10019,
    /// The operation requires a current file handle and none is set.
    NFS4ERR_NOFILEHANDLE = 10020,
    /// The minor version in COMPOUND is not served.
    NFS4ERR_MINOR_VERS_MISMATCH = 10021,
    NFS4ERR_STALE_STATEID = 10023,
    NFS4ERR_OLD_STATEID = 10024,
    NFS4ERR_BAD_STATEID = 10025,
    NFS4ERR_BAD_SEQID = 10026,
    NFS4ERR_LOCK_RANGE = 10028,
    NFS4ERR_SYMLINK = 10029,
    /// Arguments could not be decoded.
    NFS4ERR_BADXDR = 10036,
    NFS4ERR_OPENMODE = 10038,
    NFS4ERR_BAD_RANGE = 10042,
    /// Unknown operation number.
    NFS4ERR_OP_ILLEGAL = 10044,
    NFS4ERR_ADMIN_REVOKED = 10047,
}
impl SerializeEnum for nfsstat4 {}
impl DeserializeEnum for nfsstat4 {}

/// Operation numbers carried in COMPOUND.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum nfs_opnum4 {
    OP_ACCESS = 3,
    OP_CLOSE = 4,
    OP_COMMIT = 5,
    OP_CREATE = 6,
    OP_DELEGPURGE = 7,
    OP_DELEGRETURN = 8,
    OP_GETATTR = 9,
    OP_GETFH = 10,
    OP_LINK = 11,
    OP_LOCK = 12,
    OP_LOCKT = 13,
    OP_LOCKU = 14,
    OP_LOOKUP = 15,
    OP_LOOKUPP = 16,
    OP_NVERIFY = 17,
    OP_OPEN = 18,
    OP_OPENATTR = 19,
    OP_OPEN_CONFIRM = 20,
    OP_OPEN_DOWNGRADE = 21,
    OP_PUTFH = 22,
    OP_PUTPUBFH = 23,
    OP_PUTROOTFH = 24,
    OP_READ = 25,
    OP_READDIR = 26,
    OP_READLINK = 27,
    OP_REMOVE = 28,
    OP_RENAME = 29,
    OP_RENEW = 30,
    OP_RESTOREFH = 31,
    OP_SAVEFH = 32,
    OP_SECINFO = 33,
    OP_SETATTR = 34,
    OP_SETCLIENTID = 35,
    OP_SETCLIENTID_CONFIRM = 36,
    OP_VERIFY = 37,
    OP_WRITE = 38,
    OP_RELEASE_LOCKOWNER = 39,
    // minor version 1
    OP_BACKCHANNEL_CTL = 40,
    OP_BIND_CONN_TO_SESSION = 41,
    OP_EXCHANGE_ID = 42,
    OP_CREATE_SESSION = 43,
    OP_DESTROY_SESSION = 44,
    OP_FREE_STATEID = 45,
    OP_GET_DIR_DELEGATION = 46,
    OP_GETDEVICEINFO = 47,
    OP_GETDEVICELIST = 48,
    OP_LAYOUTCOMMIT = 49,
    OP_LAYOUTGET = 50,
    OP_LAYOUTRETURN = 51,
    OP_SECINFO_NO_NAME = 52,
    OP_SEQUENCE = 53,
    OP_SET_SSV = 54,
    OP_TEST_STATEID = 55,
    OP_WANT_DELEGATION = 56,
    OP_DESTROY_CLIENTID = 57,
    OP_RECLAIM_COMPLETE = 58,
    // minor version 2
    OP_ALLOCATE = 59,
    OP_COPY = 60,
    OP_COPY_NOTIFY = 61,
    OP_DEALLOCATE = 62,
    OP_IO_ADVISE = 63,
    OP_LAYOUTERROR = 64,
    OP_LAYOUTSTATS = 65,
    OP_OFFLOAD_CANCEL = 66,
    OP_OFFLOAD_STATUS = 67,
    OP_READ_PLUS = 68,
    OP_SEEK = 69,
    OP_WRITE_SAME = 70,
    OP_CLONE = 71,
    OP_GETXATTR = 72,
    OP_SETXATTR = 73,
    OP_LISTXATTRS = 74,
    OP_REMOVEXATTR = 75,
    #[default]
    OP_ILLEGAL = 10044,
}
impl SerializeEnum for nfs_opnum4 {}
impl DeserializeEnum for nfs_opnum4 {}

impl nfs_opnum4 {
    /// First minor version that defines the operation.
    pub fn minor_version(&self) -> u32 {
        match *self as u32 {
            40..=58 => 1,
            59..=75 => 2,
            _ => 0,
        }
    }
}

/// Durability requested for, or achieved by, a WRITE.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum stable_how4 {
    /// Data may still sit in server caches when the reply is sent.
    #[default]
    UNSTABLE4 = 0,
    /// File data is on stable storage, metadata may not be.
    DATA_SYNC4 = 1,
    /// File data and metadata are on stable storage.
    FILE_SYNC4 = 2,
}
impl SerializeEnum for stable_how4 {}
impl DeserializeEnum for stable_how4 {}

/// Opaque file handle of at most [NFS4_FHSIZE] bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct nfs_fh4 {
    pub data: Vec<u8>,
}
SerializeStruct!(nfs_fh4, data);

impl Deserialize for nfs_fh4 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.data.deserialize(src)?;
        if self.data.len() > NFS4_FHSIZE {
            return Err(invalid_data("file handle longer than NFS4_FHSIZE"));
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct stateid4 {
    pub seqid: seqid4,
    pub other: [u8; NFS4_OTHER_SIZE],
}
DeserializeStruct!(stateid4, seqid, other);
SerializeStruct!(stateid4, seqid, other);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PUTFH4args {
    pub object: nfs_fh4,
}
DeserializeStruct!(PUTFH4args, object);
SerializeStruct!(PUTFH4args, object);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PUTFH4res {
    pub status: nfsstat4,
}
DeserializeStruct!(PUTFH4res, status);
SerializeStruct!(PUTFH4res, status);

/// Arguments of WRITE. The byte count is implied by the length of `data`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WRITE4args {
    /// State id authorising the I/O, not checked by the data server
    pub stateid: stateid4,
    /// Position within the file to begin writing
    pub offset: offset4,
    /// Durability the client asks for
    pub stable: stable_how4,
    /// Bytes to write
    pub data: Vec<u8>,
}
DeserializeStruct!(WRITE4args, stateid, offset, stable, data);
SerializeStruct!(WRITE4args, stateid, offset, stable, data);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WRITE4resok {
    /// Number of bytes written
    pub count: count4,
    /// Durability actually achieved
    pub committed: stable_how4,
    /// Identifies the server incarnation that performed the write
    pub writeverf: verifier4,
}
DeserializeStruct!(WRITE4resok, count, committed, writeverf);
SerializeStruct!(WRITE4resok, count, committed, writeverf);

/// Result of WRITE: a `resok4` body follows the status only on success.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WRITE4res {
    Ok(WRITE4resok),
    Err(nfsstat4),
}

impl WRITE4res {
    pub fn status(&self) -> nfsstat4 {
        match self {
            WRITE4res::Ok(_) => nfsstat4::NFS4_OK,
            WRITE4res::Err(stat) => *stat,
        }
    }
}

impl Default for WRITE4res {
    fn default() -> Self {
        WRITE4res::Err(nfsstat4::NFS4ERR_SERVERFAULT)
    }
}

impl Serialize for WRITE4res {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            WRITE4res::Ok(resok) => {
                nfsstat4::NFS4_OK.serialize(dest)?;
                resok.serialize(dest)
            }
            WRITE4res::Err(nfsstat4::NFS4_OK) => {
                Err(invalid_data("WRITE4res error arm carries NFS4_OK"))
            }
            WRITE4res::Err(stat) => stat.serialize(dest),
        }
    }
}

impl Deserialize for WRITE4res {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        *self = match deserialize::<nfsstat4>(src)? {
            nfsstat4::NFS4_OK => WRITE4res::Ok(deserialize::<WRITE4resok>(src)?),
            stat => WRITE4res::Err(stat),
        };
        Ok(())
    }
}

/// Result sent for an operation number the server does not know.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ILLEGAL4res {
    pub status: nfsstat4,
}
DeserializeStruct!(ILLEGAL4res, status);
SerializeStruct!(ILLEGAL4res, status);

impl Default for ILLEGAL4res {
    fn default() -> Self {
        ILLEGAL4res { status: nfsstat4::NFS4ERR_OP_ILLEGAL }
    }
}

/// One operation of a COMPOUND request. Only the operations served by the
/// data server have a typed body; anything else is sent as a bare number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum nfs_argop4 {
    PUTFH(PUTFH4args),
    WRITE(WRITE4args),
    Other(u32),
}

impl Serialize for nfs_argop4 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            nfs_argop4::PUTFH(args) => {
                nfs_opnum4::OP_PUTFH.serialize(dest)?;
                args.serialize(dest)
            }
            nfs_argop4::WRITE(args) => {
                nfs_opnum4::OP_WRITE.serialize(dest)?;
                args.serialize(dest)
            }
            nfs_argop4::Other(opnum) => opnum.serialize(dest),
        }
    }
}

/// One operation result of a COMPOUND reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum nfs_resop4 {
    PUTFH(PUTFH4res),
    WRITE(WRITE4res),
    ILLEGAL(ILLEGAL4res),
    /// A defined operation the data server does not implement, answered
    /// with `NFS4ERR_NOTSUPP`. Every result union starts with its status,
    /// so the error arm is just the operation number and that status.
    NOTSUPP(nfs_opnum4),
}

impl nfs_resop4 {
    pub fn status(&self) -> nfsstat4 {
        match self {
            nfs_resop4::PUTFH(res) => res.status,
            nfs_resop4::WRITE(res) => res.status(),
            nfs_resop4::ILLEGAL(res) => res.status,
            nfs_resop4::NOTSUPP(_) => nfsstat4::NFS4ERR_NOTSUPP,
        }
    }
}

impl Default for nfs_resop4 {
    fn default() -> Self {
        nfs_resop4::ILLEGAL(ILLEGAL4res::default())
    }
}

impl Serialize for nfs_resop4 {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        match self {
            nfs_resop4::PUTFH(res) => {
                nfs_opnum4::OP_PUTFH.serialize(dest)?;
                res.serialize(dest)
            }
            nfs_resop4::WRITE(res) => {
                nfs_opnum4::OP_WRITE.serialize(dest)?;
                res.serialize(dest)
            }
            nfs_resop4::ILLEGAL(res) => {
                nfs_opnum4::OP_ILLEGAL.serialize(dest)?;
                res.serialize(dest)
            }
            nfs_resop4::NOTSUPP(op) => {
                op.serialize(dest)?;
                nfsstat4::NFS4ERR_NOTSUPP.serialize(dest)
            }
        }
    }
}

impl Deserialize for nfs_resop4 {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        *self = match deserialize::<nfs_opnum4>(src)? {
            nfs_opnum4::OP_PUTFH => nfs_resop4::PUTFH(deserialize(src)?),
            nfs_opnum4::OP_WRITE => nfs_resop4::WRITE(deserialize(src)?),
            nfs_opnum4::OP_ILLEGAL => nfs_resop4::ILLEGAL(deserialize(src)?),
            op => match deserialize::<nfsstat4>(src)? {
                nfsstat4::NFS4ERR_NOTSUPP => nfs_resop4::NOTSUPP(op),
                _ => return Err(invalid_data("unsupported operation in COMPOUND reply")),
            },
        };
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct COMPOUND4args {
    pub tag: Vec<u8>,
    pub minorversion: u32,
    pub argarray: Vec<nfs_argop4>,
}
SerializeStruct!(COMPOUND4args, tag, minorversion, argarray);

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct COMPOUND4res {
    /// Status of the last evaluated operation
    pub status: nfsstat4,
    /// Echo of the request tag
    pub tag: Vec<u8>,
    pub resarray: Vec<nfs_resop4>,
}
DeserializeStruct!(COMPOUND4res, status, tag, resarray);
SerializeStruct!(COMPOUND4res, status, tag, resarray);
