use nfs_mamont_ds::vfs::DataServerFileSystem;
use nfs_mamont_ds::xdr::nfs4::{
    fileid4, nfs_argop4, nfs_fh4, nfs_opnum4, nfs_resop4, nfsstat4, stable_how4, ILLEGAL4res,
    PUTFH4args, PUTFH4res, WRITE4res, COMPOUND4args, NFS4_FHSIZE,
};
use nfs_mamont_ds::xdr::Serialize;

mod support;

use support::{write_op, Fixture, GENERATION};

const FILE_ID: fileid4 = 3;

#[tokio::test]
async fn putfh_then_write() {
    let fx = Fixture::new();
    let inode = fx.fs.insert(FILE_ID, 0).unwrap();

    let res = fx.compound(vec![fx.putfh(FILE_ID), write_op(0, b"payload")]).await;

    assert_eq!(res.status, nfsstat4::NFS4_OK);
    assert_eq!(res.tag, b"test");
    assert_eq!(res.resarray.len(), 2);
    assert_eq!(res.resarray[0], nfs_resop4::PUTFH(PUTFH4res { status: nfsstat4::NFS4_OK }));
    let nfs_resop4::WRITE(WRITE4res::Ok(resok)) = &res.resarray[1] else {
        panic!("unexpected result {:?}", res.resarray[1]);
    };
    assert_eq!(resok.count, 7);
    assert_eq!(resok.committed, stable_how4::FILE_SYNC4);
    assert_eq!(resok.writeverf, GENERATION.to_be_bytes());
    assert_eq!(inode.recorded_size(), 7);
    assert_eq!(fx.read_object(FILE_ID), b"payload");
}

#[tokio::test]
async fn several_writes_in_one_compound() {
    let fx = Fixture::new();
    let inode = fx.fs.insert(FILE_ID, 0).unwrap();

    let res = fx
        .compound(vec![fx.putfh(FILE_ID), write_op(0, b"abc"), write_op(3, b"def")])
        .await;

    assert_eq!(res.status, nfsstat4::NFS4_OK);
    assert_eq!(res.resarray.len(), 3);
    assert_eq!(inode.recorded_size(), 6);
    assert_eq!(fx.read_object(FILE_ID), b"abcdef");
}

#[tokio::test]
async fn write_without_putfh() {
    let fx = Fixture::new();

    let res = fx.compound(vec![write_op(0, b"payload")]).await;

    assert_eq!(res.status, nfsstat4::NFS4ERR_NOFILEHANDLE);
    assert_eq!(
        res.resarray,
        vec![nfs_resop4::WRITE(WRITE4res::Err(nfsstat4::NFS4ERR_NOFILEHANDLE))]
    );
}

#[tokio::test]
async fn stale_handle_stops_the_compound() {
    let fx = Fixture::new();
    let mut fh = fx.fs.id_to_fh(FILE_ID);
    fh.data[..8].copy_from_slice(&(GENERATION - 1).to_le_bytes());

    let res = fx
        .compound(vec![nfs_argop4::PUTFH(PUTFH4args { object: fh }), write_op(0, b"payload")])
        .await;

    assert_eq!(res.status, nfsstat4::NFS4ERR_STALE);
    assert_eq!(res.resarray, vec![nfs_resop4::PUTFH(PUTFH4res { status: nfsstat4::NFS4ERR_STALE })]);
    assert!(!fx.object_path(FILE_ID).exists());
}

#[tokio::test]
async fn unknown_object_is_stale() {
    let fx = Fixture::new();

    let res = fx.compound(vec![fx.putfh(FILE_ID)]).await;

    assert_eq!(res.status, nfsstat4::NFS4ERR_STALE);
}

#[tokio::test]
async fn malformed_handle() {
    let fx = Fixture::new();
    let fh = nfs_fh4 { data: vec![1, 2, 3] };

    let res = fx.compound(vec![nfs_argop4::PUTFH(PUTFH4args { object: fh })]).await;

    assert_eq!(res.status, nfsstat4::NFS4ERR_BADHANDLE);
}

#[tokio::test]
async fn removed_object_is_stale() {
    let fx = Fixture::new();
    fx.fs.insert(FILE_ID, 0).unwrap();
    let putfh = fx.putfh(FILE_ID);
    assert_eq!(fx.compound(vec![putfh.clone()]).await.status, nfsstat4::NFS4_OK);

    assert!(fx.fs.remove(FILE_ID).unwrap().is_some());
    let res = fx.compound(vec![putfh, write_op(0, b"payload")]).await;

    assert_eq!(res.status, nfsstat4::NFS4ERR_STALE);
    assert_eq!(res.resarray.len(), 1);
    assert!(!fx.object_path(FILE_ID).exists());
}

#[tokio::test]
async fn oversized_handle_is_undecodable() {
    let fx = Fixture::new();
    let fh = nfs_fh4 { data: vec![0; NFS4_FHSIZE + 1] };

    let res = fx.compound(vec![nfs_argop4::PUTFH(PUTFH4args { object: fh })]).await;

    assert_eq!(res.status, nfsstat4::NFS4ERR_BADXDR);
}

#[tokio::test]
async fn defined_operation_is_not_supported() {
    let fx = Fixture::new();
    fx.fs.insert(FILE_ID, 0).unwrap();

    let res = fx
        .compound(vec![
            fx.putfh(FILE_ID),
            nfs_argop4::Other(nfs_opnum4::OP_GETATTR as u32),
            write_op(0, b"never"),
        ])
        .await;

    assert_eq!(res.status, nfsstat4::NFS4ERR_NOTSUPP);
    assert_eq!(res.resarray.len(), 2);
    assert_eq!(res.resarray[1], nfs_resop4::NOTSUPP(nfs_opnum4::OP_GETATTR));
    assert!(!fx.object_path(FILE_ID).exists());
}

#[tokio::test]
async fn undefined_operation_is_illegal() {
    let fx = Fixture::new();

    let res = fx.compound(vec![nfs_argop4::Other(9999), write_op(0, b"never")]).await;

    assert_eq!(res.status, nfsstat4::NFS4ERR_OP_ILLEGAL);
    assert_eq!(res.resarray, vec![nfs_resop4::ILLEGAL(ILLEGAL4res::default())]);
}

#[tokio::test]
async fn operations_follow_the_minor_version() {
    let fx = Fixture::new();
    let sequence = || nfs_argop4::Other(nfs_opnum4::OP_SEQUENCE as u32);

    let v0 = COMPOUND4args { tag: Vec::new(), minorversion: 0, argarray: vec![sequence()] };
    let res = fx.compound_raw(&v0).await;
    assert_eq!(res.status, nfsstat4::NFS4ERR_OP_ILLEGAL);

    let v1 = COMPOUND4args { tag: Vec::new(), minorversion: 1, argarray: vec![sequence()] };
    let res = fx.compound_raw(&v1).await;
    assert_eq!(res.status, nfsstat4::NFS4ERR_NOTSUPP);
    assert_eq!(res.resarray, vec![nfs_resop4::NOTSUPP(nfs_opnum4::OP_SEQUENCE)]);
}

#[tokio::test]
async fn minor_version_mismatch() {
    let fx = Fixture::new();
    let args = COMPOUND4args { tag: b"v9".to_vec(), minorversion: 9, argarray: vec![] };

    let res = fx.compound_raw(&args).await;

    assert_eq!(res.status, nfsstat4::NFS4ERR_MINOR_VERS_MISMATCH);
    assert_eq!(res.tag, b"v9");
    assert!(res.resarray.is_empty());
}

#[tokio::test]
async fn empty_compound_succeeds() {
    let fx = Fixture::new();

    let res = fx.compound(vec![]).await;

    assert_eq!(res.status, nfsstat4::NFS4_OK);
    assert!(res.resarray.is_empty());
}

#[tokio::test]
async fn undecodable_write_arguments() {
    let fx = Fixture::new();
    fx.fs.insert(FILE_ID, 0).unwrap();

    let args = COMPOUND4args {
        tag: Vec::new(),
        minorversion: 1,
        argarray: vec![fx.putfh(FILE_ID), nfs_argop4::Other(nfs_opnum4::OP_WRITE as u32)],
    };
    let mut input = Vec::new();
    args.serialize(&mut input).unwrap();
    // stateid and offset, then an out of range stable_how4
    input.extend_from_slice(&[0u8; 4 + 12 + 8]);
    input.extend_from_slice(&7u32.to_be_bytes());

    let res = fx.compound_bytes(input).await;

    assert_eq!(res.status, nfsstat4::NFS4ERR_BADXDR);
    assert_eq!(res.resarray[1], nfs_resop4::WRITE(WRITE4res::Err(nfsstat4::NFS4ERR_BADXDR)));
}
