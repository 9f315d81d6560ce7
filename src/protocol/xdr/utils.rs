use std::io::{Read, Write};

use num_traits::ToPrimitive;

use super::{deserialize, Serialize};

pub const ALIGNMENT: usize = 4;

fn padding_len(src_len: usize) -> usize {
    (ALIGNMENT - (src_len % ALIGNMENT)) % ALIGNMENT
}

pub fn read_padding(src_len: usize, src: &mut impl Read) -> std::io::Result<()> {
    let pad_len = padding_len(src_len);
    if pad_len > 0 {
        let mut padding: [u8; ALIGNMENT] = Default::default();
        src.read_exact(&mut padding[..pad_len])?;
    }
    Ok(())
}

pub fn write_padding(src_len: usize, dest: &mut impl Write) -> std::io::Result<()> {
    let pad_len = padding_len(src_len);
    if pad_len > 0 {
        let padding: [u8; ALIGNMENT] = Default::default();
        dest.write_all(&padding[..pad_len])?;
    }
    Ok(())
}

/// Lengths travel as `unsigned int` on the wire.
pub fn write_len(len: usize, dest: &mut impl Write) -> std::io::Result<()> {
    let Some(len) = len.to_u32() else {
        return Err(invalid_data("length does not fit into `u32`"));
    };
    len.serialize(dest)
}

pub fn read_len(src: &mut impl Read) -> std::io::Result<usize> {
    deserialize::<u32>(src)?
        .to_usize()
        .ok_or_else(|| invalid_data("length does not fit into `usize`"))
}

pub fn invalid_data(m: &str) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, m)
}
