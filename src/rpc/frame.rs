//! Length-prefixed framing over a `TcpStream`. A `TcpStream` has no message boundaries,
//! so a 4-byte big-endian length is prepended before each `bincode`-encoded payload.

use std::io::{self, Read, Write};

/// Frames larger than this are rejected rather than trusted from the wire; generous for
/// the small, fixed-shape messages this protocol exchanges.
const MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

pub fn write_frame<W: Write>(w: &mut W, bytes: &[u8]) -> io::Result<()> {
    let len = bytes.len() as u32;
    w.write_all(&len.to_be_bytes())?;
    w.write_all(bytes)?;
    w.flush()
}

pub fn read_frame<R: Read>(r: &mut R) -> io::Result<Vec<u8>> {
    let mut len_buf = [0u8; 4];
    r.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf);
    if len > MAX_FRAME_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame of {len} bytes exceeds the {MAX_FRAME_LEN} byte limit"),
        ));
    }
    let mut buf = vec![0u8; len as usize];
    r.read_exact(&mut buf)?;
    Ok(buf)
}
