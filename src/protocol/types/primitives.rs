use std::io::{self, Cursor, Read, Write};

/// Reads a single byte from the given reader.
pub fn read_u8(r: &mut dyn Read) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Writes a single byte to the provided writer.
pub fn write_u8(w: &mut dyn Write, value: u8) -> io::Result<()> {
    w.write_all(&[value])
}

/// Reads `length` bytes from the cursor into a fresh buffer.
///
/// The declared length is validated against both `max` and the bytes still
/// available in the cursor before any allocation happens, so a hostile
/// length field cannot trigger an oversized allocation.
pub fn read_bytes(cursor: &mut Cursor<&[u8]>, length: usize, max: usize) -> io::Result<Vec<u8>> {
    check_remaining(cursor, length, max)?;
    let mut buf = vec![0u8; length];
    cursor.read_exact(&mut buf)?;
    Ok(buf)
}

/// Advances the cursor past `length` bytes without reading them.
///
/// Validation matches [`read_bytes`].
pub fn skip_bytes(cursor: &mut Cursor<&[u8]>, length: usize, max: usize) -> io::Result<()> {
    check_remaining(cursor, length, max)?;
    cursor.set_position(cursor.position() + length as u64);
    Ok(())
}

fn check_remaining(cursor: &Cursor<&[u8]>, length: usize, max: usize) -> io::Result<()> {
    if length > max {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("declared length {} exceeds maximum allowed {}", length, max),
        ));
    }

    let remaining = (cursor.get_ref().len() as u64).saturating_sub(cursor.position()) as usize;
    if length > remaining {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("declared length {} exceeds remaining input {}", length, remaining),
        ));
    }

    Ok(())
}
