use std::io::{self, Read, Write};

/// Big-endian 16-bit unsigned integer helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U16BE(pub u16);

impl U16BE {
    /// Reads a big-endian 16-bit unsigned integer from the given reader.
    pub fn read<R: Read + ?Sized>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; 2];
        r.read_exact(&mut buf)?;
        Ok(U16BE(u16::from_be_bytes(buf)))
    }

    /// Writes the wrapped integer to the provided writer in big-endian byte order.
    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.0.to_be_bytes())
    }
}

/// Big-endian 32-bit unsigned integer helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U32BE(pub u32);

impl U32BE {
    /// Reads a big-endian 32-bit unsigned integer from a reader.
    pub fn read<R: Read + ?Sized>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; 4];
        r.read_exact(&mut buf)?;
        Ok(U32BE(u32::from_be_bytes(buf)))
    }

    /// Writes the wrapped integer to the provided writer in big-endian byte order.
    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.0.to_be_bytes())
    }
}

/// Big-endian 64-bit unsigned integer helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U64BE(pub u64);

impl U64BE {
    /// Reads a big-endian 64-bit unsigned integer from a reader.
    pub fn read<R: Read + ?Sized>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; 8];
        r.read_exact(&mut buf)?;
        Ok(U64BE(u64::from_be_bytes(buf)))
    }

    /// Writes the wrapped integer to the provided writer in big-endian byte order.
    pub fn write<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.0.to_be_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn u16be_roundtrip() {
        let value = U16BE(0xABCD);
        let mut buf = Vec::new();
        value.write(&mut buf).unwrap();
        assert_eq!(buf, vec![0xAB, 0xCD]);
        let mut cursor = Cursor::new(buf);
        let decoded = U16BE::read(&mut cursor).unwrap();
        assert_eq!(decoded.0, value.0);
    }

    #[test]
    fn u32be_roundtrip() {
        let value = U32BE(0x12345678);
        let mut buf = Vec::new();
        value.write(&mut buf).unwrap();
        assert_eq!(buf, vec![0x12, 0x34, 0x56, 0x78]);
        let mut cursor = Cursor::new(buf);
        let decoded = U32BE::read(&mut cursor).unwrap();
        assert_eq!(decoded.0, value.0);
    }

    #[test]
    fn u64be_roundtrip() {
        let value = U64BE(0x123456789ABCDEF0);
        let mut buf = Vec::new();
        value.write(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        let decoded = U64BE::read(&mut cursor).unwrap();
        assert_eq!(decoded.0, value.0);
    }

    #[test]
    fn be_edge_values() {
        for &val in &[0u16, u16::MAX] {
            let mut buf = Vec::new();
            U16BE(val).write(&mut buf).unwrap();
            let decoded = U16BE::read(&mut Cursor::new(buf)).unwrap();
            assert_eq!(decoded.0, val);
        }
        for &val in &[0u64, u64::MAX] {
            let mut buf = Vec::new();
            U64BE(val).write(&mut buf).unwrap();
            let decoded = U64BE::read(&mut Cursor::new(buf)).unwrap();
            assert_eq!(decoded.0, val);
        }
    }

    #[test]
    fn truncated_input_fails() {
        let mut cursor = Cursor::new(vec![0x12u8, 0x34, 0x56]);
        assert!(U32BE::read(&mut cursor).is_err());
    }
}
