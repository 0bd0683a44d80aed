//! Bit-level stream plumbing.
//!
//! The codec only talks to [`BitSource`], [`Rewind`] and [`BitSink`]; the
//! default implementations wrap `bitstream-io` readers and writers in
//! big-endian (MSB first) mode.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Source of bits. `Ok(None)` means the stream has no more data.
pub trait BitSource {
    fn read_bits(&mut self, bits: u32) -> io::Result<Option<u32>>;
}

/// A source that can be reset to its first bit.
pub trait Rewind {
    fn rewind(&mut self) -> io::Result<()>;
}

/// Sink of bits.
pub trait BitSink {
    /// Writes the low `bits` bits of `value`, most significant first.
    fn write_bits(&mut self, bits: u32, value: u32) -> io::Result<()>;

    /// Pads the final partial byte with zero bits and flushes.
    fn close(&mut self) -> io::Result<()>;
}

fn low_bits(bits: u32, value: u32) -> u32 {
    if bits >= 32 {
        value
    } else {
        value & ((1u32 << bits) - 1)
    }
}

/// [`BitSource`] over any byte reader.
pub struct BitInputStream<R: Read> {
    inner: BitReader<R, BigEndian>,
    bits_read: u64,
}

impl<R: Read> BitInputStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: BitReader::endian(reader, BigEndian),
            bits_read: 0,
        }
    }

    /// Bits successfully read since creation, across rewinds.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    pub fn into_inner(self) -> R {
        self.inner.into_reader()
    }
}

impl<R: Read> BitSource for BitInputStream<R> {
    fn read_bits(&mut self, bits: u32) -> io::Result<Option<u32>> {
        if bits == 0 {
            return Ok(Some(0));
        }
        match self.inner.read::<u32>(bits) {
            Ok(value) => {
                self.bits_read += u64::from(bits);
                Ok(Some(value))
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e),
        }
    }
}

impl<R: Read + Seek> Rewind for BitInputStream<R> {
    fn rewind(&mut self) -> io::Result<()> {
        // drop any partially consumed byte so the inner reader is reachable
        self.inner.byte_align();
        let reader = self
            .inner
            .reader()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "reader not byte aligned"))?;
        reader.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

/// [`BitSink`] over any byte writer.
pub struct BitOutputStream<W: Write> {
    inner: BitWriter<W, BigEndian>,
    bits_written: u64,
}

impl<W: Write> BitOutputStream<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: BitWriter::endian(writer, BigEndian),
            bits_written: 0,
        }
    }

    /// Bits written since creation, not counting close padding.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Returns the inner writer. Call [`BitSink::close`] first or a
    /// trailing partial byte is lost.
    pub fn into_inner(self) -> W {
        self.inner.into_writer()
    }
}

impl<W: Write> BitSink for BitOutputStream<W> {
    fn write_bits(&mut self, bits: u32, value: u32) -> io::Result<()> {
        if bits == 0 {
            return Ok(());
        }
        self.inner.write(bits, low_bits(bits, value))?;
        self.bits_written += u64::from(bits);
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        self.inner.byte_align()?;
        match self.inner.writer() {
            Some(writer) => writer.flush(),
            None => Err(io::Error::new(io::ErrorKind::Other, "writer not byte aligned")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_write_pads_final_byte() {
        let mut out = BitOutputStream::new(Vec::new());
        out.write_bits(3, 0b101).unwrap();
        out.close().unwrap();
        assert_eq!(out.bits_written(), 3);
        assert_eq!(out.into_inner(), vec![0b1010_0000]);
    }

    #[test]
    fn test_write_masks_high_bits() {
        let mut out = BitOutputStream::new(Vec::new());
        out.write_bits(4, 0xFF).unwrap();
        out.write_bits(4, 0x00).unwrap();
        out.close().unwrap();
        assert_eq!(out.into_inner(), vec![0xF0]);
    }

    #[test]
    fn test_read_reports_end_of_data() {
        let mut input = BitInputStream::new(Cursor::new(vec![0xAB]));
        assert_eq!(input.read_bits(4).unwrap(), Some(0xA));
        assert_eq!(input.read_bits(4).unwrap(), Some(0xB));
        assert_eq!(input.read_bits(1).unwrap(), None);
        assert_eq!(input.bits_read(), 8);
    }

    #[test]
    fn test_read_past_end_mid_word() {
        let mut input = BitInputStream::new(Cursor::new(vec![0xFF]));
        assert_eq!(input.read_bits(9).unwrap(), None);
    }

    #[test]
    fn test_rewind_restarts_stream() {
        let mut input = BitInputStream::new(Cursor::new(vec![0x12, 0x34]));
        assert_eq!(input.read_bits(8).unwrap(), Some(0x12));
        assert_eq!(input.read_bits(3).unwrap(), Some(0b001));
        input.rewind().unwrap();
        assert_eq!(input.read_bits(16).unwrap(), Some(0x1234));
        assert_eq!(input.read_bits(8).unwrap(), None);
        input.rewind().unwrap();
        assert_eq!(input.read_bits(8).unwrap(), Some(0x12));
    }

    #[test]
    fn test_full_word_roundtrip() {
        let mut out = BitOutputStream::new(Vec::new());
        out.write_bits(32, 0xFACE_8201).unwrap();
        out.close().unwrap();
        let bytes = out.into_inner();
        assert_eq!(bytes, vec![0xFA, 0xCE, 0x82, 0x01]);
        let mut input = BitInputStream::new(Cursor::new(bytes));
        assert_eq!(input.read_bits(32).unwrap(), Some(0xFACE_8201));
    }
}
