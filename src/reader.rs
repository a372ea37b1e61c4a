use std::io::{self, Read, Seek, SeekFrom};

use crate::{
    error::ParseError,
    utils::{grib_int_from_bytes, grib_uint_from_bytes},
};

/// Octet-oriented access to a seekable GRIB byte source.
///
/// All multi-octet integers in GRIB are big-endian; signed fields use the
/// sign-magnitude convention (high bit of the first octet is the sign).
/// Every method advances the position past the octets it consumed.
///
/// The trait is implemented for every `Read + Seek` type, so a
/// `std::io::Cursor` over a byte buffer or a `BufReader<File>` can be used
/// directly.
pub trait GribRead: Read + Seek {
    fn read_u8(&mut self) -> Result<u8, ParseError> {
        let mut buf = [0; 1];
        self.read_octets_into(&mut buf)?;
        Ok(buf[0])
    }

    /// Reads a big-endian unsigned integer of 1 to 4 octets.
    fn read_uint(&mut self, nbytes: usize) -> Result<u32, ParseError> {
        let mut buf = [0; 4];
        if !(1..=4).contains(&nbytes) {
            return Err(ParseError::InvalidOctetCount(nbytes));
        }
        self.read_octets_into(&mut buf[..nbytes])?;
        Ok(grib_uint_from_bytes(&buf[..nbytes]))
    }

    /// Reads a sign-magnitude signed integer of 1 to 4 octets.
    fn read_int(&mut self, nbytes: usize) -> Result<i32, ParseError> {
        let mut buf = [0; 4];
        if !(1..=4).contains(&nbytes) {
            return Err(ParseError::InvalidOctetCount(nbytes));
        }
        self.read_octets_into(&mut buf[..nbytes])?;
        Ok(grib_int_from_bytes(&buf[..nbytes]))
    }

    /// Reads a fixed-size block of octets.
    fn read_octets(&mut self, n: usize) -> Result<Box<[u8]>, ParseError> {
        let mut buf = vec![0; n];
        self.read_octets_into(&mut buf)?;
        Ok(buf.into_boxed_slice())
    }

    fn read_octets_into(&mut self, buf: &mut [u8]) -> Result<(), ParseError> {
        let pos = self.stream_position()?;
        self.read_exact(buf).map_err(|e| truncation_at(e, pos))
    }

    fn position(&mut self) -> Result<u64, ParseError> {
        Ok(self.stream_position()?)
    }

    fn seek_to(&mut self, pos: u64) -> Result<u64, ParseError> {
        Ok(self.seek(SeekFrom::Start(pos))?)
    }

    fn skip(&mut self, n: i64) -> Result<u64, ParseError> {
        Ok(self.seek(SeekFrom::Current(n))?)
    }
}

impl<R: Read + Seek + ?Sized> GribRead for R {}

fn truncation_at(e: io::Error, pos: u64) -> ParseError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        ParseError::UnexpectedEndOfData(pos as usize)
    } else {
        ParseError::ReadError(e.to_string())
    }
}
