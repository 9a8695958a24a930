//! Ripple wire format — the byte-level encoding every generated type
//! builds on.
//!
//! Every frame on the wire is `hash (8B, big-endian) ‖ body`. The body
//! is a sequence of members in declaration order, encoded by the rules
//! below. All multi-byte values are big-endian, matching network byte
//! order — this is the one rule [`crate::hash`] and `ripple-codegen`
//! both assume and never deviate from.
//!
//! Changing anything in this module changes the wire format for every
//! schema compiled against it. There is no unsafe code here.

use crate::error::Error;

/// Size in bytes of the type-hash prefix on every frame.
pub const HASH_PREFIX_LEN: usize = 8;

/// A struct's or enum's generated encode/decode routines implement this.
///
/// `ripple-codegen` emits one impl per schema type; `ripple-runtime`'s
/// trampoline (§4.H) is generic over it.
pub trait Codec: Sized {
    /// Writes `hash ‖ encode_no_hash(self)` into `buf` starting at 0,
    /// returning the number of bytes written.
    fn encode(&self, buf: &mut [u8]) -> Result<usize, Error>;

    /// Writes this value's body only, no hash prefix. Used by nested
    /// struct members so the 8-byte hash appears exactly once per frame.
    fn encode_no_hash(&self, buf: &mut [u8], offset: usize) -> Result<usize, Error>;

    /// Reads `hash ‖ body` from `buf`, checking the hash against
    /// [`crate::hash::get_hash`] for `Self` before decoding the body.
    fn decode(buf: &[u8]) -> Result<Self, Error>;

    /// Reads this value's body only, no hash prefix.
    fn decode_no_hash(buf: &[u8], offset: usize) -> Result<(Self, usize), Error>;

    /// Exact size of this value's body, no hash prefix. Used when a
    /// struct composes another as a member, so the 8-byte hash is
    /// never double-counted.
    fn encoded_size_no_hash(&self) -> usize;

    /// Exact encoded size in bytes, including the 8-byte hash prefix.
    fn encoded_size(&self) -> usize {
        HASH_PREFIX_LEN + self.encoded_size_no_hash()
    }
}

// ── Byte order ────────────────────────────────────────────────────────────────

/// Checks that `len` more bytes are available at `offset` in a buffer
/// of `buf_len` bytes, translating the spec's "negative return value"
/// convention into a typed error.
fn check_room(buf_len: usize, offset: usize, len: usize) -> Result<(), Error> {
    let available = buf_len.saturating_sub(offset);
    if len > available {
        return Err(Error::DecodeTruncated {
            needed: len,
            available,
        });
    }
    Ok(())
}

fn check_write_room(buf_len: usize, offset: usize, len: usize) -> Result<(), Error> {
    let available = buf_len.saturating_sub(offset);
    if len > available {
        return Err(Error::EncodeOverflow {
            attempted: len,
            available,
        });
    }
    Ok(())
}

macro_rules! primitive_codec {
    ($ty:ty, $size:expr, $to_be:ident, $from_be:ident) => {
        impl PrimitiveWire for $ty {
            const WIRE_SIZE: usize = $size;

            fn write_be(&self, buf: &mut [u8], offset: usize) -> Result<usize, Error> {
                check_write_room(buf.len(), offset, Self::WIRE_SIZE)?;
                buf[offset..offset + Self::WIRE_SIZE].copy_from_slice(&self.$to_be());
                Ok(Self::WIRE_SIZE)
            }

            fn read_be(buf: &[u8], offset: usize) -> Result<(Self, usize), Error> {
                check_room(buf.len(), offset, Self::WIRE_SIZE)?;
                let mut bytes = [0u8; $size];
                bytes.copy_from_slice(&buf[offset..offset + Self::WIRE_SIZE]);
                Ok((<$ty>::$from_be(bytes), Self::WIRE_SIZE))
            }
        }
    };
}

/// A scalar primitive with a fixed big-endian wire width.
///
/// Implemented for every type name `ripple-schema` allows as a member
/// type: `bool`, `i8`, `i16`, `i32`, `i64`, `f32`, `f64`, `u8` (the
/// `byte` type).
pub trait PrimitiveWire: Sized + Copy {
    const WIRE_SIZE: usize;
    fn write_be(&self, buf: &mut [u8], offset: usize) -> Result<usize, Error>;
    fn read_be(buf: &[u8], offset: usize) -> Result<(Self, usize), Error>;
}

primitive_codec!(i16, 2, to_be_bytes, from_be_bytes);
primitive_codec!(i32, 4, to_be_bytes, from_be_bytes);
primitive_codec!(i64, 8, to_be_bytes, from_be_bytes);
primitive_codec!(u8, 1, to_be_bytes, from_be_bytes);

impl PrimitiveWire for i8 {
    const WIRE_SIZE: usize = 1;

    fn write_be(&self, buf: &mut [u8], offset: usize) -> Result<usize, Error> {
        check_write_room(buf.len(), offset, 1)?;
        buf[offset] = *self as u8;
        Ok(1)
    }

    fn read_be(buf: &[u8], offset: usize) -> Result<(Self, usize), Error> {
        check_room(buf.len(), offset, 1)?;
        Ok((buf[offset] as i8, 1))
    }
}

impl PrimitiveWire for bool {
    const WIRE_SIZE: usize = 1;

    /// Booleans are a single byte: 0 or 1.
    fn write_be(&self, buf: &mut [u8], offset: usize) -> Result<usize, Error> {
        check_write_room(buf.len(), offset, 1)?;
        buf[offset] = if *self { 1 } else { 0 };
        Ok(1)
    }

    /// Any non-zero byte decodes as `true`, per spec.
    fn read_be(buf: &[u8], offset: usize) -> Result<(Self, usize), Error> {
        check_room(buf.len(), offset, 1)?;
        Ok((buf[offset] != 0, 1))
    }
}

impl PrimitiveWire for f32 {
    const WIRE_SIZE: usize = 4;

    fn write_be(&self, buf: &mut [u8], offset: usize) -> Result<usize, Error> {
        check_write_room(buf.len(), offset, 4)?;
        buf[offset..offset + 4].copy_from_slice(&self.to_be_bytes());
        Ok(4)
    }

    fn read_be(buf: &[u8], offset: usize) -> Result<(Self, usize), Error> {
        check_room(buf.len(), offset, 4)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&buf[offset..offset + 4]);
        Ok((f32::from_be_bytes(bytes), 4))
    }
}

impl PrimitiveWire for f64 {
    const WIRE_SIZE: usize = 8;

    fn write_be(&self, buf: &mut [u8], offset: usize) -> Result<usize, Error> {
        check_write_room(buf.len(), offset, 8)?;
        buf[offset..offset + 8].copy_from_slice(&self.to_be_bytes());
        Ok(8)
    }

    fn read_be(buf: &[u8], offset: usize) -> Result<(Self, usize), Error> {
        check_room(buf.len(), offset, 8)?;
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&buf[offset..offset + 8]);
        Ok((f64::from_be_bytes(bytes), 8))
    }
}

/// Encodes `src` as `n` consecutive big-endian primitives.
///
/// Mirrors the reference `encode_array(buf, offset, maxlen, src, n)`
/// contract: returns the byte count written, or
/// `Err(Error::EncodeOverflow)` if `n * sizeof(T) > maxlen`.
pub fn encode_array<T: PrimitiveWire>(
    buf: &mut [u8],
    offset: usize,
    src: &[T],
) -> Result<usize, Error> {
    let total = T::WIRE_SIZE * src.len();
    check_write_room(buf.len(), offset, total)?;
    let mut pos = offset;
    for value in src {
        pos += value.write_be(buf, pos)?;
    }
    Ok(total)
}

/// Decodes `n` consecutive big-endian primitives into a freshly
/// allocated `Vec<T>`. Mirrors `decode_array`.
pub fn decode_array<T: PrimitiveWire>(
    buf: &[u8],
    offset: usize,
    n: usize,
) -> Result<(Vec<T>, usize), Error> {
    let total = T::WIRE_SIZE * n;
    check_room(buf.len(), offset, total)?;
    let mut out = Vec::with_capacity(n);
    let mut pos = offset;
    for _ in 0..n {
        let (value, used) = T::read_be(buf, pos)?;
        out.push(value);
        pos += used;
    }
    Ok((out, pos - offset))
}

/// Raw byte arrays carry no length prefix — the declaring dimension is
/// the length. This is just `encode_array::<u8>`/`decode_array::<u8>`
/// spelled out for callers that don't want to name the generic.
pub fn encode_bytes(buf: &mut [u8], offset: usize, src: &[u8]) -> Result<usize, Error> {
    check_write_room(buf.len(), offset, src.len())?;
    buf[offset..offset + src.len()].copy_from_slice(src);
    Ok(src.len())
}

pub fn decode_bytes(buf: &[u8], offset: usize, n: usize) -> Result<(Vec<u8>, usize), Error> {
    check_room(buf.len(), offset, n)?;
    Ok((buf[offset..offset + n].to_vec(), n))
}

/// Strings are `len32 ‖ utf8_bytes ‖ 0x00`, where `len32` counts the
/// UTF-8 bytes *and* the trailing NUL. NUL-terminated so a C-style
/// consumer can treat the payload as a normal C string without a copy,
/// while `len32` still bounds the read for everyone else.
pub fn encode_string(buf: &mut [u8], offset: usize, s: &str) -> Result<usize, Error> {
    let body_len = s.len() + 1;
    let total = 4 + body_len;
    check_write_room(buf.len(), offset, total)?;
    let mut pos = offset;
    pos += (body_len as i32).write_be(buf, pos)?;
    pos += encode_bytes(buf, pos, s.as_bytes())?;
    buf[pos] = 0;
    pos += 1;
    Ok(pos - offset)
}

pub fn decode_string(buf: &[u8], offset: usize) -> Result<(String, usize), Error> {
    let (len32, used) = i32::read_be(buf, offset)?;
    if len32 < 1 {
        return Err(Error::DecodeTruncated {
            needed: 1,
            available: 0,
        });
    }
    let body_len = len32 as usize;
    check_room(buf.len(), offset + used, body_len)?;
    let bytes_len = body_len - 1; // exclude the trailing NUL
    let (raw, _) = decode_bytes(buf, offset + used, bytes_len)?;
    let s = String::from_utf8(raw).map_err(|e| Error::DecodeTruncated {
        needed: e.utf8_error().valid_up_to(),
        available: bytes_len,
    })?;
    Ok((s, used + body_len))
}

/// Writes the 8-byte big-endian type-hash frame prefix.
pub fn encode_hash_prefix(buf: &mut [u8], offset: usize, hash: i64) -> Result<usize, Error> {
    hash.write_be(buf, offset)
}

/// Reads and validates the 8-byte frame prefix against `expected`.
pub fn decode_hash_prefix(buf: &[u8], offset: usize, expected: i64) -> Result<usize, Error> {
    let (actual, used) = i64::read_be(buf, offset)?;
    if actual != expected {
        return Err(Error::HashMismatch { expected, actual });
    }
    Ok(used)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_round_trip() {
        let mut buf = [0u8; 8];
        let n = 42i64.write_be(&mut buf, 0).unwrap();
        assert_eq!(n, 8);
        let (v, used) = i64::read_be(&buf, 0).unwrap();
        assert_eq!(v, 42);
        assert_eq!(used, 8);
    }

    #[test]
    fn bool_accepts_any_nonzero() {
        let mut buf = [0u8; 1];
        buf[0] = 0x7f;
        let (v, _) = bool::read_be(&buf, 0).unwrap();
        assert!(v);
        buf[0] = 0;
        let (v, _) = bool::read_be(&buf, 0).unwrap();
        assert!(!v);
    }

    #[test]
    fn array_round_trip() {
        let mut buf = [0u8; 24];
        let src = [1.0f64, 2.0, 3.0];
        let written = encode_array(&mut buf, 0, &src).unwrap();
        assert_eq!(written, 24);
        let (decoded, read) = decode_array::<f64>(&buf, 0, 3).unwrap();
        assert_eq!(read, 24);
        assert_eq!(decoded, src);
    }

    #[test]
    fn string_round_trip() {
        let mut buf = [0u8; 64];
        let written = encode_string(&mut buf, 0, "hello").unwrap();
        // 4 (len) + 5 (bytes) + 1 (NUL)
        assert_eq!(written, 10);
        let (s, read) = decode_string(&buf, 0).unwrap();
        assert_eq!(s, "hello");
        assert_eq!(read, written);
    }

    #[test]
    fn encode_overflow_is_detected() {
        let mut buf = [0u8; 2];
        let err = 123i32.write_be(&mut buf, 0).unwrap_err();
        assert!(matches!(err, Error::EncodeOverflow { .. }));
    }

    #[test]
    fn decode_truncated_is_detected() {
        let buf = [0u8; 2];
        let err = i32::read_be(&buf, 0).unwrap_err();
        assert!(matches!(err, Error::DecodeTruncated { .. }));
    }

    #[test]
    fn hash_prefix_mismatch_is_rejected() {
        let mut buf = [0u8; 8];
        encode_hash_prefix(&mut buf, 0, 111).unwrap();
        let err = decode_hash_prefix(&buf, 0, 222).unwrap_err();
        assert!(matches!(err, Error::HashMismatch { expected: 222, actual: 111 }));
    }
}
