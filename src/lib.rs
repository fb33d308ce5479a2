#![deny(clippy::all)]
#![warn(clippy::pedantic)]

//! A decoder for Hjson, a human-friendly superset of JSON: optional quotes
//! and commas, `#`/`//`/`/* */` comments, triple-quoted multi-line strings,
//! and a braceless root object as a convenience for config-file use. This
//! crate only decodes — it does not re-encode a `Value` tree back to text.

mod error;
mod literal;
mod number;
mod options;
mod parser;
mod scanner;
mod trivia;
mod value;

pub use error::{Error, Result};
pub use options::DecoderOptions;
pub use value::{Kind, Map, Value};

use std::ffi::CStr;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Decodes a raw byte buffer.
///
/// # Errors
/// Returns `Error::Syntax` for any malformed Hjson input.
pub fn unmarshal_bytes(bytes: &[u8], options: DecoderOptions) -> Result<Value> {
    let mut options = options;
    parser::decode(bytes.to_vec(), &mut options)
}

/// Decodes a C string, as a convenience for FFI callers. A null pointer
/// (represented here as `None`) yields `Ok(Value::undefined())` rather
/// than an error, mirroring how a missing optional argument is treated
/// elsewhere in the decoder.
///
/// # Errors
/// Returns `Error::Syntax` for any malformed Hjson input.
pub fn unmarshal_c_string(s: Option<&CStr>, options: DecoderOptions) -> Result<Value> {
    match s {
        None => Ok(Value::undefined()),
        Some(s) => unmarshal_bytes(s.to_bytes(), options),
    }
}

/// Decodes a UTF-8 string slice.
///
/// # Errors
/// Returns `Error::Syntax` for any malformed Hjson input.
pub fn unmarshal_str(text: &str, options: DecoderOptions) -> Result<Value> {
    unmarshal_bytes(text.as_bytes(), options)
}

/// Reads and decodes a file. Config files conventionally end with a
/// trailing newline that is not part of the document; exactly one
/// trailing `\n`, one trailing `\r` before it, and any trailing NUL
/// padding are trimmed before decoding, so they never surface as
/// trailing garbage or as a dangling empty final entry.
///
/// # Errors
/// Returns `Error::FileError` if the file cannot be read, or
/// `Error::Syntax` for any malformed Hjson input.
pub fn unmarshal_from_file(path: impl AsRef<Path>, options: DecoderOptions) -> Result<Value> {
    let bytes = fs::read(path)?;
    unmarshal_bytes(trim_trailing_padding(&bytes), options)
}

/// Decodes from any `Read` implementor by draining it into a buffer first.
///
/// # Errors
/// Returns `Error::FileError` if reading fails, or `Error::Syntax` for any
/// malformed Hjson input.
pub fn unmarshal_from_reader(mut reader: impl Read, options: DecoderOptions) -> Result<Value> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    unmarshal_bytes(trim_trailing_padding(&bytes), options)
}

fn trim_trailing_padding(bytes: &[u8]) -> &[u8] {
    let mut end = bytes.len();
    while end > 0 && bytes[end - 1] == 0 {
        end -= 1;
    }
    if end > 0 && bytes[end - 1] == b'\n' {
        end -= 1;
        if end > 0 && bytes[end - 1] == b'\r' {
            end -= 1;
        }
    }
    &bytes[..end]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decodes_a_braced_object() {
        let v = unmarshal_str("{a: 1}", DecoderOptions::default()).unwrap();
        assert_eq!(v.as_map().unwrap().get("a").unwrap().kind, Kind::Int64(1));
    }

    #[test]
    fn decodes_a_braceless_root_object() {
        let v = unmarshal_str("a: 1\nb: 2\n", DecoderOptions::default()).unwrap();
        let map = v.as_map().unwrap();
        assert_eq!(map.get("a").unwrap().kind, Kind::Int64(1));
        assert_eq!(map.get("b").unwrap().kind, Kind::Int64(2));
    }

    #[test]
    fn decodes_a_braceless_root_scalar() {
        let v = unmarshal_str("42", DecoderOptions::default()).unwrap();
        assert_eq!(v.kind, Kind::Int64(42));
    }

    #[test]
    fn null_c_string_yields_undefined() {
        let v = unmarshal_c_string(None, DecoderOptions::default()).unwrap();
        assert!(!v.defined());
    }

    #[test]
    fn trims_trailing_newline_and_nul_padding() {
        assert_eq!(trim_trailing_padding(b"a: 1\n"), b"a: 1");
        assert_eq!(trim_trailing_padding(b"a: 1\r\n"), b"a: 1");
        assert_eq!(trim_trailing_padding(b"a: 1\n\0\0"), b"a: 1");
    }
}
