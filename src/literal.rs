//! The value-bearing readers: quoted strings (with `\uXXXX` escapes),
//! triple-quoted multi-line strings, unquoted key names, and the
//! quoteless-value disambiguator (`read_tfnns`, Hjson's "true / false /
//! null / number / string" guesser).

use crate::error::{Error, Result};
use crate::number::{try_parse_number, Number};
use crate::scanner::Scanner;
use crate::value::Value;

fn is_punctuator(ch: u8) -> bool {
    matches!(ch, b'{' | b'}' | b'[' | b']' | b',' | b':')
}

fn syntax_err(scanner: &Scanner, at: usize, message: impl Into<String>) -> Error {
    let (line, column, context) = scanner.locate(at);
    Error::syntax(message, line, column, context)
}

/// Encodes a raw 21-bit code point as 1-4 UTF-8 bytes, without going
/// through `char` (which would reject surrogate-range values). Hjson's
/// `\uXXXX` escape does not combine surrogate pairs (spec.md §4.3): each
/// escape is decoded independently, so a lone surrogate must still be
/// representable in the output buffer even though it is not a valid
/// Unicode scalar value on its own.
fn push_utf8_codepoint(out: &mut Vec<u8>, cp: u32) {
    if cp < 0x80 {
        out.push(cp as u8);
    } else if cp < 0x800 {
        out.push(0xC0 | (cp >> 6) as u8);
        out.push(0x80 | (cp & 0x3F) as u8);
    } else if cp < 0x10000 {
        out.push(0xE0 | (cp >> 12) as u8);
        out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
        out.push(0x80 | (cp & 0x3F) as u8);
    } else {
        out.push(0xF0 | (cp >> 18) as u8);
        out.push(0x80 | ((cp >> 12) & 0x3F) as u8);
        out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
        out.push(0x80 | (cp & 0x3F) as u8);
    }
}

/// Bytes accumulated while reading a quoted or multi-line string may
/// contain a lone UTF-16 surrogate smuggled in through `\uXXXX` (see
/// `push_utf8_codepoint`). That is not valid UTF-8 by the strict
/// definition, but it is exactly what this decoder is contracted to
/// produce, so the conversion back to `String` has to bypass validation.
///
/// # Safety
/// Every byte in `bytes` was either copied verbatim from the (valid
/// UTF-8) input buffer or emitted by `push_utf8_codepoint`, which always
/// writes a complete, self-consistent multi-byte sequence for the code
/// point it was given. The only way this could produce bytes Rust
/// considers ill-formed is the surrogate case above, which Hjson's own
/// spec requires us to preserve rather than reject.
fn string_from_raw_bytes(bytes: Vec<u8>) -> String {
    unsafe { String::from_utf8_unchecked(bytes) }
}

/// Reads a quoted string (`'...'` or `"..."`). `scanner.current()` must be
/// the opening quote on entry; on return the scanner sits just past the
/// closing quote. If the opening quote is `'` and the body turns out to
/// be a triple-quote opener, dispatches to the multi-line reader instead.
pub fn read_quoted_or_multiline_string(scanner: &mut Scanner) -> Result<String> {
    let quote = scanner.current();
    let open_pos = scanner.position();
    scanner.advance();

    if quote == b'\'' && scanner.current() == b'\'' && scanner.peek(1) == b'\'' {
        scanner.advance();
        scanner.advance();
        return read_multiline_string(scanner, open_pos);
    }

    read_quoted_string_body(scanner, quote)
}

fn read_quoted_string_body(scanner: &mut Scanner, quote: u8) -> Result<String> {
    let start = scanner.position();
    let mut out = Vec::new();

    loop {
        match scanner.current() {
            0 => return Err(syntax_err(scanner, start, "Bad string")),
            b'\n' | b'\r' => {
                return Err(syntax_err(scanner, scanner.position(), "Bad string containing newline"));
            }
            ch if ch == quote => {
                scanner.advance();
                return Ok(string_from_raw_bytes(out));
            }
            b'\\' => {
                scanner.advance();
                read_escape(scanner, &mut out)?;
            }
            ch => {
                out.push(ch);
                scanner.advance();
            }
        }
    }
}

fn read_escape(scanner: &mut Scanner, out: &mut Vec<u8>) -> Result<()> {
    let escape_pos = scanner.position();
    match scanner.current() {
        b'"' => {
            out.push(b'"');
            scanner.advance();
        }
        b'\'' => {
            out.push(b'\'');
            scanner.advance();
        }
        b'\\' => {
            out.push(b'\\');
            scanner.advance();
        }
        b'/' => {
            out.push(b'/');
            scanner.advance();
        }
        b'b' => {
            out.push(0x08);
            scanner.advance();
        }
        b'f' => {
            out.push(0x0C);
            scanner.advance();
        }
        b'n' => {
            out.push(b'\n');
            scanner.advance();
        }
        b'r' => {
            out.push(b'\r');
            scanner.advance();
        }
        b't' => {
            out.push(b'\t');
            scanner.advance();
        }
        b'u' => {
            scanner.advance();
            let cp = read_hex4(scanner, escape_pos)?;
            if cp >= 0x110000 {
                return Err(syntax_err(scanner, escape_pos, format!("Bad \\u char {cp:x}")));
            }
            push_utf8_codepoint(out, cp);
        }
        0 => return Err(syntax_err(scanner, escape_pos, "Bad string")),
        other => {
            return Err(syntax_err(
                scanner,
                escape_pos,
                format!("Bad escape \\{}", other as char),
            ));
        }
    }
    Ok(())
}

fn read_hex4(scanner: &mut Scanner, escape_pos: usize) -> Result<u32> {
    let mut value: u32 = 0;
    for _ in 0..4 {
        let ch = scanner.current();
        let digit = match ch {
            b'0'..=b'9' => (ch - b'0') as u32,
            b'a'..=b'f' => (ch - b'a' + 10) as u32,
            b'A'..=b'F' => (ch - b'A' + 10) as u32,
            0 => return Err(syntax_err(scanner, escape_pos, "Bad string")),
            _ => return Err(syntax_err(scanner, escape_pos, format!("Bad \\u char {}", ch as char))),
        };
        value = (value << 4) | digit;
        scanner.advance();
    }
    Ok(value)
}

/// Reads the body of a `'''...'''` string. `open_pos` is the byte offset
/// of the opening `'` of the (already-consumed) triple-quote marker; the
/// indentation width is measured by walking backwards from there to the
/// previous newline or the start of the buffer (spec.md §4.3).
fn read_multiline_string(scanner: &mut Scanner, open_pos: usize) -> Result<String> {
    let indent = {
        let mut i = open_pos;
        let mut n = 0usize;
        while i > 0 && scanner.slice(i - 1, i) != b"\n" {
            i -= 1;
            n += 1;
        }
        n
    };

    while matches!(scanner.current(), b' ' | b'\t') {
        scanner.advance();
    }
    match scanner.current() {
        b'\n' => {
            scanner.advance();
        }
        _ => return Err(syntax_err(scanner, open_pos, "Bad multiline string")),
    }

    let mut out = Vec::new();
    let mut to_strip = indent;
    loop {
        match scanner.current() {
            0 => return Err(syntax_err(scanner, open_pos, "Bad multiline string")),
            b'\'' if scanner.peek(1) == b'\'' && scanner.peek(2) == b'\'' => {
                scanner.advance();
                scanner.advance();
                scanner.advance();
                if out.last() == Some(&b'\n') {
                    out.pop();
                }
                return Ok(string_from_raw_bytes(out));
            }
            b'\r' => {
                scanner.advance();
            }
            b'\n' => {
                out.push(b'\n');
                scanner.advance();
                to_strip = indent;
            }
            ch @ (b' ' | b'\t') if to_strip > 0 => {
                to_strip -= 1;
                let _ = ch;
                scanner.advance();
            }
            ch => {
                to_strip = 0;
                out.push(ch);
                scanner.advance();
            }
        }
    }
}

/// Reads a map key: a quoted string, or an unquoted run of characters
/// terminated by `:`. Unquoted keys may not contain `{}[],:` or internal
/// whitespace (leading/trailing whitespace around the key is trivia,
/// handled by the caller before/after this call).
pub fn read_keyname(scanner: &mut Scanner) -> Result<String> {
    if scanner.current() == b'"' || scanner.current() == b'\'' {
        return read_quoted_or_multiline_string(scanner);
    }

    let mut name = Vec::new();
    let start = scanner.position();
    let mut space: Option<usize> = None;

    loop {
        match scanner.current() {
            b':' => {
                if name.is_empty() {
                    return Err(syntax_err(
                        scanner,
                        scanner.position(),
                        "Found ':' but no key name (for an empty key name use quotes)",
                    ));
                }
                if let Some(space_at) = space {
                    if space_at != name.len() {
                        return Err(syntax_err(
                            scanner,
                            start + space_at,
                            "Found whitespace in your key name (use quotes if needed)",
                        ));
                    }
                }
                return Ok(String::from_utf8_lossy(&name).into_owned());
            }
            0 => {
                return Err(syntax_err(
                    scanner,
                    scanner.position(),
                    "Found EOF while looking for a key name (check your syntax for error)",
                ));
            }
            ch if ch <= b' ' => {
                if name.is_empty() {
                    // Leading whitespace before the key: not part of it.
                } else if space.is_none() {
                    space = Some(name.len());
                }
                scanner.advance();
            }
            ch if is_punctuator(ch) => {
                return Err(syntax_err(
                    scanner,
                    scanner.position(),
                    format!("Found '{}' where a key name was expected (check your syntax for error)", ch as char),
                ));
            }
            ch => {
                // Pushed as a raw byte, not `ch as char`: multi-byte UTF-8
                // characters arrive one byte per `advance()`, and casting
                // each byte to `char` independently would re-encode it
                // into a different, wrong byte sequence.
                name.push(ch);
                space = None;
                scanner.advance();
            }
        }
    }
}

/// The result of `read_tfnns`, Hjson's quoteless-value disambiguator.
///
/// Accumulates characters up to end-of-line, EOF, a comment marker, or a
/// top-level `,`, `}`, `]` — whichever comes first. None of those five are
/// ever consumed into the value itself; the caller (the container the value
/// sits in) decides what the punctuator means. The accumulated text is then
/// classified as `true`/`false`/`null`/a number/a plain string by
/// `finish_tfnns`, independent of which terminator ended the scan.
///
/// On return the scanner sits immediately after the last non-whitespace
/// byte of the value, never past trailing whitespace: that whitespace is
/// left for the caller's trivia reader to attribute as `comment_after`
/// rather than being silently consumed here.
pub fn read_tfnns(scanner: &mut Scanner) -> Result<Value> {
    if matches!(scanner.current(), b'{' | b'}' | b'[' | b']' | b',' | b':') {
        return Err(syntax_err(
            scanner,
            scanner.position(),
            format!(
                "Found a punctuator character '{}' when expecting a quoteless string (check your syntax)",
                scanner.current() as char
            ),
        ));
    }

    let mut raw: Vec<u8> = Vec::new();
    let mut last_nonspace_len = 0usize;
    let mut last_nonspace_pos = scanner.position();

    loop {
        match scanner.current() {
            0 | b'\n' => break,
            b'#' => break,
            b'/' if scanner.peek(1) == b'/' => break,
            b'/' if scanner.peek(1) == b'*' => break,
            b',' | b'}' | b']' => break,
            ch => {
                raw.push(ch);
                if !matches!(ch, b' ' | b'\t' | b'\r') {
                    last_nonspace_len = raw.len();
                }
                scanner.advance();
                if !matches!(ch, b' ' | b'\t' | b'\r') {
                    last_nonspace_pos = scanner.position();
                }
            }
        }
    }

    raw.truncate(last_nonspace_len);
    scanner.rewind_to(last_nonspace_pos);
    let text = String::from_utf8_lossy(&raw).into_owned();
    Ok(finish_tfnns(&text))
}

fn finish_tfnns(val: &str) -> Value {
    match val {
        "true" => Value::bool(true),
        "false" => Value::bool(false),
        "null" => Value::null(),
        _ => {
            if val.starts_with('-') || val.as_bytes().first().is_some_and(u8::is_ascii_digit) {
                if let Some(number) = try_parse_number(val) {
                    return match number {
                        Number::Int64(v) => Value::int64(v),
                        Number::Double(v) => Value::double(v),
                    };
                }
            }
            Value::string(val.to_string())
        }
    }
}
