//! The document-level driver: decides whether the input opens as a vector,
//! a braced object, or (Hjson's signature convenience) a braceless object,
//! and falls back to parsing the whole document as one bare scalar if the
//! object attempt fails.

use crate::error::{Error, Result};
use crate::options::DecoderOptions;
use crate::trivia::read_trivia_multiline;
use crate::value::Value;

use super::state::{Frame, State};
use super::Driver;

/// Parses a complete Hjson document from `bytes`.
///
/// Hjson's root may omit the outermost `{}` entirely (`a: 1` is a valid
/// document). Because a bare scalar (`42`, `"hi"`, `true`) is also valid at
/// the root and is lexically indistinguishable from the start of a
/// braceless object until the key/`:` fails to materialize, the decoder
/// always attempts the object reading first and only falls back to
/// treating the whole input as one scalar if that attempt both fails *and*
/// had gone down the braceless path. A failure on an explicitly braced or
/// bracketed document is never retried.
pub fn decode(bytes: Vec<u8>, options: &mut DecoderOptions) -> Result<Value> {
    let mut driver = Driver::new(bytes.clone(), options);
    let first_attempt = run_root(&mut driver);
    let without_braces = driver.without_braces;

    match first_attempt {
        Ok(value) => Ok(value),
        Err(first_err) => {
            if !without_braces {
                return Err(first_err);
            }
            let mut retry = Driver::new(bytes, driver.options);
            match run_scalar_fallback(&mut retry) {
                Ok(value) => Ok(value),
                Err(_) => Err(first_err),
            }
        }
    }
}

fn run_root(driver: &mut Driver) -> Result<Value> {
    driver.frames.push(Frame::root());
    let span = read_trivia_multiline(&mut driver.scanner, driver.options)?;
    let item_pos = driver.scanner.position() as i64;
    {
        let frame = driver.frame_mut();
        frame.leading = span;
        frame.item_pos = item_pos;
    }

    match driver.scanner.current() {
        b'[' => driver.states.push(State::VectorBegin),
        b'{' => driver.states.push(State::MapBegin),
        _ => {
            driver.without_braces = true;
            driver.states.push(State::MapBegin);
        }
    }

    driver.run()?;
    finish(driver)
}

fn run_scalar_fallback(driver: &mut Driver) -> Result<Value> {
    driver.states.push(State::ValueBegin);
    driver.run()?;
    finish(driver)
}

/// Common tail for both attempts: demand nothing but trivia until EOF,
/// folding that trailing trivia into the root value's `comment_after`
/// unconditionally — it is the only place left to attribute it, and
/// doing so is what lets the subsequent EOF check fail cleanly on
/// genuine trailing garbage.
fn finish(driver: &mut Driver) -> Result<Value> {
    let trailing = read_trivia_multiline(&mut driver.scanner, driver.options)?;
    let root = driver.frames.pop().expect("root frame");
    let mut value = root.value;
    value.comment_after = value.comment_after.clone() + &trailing.text(&driver.scanner);

    if driver.scanner.current() != 0 {
        let pos = driver.scanner.position();
        let (line, column, context) = driver.scanner.locate(pos);
        return Err(Error::syntax("Syntax error, found trailing characters", line, column, context));
    }

    Ok(value)
}
