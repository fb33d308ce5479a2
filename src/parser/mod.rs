//! The explicit, stack-driven parser: no recursive-descent call stack —
//! nesting is represented entirely by `states` and `frames`, so documents
//! of arbitrary depth never grow the Rust call stack.

mod root;
mod state;

pub use root::decode;

use crate::error::{Error, Result};
use crate::literal::{read_keyname, read_quoted_or_multiline_string, read_tfnns};
use crate::options::DecoderOptions;
use crate::scanner::Scanner;
use crate::trivia::{read_trivia_line, read_trivia_multiline, CommentSpan};
use crate::value::Value;
use state::{Frame, State};

/// Owns the scanner, the two parallel stacks, and a handle to the active
/// options. One `Driver` runs exactly one parse attempt; the braceless-root
/// scalar fallback (see `root::decode`) constructs a fresh one.
struct Driver<'a> {
    scanner: Scanner,
    options: &'a mut DecoderOptions,
    states: Vec<State>,
    frames: Vec<Frame>,
    /// Set once, at the very start of the root-level dispatch, when the
    /// document does not open with `{` or `[`. Only the root frame is
    /// ever parsed in this mode.
    without_braces: bool,
}

impl<'a> Driver<'a> {
    fn new(bytes: Vec<u8>, options: &'a mut DecoderOptions) -> Self {
        Driver {
            scanner: Scanner::new(bytes),
            options,
            states: Vec::new(),
            frames: Vec::new(),
            without_braces: false,
        }
    }

    fn frame_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("a frame is always on top while the machine runs")
    }

    fn run(&mut self) -> Result<()> {
        while let Some(state) = self.states.pop() {
            self.dispatch(state)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, state: State) -> Result<()> {
        match state {
            State::ValueBegin => self.value_begin(),
            State::ValueEnd => self.value_end(),
            State::VectorBegin => self.vector_begin(),
            State::VectorElemEnd => self.vector_elem_end(),
            State::MapBegin => self.map_begin(),
            State::MapElemBegin => self.map_elem_begin(),
            State::MapElemEnd => self.map_elem_end(),
        }
    }

    fn at_root(&self) -> bool {
        self.frames.len() == 1
    }

    fn value_begin(&mut self) -> Result<()> {
        self.frames.push(Frame::new());
        let span = read_trivia_multiline(&mut self.scanner, self.options)?;
        let item_pos = self.scanner.position() as i64;
        {
            let frame = self.frame_mut();
            frame.leading = span;
            frame.item_pos = item_pos;
        }

        match self.scanner.current() {
            b'{' => self.states.push(State::MapBegin),
            b'[' => self.states.push(State::VectorBegin),
            b'"' | b'\'' => {
                let s = read_quoted_or_multiline_string(&mut self.scanner)?;
                self.frame_mut().value = Value::string(s);
                self.states.push(State::ValueEnd);
            }
            _ => {
                let v = read_tfnns(&mut self.scanner)?;
                self.frame_mut().value = v;
                self.states.push(State::ValueEnd);
            }
        }
        Ok(())
    }

    fn value_end(&mut self) -> Result<()> {
        let span = read_trivia_line(&mut self.scanner, self.options)?;
        let comment_after = span.text_if_enabled(&self.scanner);
        let before = self.frames.last().expect("frame").leading.text_if_enabled(&self.scanner);
        let frame = self.frame_mut();
        frame.value.comment_before = before;
        frame.value.comment_after = comment_after;
        frame.value.pos_item = frame.item_pos;
        Ok(())
    }

    fn vector_begin(&mut self) -> Result<()> {
        let open_pos = self.scanner.position();
        self.scanner.advance();
        let span = read_trivia_multiline(&mut self.scanner, self.options)?;
        let frame = self.frame_mut();
        frame.value = Value::vector();
        frame.value.pos_item = frame.item_pos;
        frame.pending_comment_before = span;

        if self.scanner.current() == b']' {
            self.scanner.advance();
            let inside = self.frames.last().expect("frame").pending_comment_before.text(&self.scanner);
            self.frame_mut().value.comment_inside = inside;
            self.states.push(State::ValueEnd);
            return Ok(());
        }
        if self.scanner.current() == 0 {
            return Err(self.eof_error(open_pos, "array"));
        }

        self.states.push(State::VectorElemEnd);
        self.states.push(State::ValueBegin);
        Ok(())
    }

    fn vector_elem_end(&mut self) -> Result<()> {
        let mut child = self.frames.pop().expect("vector element frame");
        {
            let parent = self.frames.last().expect("frame");
            let before = parent.pending_comment_before.text_if_enabled(&self.scanner);
            let extra = parent.pending_comment_extra.text_if_enabled(&self.scanner);
            child.value.comment_before = before + &extra;
        }

        let ci_after = read_trivia_multiline(&mut self.scanner, self.options)?;

        let mut comment_extra = CommentSpan::empty(self.scanner.position());
        if self.scanner.current() == b',' {
            self.scanner.advance();
            comment_extra = read_trivia_multiline(&mut self.scanner, self.options)?;
        }

        if self.scanner.current() == b']' {
            self.scanner.advance();
            child.value.comment_after =
                child.value.comment_after.clone() + &ci_after.text(&self.scanner) + &comment_extra.text(&self.scanner);
            self.push_vector_child(child);
            self.states.push(State::ValueEnd);
            return Ok(());
        }

        if self.scanner.current() == 0 {
            let pos = self.scanner.position();
            self.push_vector_child(child);
            return Err(self.eof_error(pos, "array"));
        }

        self.push_vector_child(child);
        let frame = self.frame_mut();
        frame.pending_comment_before = ci_after;
        frame.pending_comment_extra = comment_extra;
        self.states.push(State::VectorElemEnd);
        self.states.push(State::ValueBegin);
        Ok(())
    }

    fn push_vector_child(&mut self, child: Frame) {
        self.frame_mut().value.push_back(child.value);
    }

    fn map_begin(&mut self) -> Result<()> {
        if self.scanner.current() == b'{' {
            self.scanner.advance();
            let span = read_trivia_multiline(&mut self.scanner, self.options)?;
            let frame = self.frame_mut();
            frame.value = Value::map();
            frame.value.pos_item = frame.item_pos;
            frame.pending_comment_before = span;
        } else {
            // Braceless root: there is no opening `{` whose interior
            // trivia would otherwise seed `pending_comment_before`, so the
            // leading trivia the root driver captured doubles as both this
            // map's own `comment_before` (read back from `leading` by
            // `ValueEnd`) and the first key's pending `comment_before`.
            let frame = self.frame_mut();
            frame.value = Value::map();
            frame.value.pos_item = frame.item_pos;
            frame.pending_comment_before = frame.leading;
        }

        if self.scanner.current() == b'}' && !(self.without_braces && self.at_root()) {
            self.scanner.advance();
            let inside = self.frames.last().expect("frame").pending_comment_before.text(&self.scanner);
            self.frame_mut().value.comment_inside = inside;
            self.states.push(State::ValueEnd);
            return Ok(());
        }

        self.states.push(State::MapElemBegin);
        Ok(())
    }

    fn map_elem_begin(&mut self) -> Result<()> {
        if self.scanner.current() == 0 {
            if self.without_braces && self.at_root() {
                let pending = self.frames.last().expect("frame").pending_comment_before.text(&self.scanner);
                let frame = self.frame_mut();
                let is_empty = frame.value.as_map().is_some_and(|m| m.is_empty());
                if is_empty {
                    frame.value.comment_inside = pending;
                } else if let Some(map) = frame.value.as_map_mut() {
                    if let Some((_, last)) = map.last_mut() {
                        last.comment_after.push_str(&pending);
                    }
                }
                self.states.push(State::ValueEnd);
                return Ok(());
            }
            let pos = self.scanner.position();
            return Err(self.eof_error(pos, "object"));
        }

        let key_start = self.scanner.position();
        let mut key = read_keyname(&mut self.scanner)?;

        if self.at_root() {
            if let Some(handler) = self.options.duplicate_key_handler.as_mut() {
                if let Some(map) = self.frames.last().and_then(|f| f.value.as_map()) {
                    handler(&mut key, map);
                }
            }
        }

        if self.options.duplicate_key_exception {
            let already = self.frames.last().unwrap().value.index(&key).defined();
            if already {
                let pos = self.scanner.position();
                return Err(syntax_at(&self.scanner, pos, format!("Found duplicate of key '{key}'")));
            }
        }

        let comment_key = read_trivia_multiline(&mut self.scanner, self.options)?;

        if self.scanner.current() != b':' {
            let pos = self.scanner.position();
            let found = self.scanner.current();
            return Err(syntax_at(
                &self.scanner,
                pos,
                format!("Expected ':' instead of '{}'", found as char),
            ));
        }
        self.scanner.advance();

        let frame = self.frame_mut();
        frame.key = key;
        frame.key_pos = key_start as i64;
        frame.comment_key = comment_key;

        self.states.push(State::MapElemEnd);
        self.states.push(State::ValueBegin);
        Ok(())
    }

    fn map_elem_end(&mut self) -> Result<()> {
        let child = self.frames.pop().expect("map element frame");
        let mut value = child.value;

        {
            let parent = self.frames.last().expect("frame");
            let comment_key = parent.comment_key.text_if_enabled(&self.scanner);
            // The colon-to-value trivia landed in `value.comment_before`
            // via this child's own `ValueBegin`; it belongs with the
            // key-to-colon trivia as one `comment_key` decoration.
            value.comment_key = comment_key + &value.comment_before;
            value.comment_before.clear();

            let before = parent.pending_comment_before.text_if_enabled(&self.scanner);
            let extra = parent.pending_comment_extra.text_if_enabled(&self.scanner);
            value.comment_before = before + &extra;
            value.pos_key = parent.key_pos;
        }
        let key = std::mem::take(&mut self.frame_mut().key);

        // Crosses newlines: a closing `}` (or the next key) may sit on a
        // later line than the value just parsed, and must be detected here
        // before ever looping back into `MapElemBegin`'s key reader, which
        // has no notion of `}` ending the map.
        let ci_after = read_trivia_multiline(&mut self.scanner, self.options)?;

        let mut comment_extra = CommentSpan::empty(self.scanner.position());
        if self.scanner.current() == b',' {
            self.scanner.advance();
            comment_extra = read_trivia_multiline(&mut self.scanner, self.options)?;
        }

        let closing = self.scanner.current() == b'}' && !(self.without_braces && self.at_root());

        if closing {
            self.scanner.advance();
            value.comment_after =
                value.comment_after.clone() + &ci_after.text(&self.scanner) + &comment_extra.text(&self.scanner);
            self.frame_mut().value.assign_with_comments(key, value);
            self.states.push(State::ValueEnd);
            return Ok(());
        }

        if self.scanner.current() == 0 && !(self.without_braces && self.at_root()) {
            let pos = self.scanner.position();
            self.frame_mut().value.assign_with_comments(key, value);
            return Err(self.eof_error(pos, "object"));
        }

        self.frame_mut().value.assign_with_comments(key, value);
        let frame = self.frame_mut();
        frame.pending_comment_before = ci_after;
        frame.pending_comment_extra = comment_extra;
        self.states.push(State::MapElemBegin);
        Ok(())
    }

    fn eof_error(&self, pos: usize, what: &str) -> Error {
        syntax_at(&self.scanner, pos, format!("End of input while parsing an {what}"))
    }
}

fn syntax_at(scanner: &Scanner, pos: usize, message: impl Into<String>) -> Error {
    let (line, column, context) = scanner.locate(pos);
    Error::syntax(message, line, column, context)
}
