//! Consumes whitespace and comments between tokens ("trivia") and reports
//! back a span of what was skipped, without interpreting its contents —
//! the decoder only needs to know *where* the trivia is so it can hand
//! the bytes to the value tree; it never inspects a comment's text.

use crate::error::{Error, Result};
use crate::options::DecoderOptions;
use crate::scanner::Scanner;

/// Whether a value's decorations actually retain comment text is itself
/// optional (`DecoderOptions::comments` / `whitespace_as_comments`); when
/// neither is set, every comment slot in the tree is left empty even
/// though trivia was still scanned past.

/// A `(start, end, has_comment)` triple describing a run of trivia.
#[derive(Debug, Clone, Copy)]
pub struct CommentSpan {
    pub start: usize,
    pub end: usize,
    pub has_comment: bool,
}

impl CommentSpan {
    pub fn empty(at: usize) -> Self {
        Self {
            start: at,
            end: at,
            has_comment: false,
        }
    }

    pub fn text(&self, scanner: &Scanner) -> String {
        scanner.str_slice(self.start, self.end)
    }

    /// Materializes the span's text only if it is flagged as worth
    /// keeping under the active options; otherwise returns an empty
    /// string without allocating.
    pub fn text_if_enabled(&self, scanner: &Scanner) -> String {
        if self.has_comment {
            self.text(scanner)
        } else {
            String::new()
        }
    }

    /// Concatenates two adjacent spans. Associative and byte-preserving:
    /// the result spans from `self.start` to `other.end`, so re-reading
    /// the source over that range reproduces the textual concatenation of
    /// both original spans exactly (Invariant 4, spec.md §3).
    pub fn join(self, other: CommentSpan) -> CommentSpan {
        CommentSpan {
            start: self.start,
            end: other.end,
            has_comment: self.has_comment || other.has_comment,
        }
    }
}

/// Skips any mix of ASCII whitespace (including newlines), `#...\n`
/// comments, `//...\n` comments, and `/* ... */` block comments.
pub fn read_trivia_multiline(scanner: &mut Scanner, options: &DecoderOptions) -> Result<CommentSpan> {
    read_trivia(scanner, options, true)
}

/// Like `read_trivia_multiline`, but stops at the first `\n` instead of
/// consuming it. Used to collect the trivia attributed to a value as its
/// `comment_after`: anything up to end-of-line belongs to the value just
/// parsed, anything beyond belongs to the next node.
pub fn read_trivia_line(scanner: &mut Scanner, options: &DecoderOptions) -> Result<CommentSpan> {
    read_trivia(scanner, options, false)
}

fn read_trivia(scanner: &mut Scanner, options: &DecoderOptions, cross_newlines: bool) -> Result<CommentSpan> {
    let start = scanner.position();
    let mut saw_comment = false;
    let mut saw_any = false;

    loop {
        match scanner.current() {
            b' ' | b'\t' | b'\r' => {
                saw_any = true;
                scanner.advance();
            }
            b'\n' => {
                if !cross_newlines {
                    break;
                }
                saw_any = true;
                scanner.advance();
            }
            b'#' => {
                saw_any = true;
                saw_comment = true;
                skip_to_line_end(scanner);
            }
            b'/' if scanner.peek(1) == b'/' => {
                saw_any = true;
                saw_comment = true;
                scanner.advance();
                scanner.advance();
                skip_to_line_end(scanner);
            }
            b'/' if scanner.peek(1) == b'*' => {
                saw_any = true;
                saw_comment = true;
                let comment_start = scanner.position();
                scanner.advance();
                scanner.advance();
                skip_block_comment(scanner, comment_start)?;
                if !cross_newlines {
                    // A block comment may itself contain newlines; once it
                    // closes we keep skipping same-line trivia only.
                }
            }
            _ => break,
        }
    }

    let comments = options.comments || options.whitespace_as_comments;
    let end = scanner.position();
    let has_comment = (saw_comment && comments) || (saw_any && options.whitespace_as_comments);
    Ok(CommentSpan {
        start,
        end,
        has_comment,
    })
}

/// Advances past bytes up to (not including) the next `\n` or EOF. Does
/// not consume the `\n` itself — the surrounding trivia loop handles it
/// on its next iteration (or leaves it for a line-scoped caller to stop
/// at).
fn skip_to_line_end(scanner: &mut Scanner) {
    while scanner.current() != 0 && scanner.current() != b'\n' {
        scanner.advance();
    }
}

/// Block comments may not be nested: the first `*/` closes the comment.
fn skip_block_comment(scanner: &mut Scanner, comment_start: usize) -> Result<()> {
    loop {
        if scanner.current() == 0 {
            let (line, column, context) = scanner.locate(comment_start);
            return Err(Error::syntax("Bad multiline comment", line, column, context));
        }
        if scanner.current() == b'*' && scanner.peek(1) == b'/' {
            scanner.advance();
            scanner.advance();
            return Ok(());
        }
        scanner.advance();
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn options(comments: bool, whitespace_as_comments: bool) -> DecoderOptions {
        DecoderOptions {
            comments,
            whitespace_as_comments,
            ..DecoderOptions::default()
        }
    }

    #[test]
    fn skips_whitespace_and_hash_comments() {
        let mut s = Scanner::new(b"  # hi\n  x".to_vec());
        let span = read_trivia_multiline(&mut s, &options(true, false)).unwrap();
        assert!(span.has_comment);
        assert_eq!(s.current(), b'x');
    }

    #[test]
    fn whitespace_only_is_not_a_comment_by_default() {
        let mut s = Scanner::new(b"   x".to_vec());
        let span = read_trivia_multiline(&mut s, &options(true, false)).unwrap();
        assert!(!span.has_comment);
    }

    #[test]
    fn whitespace_as_comments_flags_plain_whitespace() {
        let mut s = Scanner::new(b"   x".to_vec());
        let span = read_trivia_multiline(&mut s, &options(true, true)).unwrap();
        assert!(span.has_comment);
    }

    #[test]
    fn line_reader_stops_at_newline() {
        let mut s = Scanner::new(b"  \ny".to_vec());
        let span = read_trivia_line(&mut s, &options(true, false)).unwrap();
        assert_eq!(s.current(), b'\n');
        assert_eq!(span.end, s.position());
    }

    #[test]
    fn block_comment_can_cross_lines() {
        let mut s = Scanner::new(b"/* a\nb */x".to_vec());
        let span = read_trivia_multiline(&mut s, &options(true, false)).unwrap();
        assert!(span.has_comment);
        assert_eq!(s.current(), b'x');
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let mut s = Scanner::new(b"/* never closes".to_vec());
        let err = read_trivia_multiline(&mut s, &options(true, false)).unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }
}
