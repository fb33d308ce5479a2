use crate::value::Map;

/// Decoder configuration. All fields default to Hjson's relaxed-but-quiet
/// defaults: comments are not retained, whitespace is not treated as a
/// comment, and duplicate keys silently overwrite rather than erroring.
pub struct DecoderOptions {
    /// Populate comment slots from `#`, `//`, `/* ... */` trivia.
    pub comments: bool,
    /// Populate comment slots from *all* trivia, forcing `comments = true`.
    pub whitespace_as_comments: bool,
    /// Raise `Error::Syntax` when a key is already `defined()` in the
    /// current map.
    pub duplicate_key_exception: bool,
    /// Invoked at the root level, before the uniqueness check, with the
    /// key about to be inserted and the map it will land in. May rewrite
    /// `key` in place (typically to de-duplicate it).
    pub duplicate_key_handler: Option<Box<dyn FnMut(&mut String, &Map)>>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            comments: false,
            whitespace_as_comments: false,
            duplicate_key_exception: false,
            duplicate_key_handler: None,
        }
    }
}

impl std::fmt::Debug for DecoderOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderOptions")
            .field("comments", &self.comments)
            .field("whitespace_as_comments", &self.whitespace_as_comments)
            .field("duplicate_key_exception", &self.duplicate_key_exception)
            .field("duplicate_key_handler", &self.duplicate_key_handler.is_some())
            .finish()
    }
}
