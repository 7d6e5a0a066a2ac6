//! Content extracted from a crawled post.

use serde::{Deserialize, Serialize};

/// Plain-text body of a post plus the measurements the rules need.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Visible text of the post body
    pub text: String,

    /// Number of characters (Unicode scalar values) in `text`
    pub char_count: usize,

    /// Number of images inside the post body
    pub image_count: usize,
}

impl ExtractedContent {
    /// Build content from text, counting characters.
    pub fn new(text: impl Into<String>, image_count: usize) -> Self {
        let text = text.into();
        let char_count = text.chars().count();
        Self {
            text,
            char_count,
            image_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_count_counts_scalars_not_bytes() {
        let content = ExtractedContent::new("협찬 글", 2);
        assert_eq!(content.char_count, 4);
        assert_eq!(content.image_count, 2);
    }
}
