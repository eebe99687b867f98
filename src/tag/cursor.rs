//! Destructive, sequential tag extraction from node text.

use regex::Regex;

/// Working copy of a node's text from which tags are stripped one by one.
///
/// Extraction is destructive and sequential: every successful match is
/// removed from the working text before the next extraction runs, so
/// a later, more generic pattern can never re-match a substring that an
/// earlier, more specific one already consumed. Whatever text remains at
/// the end of a pipeline becomes the node's display name or choice text.
#[derive(Clone, Debug)]
pub struct TagCursor {
    text: String,
}

/// Captured groups of a stripped tag.
#[derive(Clone, Debug)]
pub struct TagMatch {
    groups: Vec<Option<String>>,
}

impl TagMatch {
    /// Return the capture group at `index`, where 0 is the whole match.
    pub fn group(&self, index: usize) -> Option<&str> {
        self.groups.get(index).and_then(|group| group.as_deref())
    }
}

impl TagCursor {
    pub fn new(text: &str) -> Self {
        TagCursor {
            text: text.to_string(),
        }
    }

    /// Strip the first match of `pattern` from the working text.
    pub fn strip(&mut self, pattern: &Regex) -> Option<TagMatch> {
        let (range, groups) = {
            let captures = pattern.captures(&self.text)?;
            let whole = captures.get(0)?;

            let groups = captures
                .iter()
                .map(|group| group.map(|m| m.as_str().to_string()))
                .collect();

            (whole.start()..whole.end(), groups)
        };

        self.text.replace_range(range, "");

        Some(TagMatch { groups })
    }

    /// Strip every match of `pattern`, in source order.
    ///
    /// Used by the condition and effect scans, which are the only tags
    /// that may occur repeatedly within a single node.
    pub fn strip_all(&mut self, pattern: &Regex) -> Vec<TagMatch> {
        let mut matches = Vec::new();

        while let Some(tag) = self.strip(pattern) {
            matches.push(tag);
        }

        matches
    }

    /// Whether the remaining text still contains a match, without consuming it.
    pub fn contains(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.text)
    }

    /// Consume the cursor, returning the leftover text with whitespace
    /// runs collapsed. This residue is the node's display text.
    pub fn into_remainder(self) -> String {
        self.text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::pattern;

    #[test]
    fn stripping_a_tag_removes_it_from_the_working_text() {
        let mut cursor = TagCursor::new("[start] Intro scene");

        assert!(cursor.strip(&pattern::START).is_some());
        assert_eq!(&cursor.into_remainder(), "Intro scene");
    }

    #[test]
    fn stripping_an_absent_tag_returns_none_and_leaves_text_unchanged() {
        let mut cursor = TagCursor::new("Intro scene");

        assert!(cursor.strip(&pattern::START).is_none());
        assert_eq!(&cursor.into_remainder(), "Intro scene");
    }

    #[test]
    fn stripped_tags_expose_their_capture_groups() {
        let mut cursor = TagCursor::new("[jump:harbor] leave town");
        let tag = cursor.strip(&pattern::JUMP).unwrap();

        assert_eq!(tag.group(1), Some("harbor"));
    }

    #[test]
    fn strip_all_returns_every_match_in_source_order() {
        let mut cursor = TagCursor::new("《A==1》 mid 《B>2》 tail");
        let tags = cursor.strip_all(&pattern::GUILLEMET);

        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].group(1), Some("A==1"));
        assert_eq!(tags[1].group(1), Some("B>2"));
        assert_eq!(&cursor.into_remainder(), "mid tail");
    }

    #[test]
    fn earlier_strips_consume_text_before_later_generic_scans() {
        let mut cursor = TagCursor::new("《AD15》《luck%》 choice");

        assert!(cursor.strip(&pattern::AD_FULLSCREEN).is_some());

        let leftover = cursor.strip_all(&pattern::GUILLEMET);
        assert_eq!(leftover.len(), 1);
        assert_eq!(leftover[0].group(1), Some("luck%"));
    }

    #[test]
    fn remainder_collapses_whitespace_left_by_stripped_tags() {
        let mut cursor = TagCursor::new("Intro 《A==1》 scene");
        cursor.strip_all(&pattern::GUILLEMET);

        assert_eq!(&cursor.into_remainder(), "Intro scene");
    }

    #[test]
    fn multibyte_text_around_tags_survives_stripping() {
        let mut cursor = TagCursor::new("金币之路 [start] 第一章");

        assert!(cursor.strip(&pattern::START).is_some());
        assert_eq!(&cursor.into_remainder(), "金币之路 第一章");
    }
}
