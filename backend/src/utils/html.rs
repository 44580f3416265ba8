// src/utils/html.rs

use ammonia::Builder;

/// Sanitize authored rich text (question prompts) with ammonia's whitelist.
///
/// Safe formatting tags like <b> or <code> survive; <script>, <iframe> and
/// event-handler attributes are removed together with script bodies.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Strip every tag from plain-text fields (titles, answer options).
pub fn clean_text(input: &str) -> String {
    Builder::empty().clean(input).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_safe_formatting() {
        assert_eq!(clean_html("<b>bold</b> text"), "<b>bold</b> text");
    }

    #[test]
    fn drops_scripts() {
        assert_eq!(clean_html("hi<script>alert(1)</script>"), "hi");
    }

    #[test]
    fn plain_text_loses_tags() {
        assert_eq!(clean_text("<i>Ownership</i> basics"), "Ownership basics");
    }
}
