//! Compiled-once regex patterns for noise removal and whitespace handling.
//!
//! Patterns must run while the surface syntax they match is still intact,
//! so the pipeline applies them before punctuation or whitespace
//! normalization can disturb it.

use lazy_static::lazy_static;
use regex::Regex;

/// Sudanese colloquial spellings and their canonical forms. Longer entries
/// come first so they win the alternation; every replacement is itself a
/// fixed point of the table.
pub const DIALECT_LEXICON: &[(&str, &str)] = &[
    ("ياخي", "يا اخي"),
    ("ياخ", "يا اخ"),
    ("كده", "كدا"),
];

lazy_static! {
    /// http/https URLs.
    pub static ref URL: Regex = Regex::new(
        r"https?://(?:[a-zA-Z]|[0-9]|[$-_@.&+]|[!*\(\),]|(?:%[0-9a-fA-F][0-9a-fA-F]))+"
    )
    .unwrap();

    /// Email addresses.
    pub static ref EMAIL: Regex = Regex::new(r"\S+@\S+\.\S+").unwrap();

    /// @mentions.
    pub static ref MENTION: Regex = Regex::new(r"@\w+").unwrap();

    /// #hashtags.
    pub static ref HASHTAG: Regex = Regex::new(r"#\w+").unwrap();

    /// HTML/XML tags.
    pub static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();

    /// Maximal runs of ASCII letters.
    pub static ref LATIN_RUN: Regex = Regex::new(r"[a-zA-Z]+").unwrap();

    /// Runs of whitespace plus the invisible format characters common in
    /// Arabic text (ALM, ZWSP, LRM/RLM, ZWNBSP).
    pub static ref WHITESPACE: Regex =
        Regex::new(r"[\s\u{061C}\u{200B}\u{200E}\u{200F}\u{FEFF}]+").unwrap();

    /// Timestamp shapes, broadest structure first: bracketed clock, bare
    /// clock with optional meridiem, separated dates, ISO-8601, and
    /// Unix-epoch-like digit runs.
    pub static ref TIMESTAMPS: Vec<Regex> = vec![
        Regex::new(r"\[\d{1,2}:\d{2}:\d{2}(?:\.\d+)?\]").unwrap(),
        Regex::new(r"\b\d{1,2}:\d{2}(?::\d{2})?(?:\s*[AaPp][Mm])?\b").unwrap(),
        Regex::new(r"\b\d{1,4}[-/.]\d{1,2}[-/.]\d{1,4}\b").unwrap(),
        Regex::new(r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2})?")
            .unwrap(),
        Regex::new(r"\b\d{10,13}\b").unwrap(),
    ];

    /// Word-boundary alternation over the dialect lexicon keys.
    pub static ref DIALECT: Regex = {
        let alternation = DIALECT_LEXICON
            .iter()
            .map(|(from, _)| regex::escape(from))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"\b(?:{})\b", alternation)).unwrap()
    };
}

/// Remove every timestamp shape from the text.
pub fn remove_timestamps(text: &str) -> String {
    let mut out = text.to_string();
    for pattern in TIMESTAMPS.iter() {
        out = pattern.replace_all(&out, "").into_owned();
    }
    out
}

/// Rewrite dialect spellings through the lexicon.
pub fn apply_dialect_lexicon(text: &str) -> String {
    DIALECT
        .replace_all(text, |caps: &regex::Captures| {
            let word = &caps[0];
            DIALECT_LEXICON
                .iter()
                .find(|(from, _)| *from == word)
                .map(|(_, to)| (*to).to_string())
                .unwrap_or_else(|| word.to_string())
        })
        .into_owned()
}

/// Collapse whitespace runs to a single space and trim the edges.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_url_pattern() {
        let text = "زوروا https://example.com/path?q=1 الآن";
        assert_eq!(URL.replace_all(text, ""), "زوروا  الآن");
        assert!(URL.is_match("http://sudan.sd"));
        assert!(!URL.is_match("example.com"));
    }

    #[test]
    fn test_email_pattern() {
        let text = "تواصل: test@example.com شكرا";
        assert_eq!(EMAIL.replace_all(text, ""), "تواصل:  شكرا");
    }

    #[test]
    fn test_mention_and_hashtag() {
        assert_eq!(MENTION.replace_all("قال @username مرحبا", ""), "قال  مرحبا");
        assert_eq!(HASHTAG.replace_all("يوم #السودان الوطني", ""), "يوم  الوطني");
        // Arabic word characters match \w
        assert!(MENTION.is_match("@محمد"));
    }

    #[test]
    fn test_html_tags() {
        let text = "<p>مرحبا <b>بيك</b></p>";
        assert_eq!(HTML_TAG.replace_all(text, ""), "مرحبا بيك");
        // A bare less-than is not a tag
        assert_eq!(HTML_TAG.replace_all("a < b", ""), "a < b");
    }

    #[test]
    fn test_timestamp_shapes() {
        assert_eq!(remove_timestamps("[00:09:43.329000] مرحبا"), " مرحبا");
        assert_eq!(remove_timestamps("الاجتماع 10:30 AM غدا"), "الاجتماع  غدا");
        assert_eq!(remove_timestamps("بتاريخ 15/01/2024 تم"), "بتاريخ  تم");
        assert_eq!(remove_timestamps("2023-12-25T10:30:00Z انتهى"), " انتهى");
        assert_eq!(remove_timestamps("معرف 1700000000 قديم"), "معرف  قديم");
    }

    #[test]
    fn test_short_and_long_digit_runs_survive() {
        assert_eq!(remove_timestamps("رقم 123"), "رقم 123");
        // Fourteen digits is past the epoch range
        assert_eq!(remove_timestamps("12345678901234"), "12345678901234");
    }

    #[test]
    fn test_dialect_lexicon() {
        assert_eq!(apply_dialect_lexicon("ياخ الكلام كده تمام"), "يا اخ الكلام كدا تمام");
        assert_eq!(apply_dialect_lexicon("ياخي وينك"), "يا اخي وينك");
        // Substrings inside longer words stay put
        assert_eq!(apply_dialect_lexicon("وكده"), "وكده");
        // Replacements are fixed points
        assert_eq!(apply_dialect_lexicon("يا اخي كدا"), "يا اخي كدا");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  مرحبا \t بيك \n"), "مرحبا بيك");
        // Zero-width space and RTL marks count as blank
        assert_eq!(collapse_whitespace("كلمة\u{200B}تانية"), "كلمة تانية");
        assert_eq!(collapse_whitespace("\u{FEFF}نص\u{200F}"), "نص");
    }

    #[test]
    fn test_latin_runs() {
        assert_eq!(LATIN_RUN.replace_all("النص fine هنا", ""), "النص  هنا");
        assert_eq!(LATIN_RUN.replace_all("رقم 123", ""), "رقم 123");
    }
}
