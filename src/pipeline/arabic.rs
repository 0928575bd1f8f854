//! Arabic character tables and character-level operations.
//!
//! Everything here is a pure walk over chars or grapheme clusters; the
//! pattern-based (regex) operations live in [`super::patterns`].

use unicode_segmentation::UnicodeSegmentation;

/// Shadda (gemination mark), optionally exempt from diacritic removal.
pub const SHADDA: char = '\u{0651}';

/// Tatweel/kashida elongation character.
pub const TATWEEL: char = '\u{0640}';

/// Arabic punctuation that survives special-character removal on request.
pub const ARABIC_PUNCTUATION: &[char] = &['؟', '،', '؛'];

/// ASCII punctuation kept by special-character removal.
const KEPT_ASCII_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '(', ')', '"', '\'', '-',
];

/// Punctuation that collapses when repeated (!!! -> !).
const REPEATABLE_PUNCTUATION: &[char] = &['!', '?', '.', ',', ':', ';'];

/// Arabic and typographic punctuation mapped to ASCII equivalents.
pub const PUNCTUATION_MAP: &[(char, &str)] = &[
    ('؟', "?"),         // Arabic question mark
    ('،', ","),         // Arabic comma
    ('؛', ";"),         // Arabic semicolon
    ('‹', "<"),
    ('›', ">"),
    ('«', "\""),
    ('»', "\""),
    ('\u{201C}', "\""), // left double quotation
    ('\u{201D}', "\""), // right double quotation
    ('\u{2018}', "'"),  // left single quotation
    ('\u{2019}', "'"),  // right single quotation
    ('–', "-"),         // en dash
    ('—', "-"),         // em dash
    ('…', "..."),
];

/// Check whether a character is an Arabic diacritic (tashkeel).
///
/// Covers the combining marks U+064B..=U+0658 (fathatan, dammatan, kasratan,
/// fatha, damma, kasra, shadda, sukun, maddah, hamza above, hamza below,
/// subscript alef, inverted damma, noon ghunna) plus the superscript alef
/// U+0670.
pub fn is_diacritic(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{0658}' | '\u{0670}')
}

/// Check whether a character falls in the Arabic script blocks.
pub fn is_arabic(c: char) -> bool {
    matches!(c,
        '\u{0600}'..='\u{06FF}'
        | '\u{0750}'..='\u{077F}'
        | '\u{08A0}'..='\u{08FF}'
        | '\u{FB50}'..='\u{FDFF}'
        | '\u{FE70}'..='\u{FEFF}')
}

/// Check whether a character is a digit in any of the handled ranges
/// (ASCII, Arabic-Indic, Extended Arabic-Indic).
pub fn is_any_digit(c: char) -> bool {
    matches!(c, '0'..='9' | '\u{0660}'..='\u{0669}' | '\u{06F0}'..='\u{06F9}')
}

/// Strip Arabic diacritics, optionally keeping shadda.
pub fn remove_diacritics(text: &str, keep_shadda: bool) -> String {
    text.chars()
        .filter(|&c| !is_diacritic(c) || (keep_shadda && c == SHADDA))
        .collect()
}

/// Fold letter variants to their canonical forms in one pass.
///
/// Alef family (أ إ آ ٱ ٲ ٳ) folds to bare alef; yeh folding covers the
/// dotless final form (ى) and both hamza carriers (ئ→ي, ؤ→و); teh marbuta
/// folds to heh.
pub fn fold_variants(text: &str, fold_alef: bool, fold_yeh: bool, fold_teh_marbuta: bool) -> String {
    text.chars()
        .map(|c| match c {
            'أ' | 'إ' | 'آ' | 'ٱ' | 'ٲ' | 'ٳ' if fold_alef => 'ا',
            'ى' | 'ئ' if fold_yeh => 'ي',
            'ؤ' if fold_yeh => 'و',
            'ة' if fold_teh_marbuta => 'ه',
            _ => c,
        })
        .collect()
}

/// Delete every tatweel character.
pub fn remove_tatweel(text: &str) -> String {
    text.chars().filter(|&c| c != TATWEEL).collect()
}

/// Convert Arabic-Indic (٠–٩) and Extended Arabic-Indic (۰–۹) digits to
/// ASCII by fixed per-range offset.
pub fn convert_numerals(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{0660}'..='\u{0669}' => (b'0' + (c as u32 - 0x0660) as u8) as char,
            '\u{06F0}'..='\u{06F9}' => (b'0' + (c as u32 - 0x06F0) as u8) as char,
            _ => c,
        })
        .collect()
}

/// Delete every digit character in the handled ranges.
pub fn remove_numerals(text: &str) -> String {
    text.chars().filter(|&c| !is_any_digit(c)).collect()
}

/// Map Arabic and typographic punctuation to ASCII equivalents.
pub fn normalize_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match PUNCTUATION_MAP.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// Collapse runs of identical punctuation from the repeatable set to a
/// single occurrence.
pub fn collapse_repeated_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if prev == Some(c) && REPEATABLE_PUNCTUATION.contains(&c) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Collapse runs of the same grapheme cluster longer than `cap` down to
/// exactly `cap` occurrences.
///
/// Operating on grapheme clusters keeps multi-code-point characters (letters
/// with combining marks, flag emoji) intact.
pub fn collapse_repeated_graphemes(text: &str, cap: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<&str> = None;
    let mut run = 0usize;
    for g in text.graphemes(true) {
        if prev == Some(g) {
            run += 1;
        } else {
            prev = Some(g);
            run = 1;
        }
        if run <= cap {
            out.push_str(g);
        }
    }
    out
}

/// Delete characters outside the kept alphabet: Arabic script, ASCII
/// alphanumerics, whitespace, and common ASCII punctuation. The canonical
/// Arabic punctuation marks are deleted too unless `preserve_arabic_punctuation`
/// is set.
pub fn remove_special_chars(text: &str, preserve_arabic_punctuation: bool) -> String {
    text.chars()
        .filter(|&c| {
            if ARABIC_PUNCTUATION.contains(&c) {
                return preserve_arabic_punctuation;
            }
            c.is_whitespace()
                || c.is_ascii_alphanumeric()
                || KEPT_ASCII_PUNCTUATION.contains(&c)
                || is_arabic(c)
        })
        .collect()
}
