/// Tokens of this many characters or fewer are dropped by [`tokenize`].
pub const MIN_TOKEN_CHARS: usize = 2;

/// Normalize free text for matching.
///
/// Lowercases, folds `ё` into `е`, replaces everything outside `а-я`,
/// `a-z` and `0-9` with a space, then collapses and trims whitespace.
/// Total over all inputs; the empty string normalizes to itself.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let c = if c == 'ё' { 'е' } else { c };
        if is_kept(c) {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

fn is_kept(c: char) -> bool {
    matches!(c, 'а'..='я' | 'a'..='z' | '0'..='9')
}

/// Split normalized text into words longer than [`MIN_TOKEN_CHARS`].
///
/// Order and duplicates are preserved.
pub fn tokenize(normalized: &str) -> Vec<&str> {
    normalized
        .split(' ')
        .filter(|word| char_len(word) > MIN_TOKEN_CHARS)
        .collect()
}

/// Length in characters, not bytes.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// The first `n` characters of `s` (all of `s` when it is shorter).
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn normalize_lowercases_cyrillic() {
        assert_eq!(normalize("НАМАЗ"), "намаз");
        assert_eq!(normalize("НАМАЗ"), normalize("намаз"));
    }

    #[test]
    fn normalize_folds_yo() {
        assert_eq!(normalize("Ещё"), "еще");
        assert_eq!(normalize("ЁЛКА"), "елка");
    }

    #[test]
    fn normalize_strips_punctuation() {
        assert_eq!(normalize("Как делать намаз?"), "как делать намаз");
        assert_eq!(normalize("«Закят» — это..."), "закят это");
    }

    #[test]
    fn normalize_keeps_latin_and_digits() {
        assert_eq!(normalize("Sura 2:255"), "sura 2 255");
    }

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("  пост \t\n рамадан  "), "пост рамадан");
    }

    #[test]
    fn normalize_empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("???"), "");
        assert_eq!(normalize(" !? 🙂 "), "");
    }

    #[test]
    fn tokenize_drops_short_words() {
        let normalized = normalize("Можно ли в пост есть?");
        assert_eq!(tokenize(&normalized), vec!["можно", "пост", "есть"]);
    }

    #[test]
    fn tokenize_counts_characters_not_bytes() {
        // Two Cyrillic letters are four bytes but still too short.
        assert!(tokenize("ли").is_empty());
        assert_eq!(tokenize("дуа"), vec!["дуа"]);
    }

    #[test]
    fn tokenize_keeps_duplicates_in_order() {
        assert_eq!(
            tokenize("закят закят нисаб"),
            vec!["закят", "закят", "нисаб"]
        );
    }

    #[test]
    fn tokenize_empty() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn char_prefix_respects_boundaries() {
        assert_eq!(char_prefix("разводе", 5), "разво");
        assert_eq!(char_prefix("дуа", 5), "дуа");
        assert_eq!(char_prefix("", 5), "");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "\\PC*") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalize_ignores_case(s in "[а-яА-ЯёЁa-zA-Z0-9 ,.!?]*") {
            prop_assert_eq!(normalize(&s.to_uppercase()), normalize(&s.to_lowercase()));
        }

        #[test]
        fn normalize_output_is_trimmed(s in "\\PC*") {
            let n = normalize(&s);
            prop_assert_eq!(n.trim(), n.as_str());
            prop_assert!(!n.contains("  "));
        }
    }
}
