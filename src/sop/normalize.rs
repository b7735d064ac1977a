//! Text normalization shared by the indexer and the resolver.

/// Normalize text for matching.
///
/// Lowercases, folds curly quotes to `'` and en/em dashes to `-`, drops anything
/// outside printable ASCII (ASCII whitespace is kept), then drops everything that
/// is not a word character or whitespace. Whitespace runs are left as they are.
///
/// `normalize(normalize(x)) == normalize(x)` for every input.
pub fn normalize(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(fold_typography)
        .filter(|c| c.is_ascii_graphic() || c.is_ascii_whitespace())
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || c.is_ascii_whitespace())
        .collect()
}

/// Split normalized text into keywords.
pub fn keywords(text: &str) -> Vec<String> {
    normalize(text).split_whitespace().map(str::to_string).collect()
}

fn fold_typography(c: char) -> char {
    match c {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '\'',
        '\u{2013}' | '\u{2014}' => '-',
        other => other,
    }
}
