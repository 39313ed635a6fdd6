use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Trims leading/trailing whitespace while borrowing the original when unchanged.
pub fn trim(input: &str) -> Cow<'_, str> {
    Cow::Borrowed(input.trim())
}

/// Collapses each run of whitespace to a single ASCII space.
pub fn collapse_whitespace(input: &str) -> Cow<'_, str> {
    let needs_rewrite = input
        .chars()
        .zip(input.chars().skip(1))
        .any(|(a, b)| a.is_whitespace() && b.is_whitespace())
        || input.chars().any(|c| c.is_whitespace() && c != ' ');
    if needs_rewrite {
        Cow::Owned(WHITESPACE_RUN.replace_all(input, " ").into_owned())
    } else {
        Cow::Borrowed(input)
    }
}

/// Upper-cases the first letter of each whitespace-delimited word and
/// lower-cases the letters after it. Leading punctuation such as `(` or `"`
/// is kept and does not count as the first letter.
pub fn title_case(input: &str) -> Cow<'_, str> {
    let mut output = String::with_capacity(input.len());
    let mut awaiting_letter = true;
    for ch in input.chars() {
        if ch.is_whitespace() {
            awaiting_letter = true;
            output.push(ch);
        } else if !ch.is_alphabetic() {
            output.push(ch);
        } else if awaiting_letter {
            awaiting_letter = false;
            output.extend(ch.to_uppercase());
        } else {
            output.extend(ch.to_lowercase());
        }
    }
    if output == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(output)
    }
}

/// Title case followed by whitespace collapsing.
pub fn standardize(input: &str) -> Cow<'_, str> {
    match title_case(input) {
        Cow::Borrowed(unchanged) => collapse_whitespace(unchanged),
        Cow::Owned(titled) => Cow::Owned(collapse_whitespace(&titled).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("hello WORLD").as_ref(), "Hello World");
        assert_eq!(title_case("o'neil").as_ref(), "O'neil");
        assert_eq!(title_case("éclair au café").as_ref(), "Éclair Au Café");
    }

    #[test]
    fn title_case_skips_leading_punctuation() {
        assert_eq!(title_case("(hello) \"world\"").as_ref(), "(Hello) \"World\"");
        assert_eq!(title_case("'quoted' TEXT").as_ref(), "'Quoted' Text");
        assert_eq!(title_case("2nd place").as_ref(), "2Nd Place");
    }

    #[test]
    fn title_case_borrows_when_already_titled() {
        assert!(matches!(title_case("Already Fine"), Cow::Borrowed(_)));
        assert!(matches!(title_case("2020"), Cow::Borrowed(_)));
    }

    #[test]
    fn collapse_whitespace_merges_runs_and_tabs() {
        assert_eq!(collapse_whitespace("a   b\t\tc").as_ref(), "a b c");
        assert_eq!(collapse_whitespace("a\tb").as_ref(), "a b");
        assert!(matches!(collapse_whitespace("a b c"), Cow::Borrowed(_)));
    }

    #[test]
    fn standardize_combines_both_rules() {
        assert_eq!(standardize("new   YORK  city").as_ref(), "New York City");
        assert_eq!(standardize("").as_ref(), "");
    }

    #[test]
    fn trim_strips_outer_whitespace_only() {
        assert_eq!(trim("  a  b ").as_ref(), "a  b");
        assert_eq!(trim("x").as_ref(), "x");
    }
}
