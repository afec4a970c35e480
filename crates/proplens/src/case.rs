//! Identifier case conversion
//!
//! Splits an identifier into lowercase words at runs of non-letters and at
//! lower→upper transitions, then rebuilds it in the requested style:
//!
//! | style         | `postal_code`  |
//! |---------------|----------------|
//! | `camel`       | `postalCode`   |
//! | `pascal`      | `PostalCode`   |
//! | `snake`       | `postal_code`  |
//! | `kebab`       | `postal-code`  |
//! | `upper_snake` | `POSTAL_CODE`  |

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

static NON_LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z]+").unwrap());
static LOWER_UPPER: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])([A-Z])").unwrap());

/// Per-word transformation applied by [`normalize_words`]
pub type WordTransform = fn(&str) -> String;

/// Unrecognized case style name passed to [`to`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown case: {0}")]
pub struct UnknownCase(pub String);

/// Supported case styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Case {
    /// `postalCode`
    Camel,
    /// `PostalCode`
    Pascal,
    /// `postal_code`
    Snake,
    /// `postal-code`
    Kebab,
    /// `POSTAL_CODE`
    UpperSnake,
}

impl Case {
    /// Convert `input` to this style
    pub fn apply(self, input: &str) -> String {
        match self {
            Case::Camel => to_camel(input),
            Case::Pascal => to_pascal(input),
            Case::Snake => to_snake(input),
            Case::Kebab => to_kebab(input),
            Case::UpperSnake => to_upper_snake(input),
        }
    }

    /// Name accepted by [`to`]
    pub fn name(self) -> &'static str {
        match self {
            Case::Camel => "camel",
            Case::Pascal => "pascal",
            Case::Snake => "snake",
            Case::Kebab => "kebab",
            Case::UpperSnake => "upper_snake",
        }
    }
}

impl FromStr for Case {
    type Err = UnknownCase;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "camel" => Ok(Case::Camel),
            "pascal" => Ok(Case::Pascal),
            "snake" => Ok(Case::Snake),
            "kebab" => Ok(Case::Kebab),
            "upper_snake" => Ok(Case::UpperSnake),
            _ => Err(UnknownCase(s.to_string())),
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase a word
pub fn lowercase(word: &str) -> String {
    word.to_lowercase()
}

/// Uppercase a word
pub fn uppercase(word: &str) -> String {
    word.to_uppercase()
}

/// Uppercase the first character of a word
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn split_words(input: &str) -> Vec<String> {
    let separated = NON_LETTERS.replace_all(input, "_");
    let separated = LOWER_UPPER.replace_all(&separated, "${1}_${2}");
    separated
        .split('_')
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Split `input` into lowercase words, transform each word, and join them
///
/// Transforms run in order over every word. Never fails: an input without
/// letters produces an empty string.
pub fn normalize_words(input: &str, transforms: &[WordTransform], separator: &str) -> String {
    let mut words = split_words(input);
    for transform in transforms {
        for word in words.iter_mut() {
            *word = transform(word);
        }
    }
    words.join(separator)
}

/// `postalCode`
pub fn to_camel(input: &str) -> String {
    let pascal = to_pascal(input);
    let mut chars = pascal.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `PostalCode`
pub fn to_pascal(input: &str) -> String {
    normalize_words(input, &[capitalize], "")
}

/// `postal_code`
pub fn to_snake(input: &str) -> String {
    normalize_words(input, &[], "_")
}

/// `postal-code`
pub fn to_kebab(input: &str) -> String {
    normalize_words(input, &[], "-")
}

/// `POSTAL_CODE`
pub fn to_upper_snake(input: &str) -> String {
    normalize_words(input, &[uppercase], "_")
}

/// Convert `input` to the style named `case`
///
/// Accepted names: `camel`, `pascal`, `snake`, `kebab`, `upper_snake`.
pub fn to(case: &str, input: &str) -> Result<String, UnknownCase> {
    Ok(case.parse::<Case>()?.apply(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SPELLINGS: [&str; 6] = [
        "postal_code",
        "PostalCode",
        "postalCode",
        "postal-code",
        "postal code",
        "postal+code",
    ];

    #[test]
    fn test_case_table() {
        for input in SPELLINGS {
            assert_eq!(to_pascal(input), "PostalCode", "pascal of {input}");
            assert_eq!(to_snake(input), "postal_code", "snake of {input}");
            assert_eq!(to_kebab(input), "postal-code", "kebab of {input}");
            assert_eq!(to_camel(input), "postalCode", "camel of {input}");
            assert_eq!(to_upper_snake(input), "POSTAL_CODE", "upper snake of {input}");
        }
    }

    #[test]
    fn test_to_dispatch() {
        assert_eq!(to("kebab", "PostalCode").unwrap(), "postal-code");
        assert_eq!(to("upper_snake", "postalCode").unwrap(), "POSTAL_CODE");
    }

    #[test]
    fn test_unknown_case() {
        let err = to("screaming", "x").unwrap_err();
        assert_eq!(err, UnknownCase("screaming".to_string()));
        assert_eq!(err.to_string(), "Unknown case: screaming");
    }

    #[test]
    fn test_no_letters() {
        assert_eq!(to_camel(""), "");
        assert_eq!(to_snake("123 _-"), "");
        assert_eq!(normalize_words("42", &[uppercase], "_"), "");
    }

    #[test]
    fn test_rust_method_remainders() {
        assert_eq!(to_camel("_hidden"), "hidden");
        assert_eq!(to_camel("_public_snake_case"), "publicSnakeCase");
        assert_eq!(to_camel("PublicSnakeCase"), "publicSnakeCase");
    }

    #[test]
    fn test_digits_split_words() {
        assert_eq!(to_snake("address2Line"), "address_line");
    }

    #[test]
    fn test_transforms_apply_in_order() {
        let out = normalize_words("postal code", &[uppercase, lowercase, capitalize], ".");
        assert_eq!(out, "Postal.Code");
    }

    #[test]
    fn test_case_from_str_round_trip() {
        for case in [Case::Camel, Case::Pascal, Case::Snake, Case::Kebab, Case::UpperSnake] {
            assert_eq!(case.name().parse::<Case>(), Ok(case));
        }
    }

    proptest! {
        #[test]
        fn prop_snake_is_idempotent(input in "[A-Za-z _-]{0,24}") {
            let once = to_snake(&input);
            prop_assert_eq!(to_snake(&once), once);
        }

        #[test]
        fn prop_separated_styles_agree_on_words(input in "[A-Za-z0-9 _+-]{0,24}") {
            prop_assert_eq!(to_snake(&to_kebab(&input)), to_snake(&input));
            prop_assert_eq!(to_snake(&to_upper_snake(&input)), to_snake(&input));
        }
    }
}
