// SPDX-License-Identifier: PMPL-1.0-or-later

//! Numerus form selection.
//!
//! A numerus message in a `.ts` file stores its plural forms in a fixed,
//! language-specific order. [`PluralRule`] maps a count to the index of the
//! form to use. Only the rule families needed by the catalogs we ship are
//! modelled; anything unrecognised behaves like English.

use crate::lang::primary_language;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PluralRule {
    /// No plural distinction (Japanese, Chinese, Korean, ...).
    Single,
    /// `1` vs everything else.
    #[default]
    OneOther,
    /// `0` and `1` share the singular.
    French,
    /// `1`; `2..=4` unless `12..=14`; everything else.
    Polish,
    /// Russian/Ukrainian/Belarusian three-way split on the last digits.
    EastSlavic,
    /// `1`; `2..=4`; everything else.
    Czech,
}

impl PluralRule {
    /// Rule for a language code or `.ts` locale tag (`pl`, `pl_PL`, `pt-BR`).
    pub fn for_language(tag: &str) -> Self {
        let Some(code) = primary_language(tag) else {
            return Self::OneOther;
        };
        match code.as_str() {
            "pl" => Self::Polish,
            "ru" | "uk" | "be" => Self::EastSlavic,
            "cs" | "sk" => Self::Czech,
            "fr" | "pt" => Self::French,
            "ja" | "zh" | "ko" | "vi" | "th" | "id" | "ms" | "tr" => Self::Single,
            _ => Self::OneOther,
        }
    }

    /// Number of numerus forms a fully translated message carries.
    pub fn form_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::OneOther | Self::French => 2,
            Self::Polish | Self::EastSlavic | Self::Czech => 3,
        }
    }

    pub fn form_index(self, n: u64) -> usize {
        let rem10 = n % 10;
        let rem100 = n % 100;
        match self {
            Self::Single => 0,
            Self::OneOther => usize::from(n != 1),
            Self::French => usize::from(n > 1),
            Self::Polish => {
                if n == 1 {
                    0
                } else if (2..=4).contains(&rem10) && !(12..=14).contains(&rem100) {
                    1
                } else {
                    2
                }
            }
            Self::EastSlavic => {
                if rem10 == 1 && rem100 != 11 {
                    0
                } else if (2..=4).contains(&rem10) && !(12..=14).contains(&rem100) {
                    1
                } else {
                    2
                }
            }
            Self::Czech => match n {
                1 => 0,
                2..=4 => 1,
                _ => 2,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polish_forms() {
        let rule = PluralRule::for_language("pl_PL");
        assert_eq!(rule, PluralRule::Polish);
        let picks: Vec<usize> = [0, 1, 2, 4, 5, 12, 14, 21, 22, 25, 102, 112]
            .iter()
            .map(|&n| rule.form_index(n))
            .collect();
        assert_eq!(picks, vec![2, 0, 1, 1, 2, 2, 2, 2, 1, 2, 1, 2]);
    }

    #[test]
    fn east_slavic_singular_on_21() {
        let rule = PluralRule::for_language("ru");
        assert_eq!(rule.form_index(21), 0);
        assert_eq!(rule.form_index(11), 2);
        assert_eq!(rule.form_index(23), 1);
    }

    #[test]
    fn french_zero_is_singular() {
        let rule = PluralRule::for_language("fr-CA");
        assert_eq!(rule.form_index(0), 0);
        assert_eq!(rule.form_index(2), 1);
    }

    #[test]
    fn unknown_language_is_english_like() {
        assert_eq!(PluralRule::for_language("qq"), PluralRule::OneOther);
        assert_eq!(PluralRule::for_language(""), PluralRule::OneOther);
        assert_eq!(PluralRule::OneOther.form_count(), 2);
    }

    #[test]
    fn single_form_languages() {
        let rule = PluralRule::for_language("ja_JP");
        assert_eq!(rule.form_index(7), 0);
        assert_eq!(rule.form_count(), 1);
    }
}
