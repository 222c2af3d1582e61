// SPDX-License-Identifier: PMPL-1.0-or-later

//! Language tags and ISO 639-1 metadata.
//!
//! `.ts` files carry POSIX-style locale tags in the `language` and
//! `sourcelanguage` attributes (`pl_PL`, `en`, `pt_BR`). Everything here
//! works on the two-letter primary subtag.
//!
//! Reference: <https://www.loc.gov/standards/iso639-2/php/code_list.php>

use regex::Regex;
use std::sync::LazyLock;

static LOCALE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z]{2,3})(?:[_-][A-Za-z0-9]{2,8})*(?:@[A-Za-z0-9]+)?$")
        .expect("static locale tag regex")
});

/// Lower-cased primary language subtag of a locale tag.
///
/// # Examples
/// ```
/// use linguist_catalog::lang::primary_language;
/// assert_eq!(primary_language("pl_PL").as_deref(), Some("pl"));
/// assert_eq!(primary_language("sr-Latn-RS").as_deref(), Some("sr"));
/// assert_eq!(primary_language("not a tag"), None);
/// ```
pub fn primary_language(tag: &str) -> Option<String> {
    LOCALE_TAG
        .captures(tag.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

/// Every ISO 639-1 code, sorted.
const ISO_639_1: &[&str] = &[
    "aa", "ab", "ae", "af", "ak", "am", "an", "ar", "as", "av", "ay", "az", "ba", "be", "bg",
    "bh", "bi", "bm", "bn", "bo", "br", "bs", "ca", "ce", "ch", "co", "cr", "cs", "cu", "cv",
    "cy", "da", "de", "dv", "dz", "ee", "el", "en", "eo", "es", "et", "eu", "fa", "ff", "fi",
    "fj", "fo", "fr", "fy", "ga", "gd", "gl", "gn", "gu", "gv", "ha", "he", "hi", "ho", "hr",
    "ht", "hu", "hy", "hz", "ia", "id", "ie", "ig", "ii", "ik", "io", "is", "it", "iu", "ja",
    "jv", "ka", "kg", "ki", "kj", "kk", "kl", "km", "kn", "ko", "kr", "ks", "ku", "kv", "kw",
    "ky", "la", "lb", "lg", "li", "ln", "lo", "lt", "lu", "lv", "mg", "mh", "mi", "mk", "ml",
    "mn", "mr", "ms", "mt", "my", "na", "nb", "nd", "ne", "ng", "nl", "nn", "no", "nr", "nv",
    "ny", "oc", "oj", "om", "or", "os", "pa", "pi", "pl", "ps", "pt", "qu", "rm", "rn", "ro",
    "ru", "rw", "sa", "sc", "sd", "se", "sg", "si", "sk", "sl", "sm", "sn", "so", "sq", "sr",
    "ss", "st", "su", "sv", "sw", "ta", "te", "tg", "th", "ti", "tk", "tl", "tn", "to", "tr",
    "ts", "tt", "tw", "ty", "ug", "uk", "ur", "uz", "ve", "vi", "vo", "wa", "wo", "xh", "yi",
    "yo", "za", "zh", "zu",
];

/// (code, English name, native name) for languages Qt ships catalogs for.
const LANGUAGE_NAMES: &[(&str, &str, &str)] = &[
    ("ar", "Arabic", "العربية"),
    ("bg", "Bulgarian", "Български"),
    ("ca", "Catalan", "Català"),
    ("cs", "Czech", "Čeština"),
    ("da", "Danish", "Dansk"),
    ("de", "German", "Deutsch"),
    ("el", "Greek", "Ελληνικά"),
    ("en", "English", "English"),
    ("es", "Spanish", "Español"),
    ("fa", "Persian", "فارسی"),
    ("fi", "Finnish", "Suomi"),
    ("fr", "French", "Français"),
    ("gd", "Scottish Gaelic", "Gàidhlig"),
    ("gl", "Galician", "Galego"),
    ("he", "Hebrew", "עברית"),
    ("hr", "Croatian", "Hrvatski"),
    ("hu", "Hungarian", "Magyar"),
    ("it", "Italian", "Italiano"),
    ("ja", "Japanese", "日本語"),
    ("ka", "Georgian", "ქართული"),
    ("ko", "Korean", "한국어"),
    ("lt", "Lithuanian", "Lietuvių"),
    ("lv", "Latvian", "Latviešu"),
    ("nb", "Norwegian Bokmål", "Norsk bokmål"),
    ("nl", "Dutch", "Nederlands"),
    ("nn", "Norwegian Nynorsk", "Norsk nynorsk"),
    ("pl", "Polish", "Polski"),
    ("pt", "Portuguese", "Português"),
    ("ru", "Russian", "Русский"),
    ("sk", "Slovak", "Slovenčina"),
    ("sl", "Slovenian", "Slovenščina"),
    ("sv", "Swedish", "Svenska"),
    ("tr", "Turkish", "Türkçe"),
    ("uk", "Ukrainian", "Українська"),
    ("zh", "Chinese", "中文"),
];

/// Whether `code` is a lower-case ISO 639-1 code.
///
/// # Examples
/// ```
/// assert!(linguist_catalog::lang::is_valid_iso639_1("pl"));
/// assert!(!linguist_catalog::lang::is_valid_iso639_1("xx"));
/// ```
pub fn is_valid_iso639_1(code: &str) -> bool {
    ISO_639_1.binary_search(&code).is_ok()
}

fn names(code: &str) -> Option<(&'static str, &'static str)> {
    LANGUAGE_NAMES
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|(_, english, native)| (*english, *native))
}

pub fn language_name(code: &str) -> Option<&'static str> {
    names(code).map(|(english, _)| english)
}

pub fn native_name(code: &str) -> Option<&'static str> {
    names(code).map(|(_, native)| native)
}

/// Human-readable label for a locale tag, e.g. `"Polish (pl_PL)"`, or
/// `"Polish / Polski (pl_PL)"` with `native` set.
pub fn describe_with(tag: &str, native: bool) -> String {
    let Some((english, native_form)) = primary_language(tag).as_deref().and_then(names) else {
        return tag.to_string();
    };
    if native && native_form != english {
        format!("{} / {} ({})", english, native_form, tag)
    } else {
        format!("{} ({})", english, tag)
    }
}

pub fn describe(tag: &str) -> String {
    describe_with(tag, false)
}
