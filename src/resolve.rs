//! Key path resolution.
//!
//! A key is tried against the active language first, then the fallback
//! language, in this order:
//!
//! 1. nested path (`"crops.fillRequiredFields"`), only for keys containing a `.`
//! 2. the key as a top-level entry
//! 3. the key as a direct child of any top-level section, first section wins
//!    (`"dashboard"` finds `nav.dashboard`)
//! 4. nested path in the fallback language
//! 5. top-level entry in the fallback language
//!
//! When all of them miss, the key itself is returned so a missing
//! translation shows up as its key path instead of blank text.

use bevy::log::trace;
use once_cell::sync::Lazy;
use regex::{ Captures, Regex };

use crate::{ Language, TranslationTree, Translations };

const SEPARATOR: char = '.';

static ARG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{(\w*)\}\}").unwrap());

fn nested<'a>(tree: &'a TranslationTree, key: &str) -> Option<&'a str> {
    if key.contains(SEPARATOR) { tree.get_path(key) } else { None }
}

/// Runs the lookup chain without the last-resort fallback to the key.
pub fn lookup<'a>(
    translations: &'a Translations,
    lang: Language,
    fallback: Language,
    key: &str
) -> Option<&'a str> {
    let tree = translations.tree(lang);
    let found = nested(tree, key)
        .or_else(|| tree.get_top_level(key))
        .or_else(|| tree.find_in_sections(key));
    if found.is_some() || lang == fallback {
        return found;
    }

    let fallback_tree = translations.tree(fallback);
    nested(fallback_tree, key).or_else(|| fallback_tree.get_top_level(key))
}

/// Resolves `key` to display text. Never fails: an unknown key comes back
/// unchanged.
pub fn resolve(translations: &Translations, lang: Language, fallback: Language, key: &str) -> String {
    match lookup(translations, lang, fallback, key) {
        Some(text) => text.to_string(),
        None => {
            trace!("Missing translation for '{}' in '{}'", key, lang);
            key.to_string()
        }
    }
}

/// Replaces `{{name}}` placeholders with the matching argument. Placeholders
/// without an argument are left untouched.
pub fn interpolate(template: &str, args: &[(&str, &dyn ToString)]) -> String {
    ARG_RE.replace_all(template, |caps: &Captures| {
        let name = &caps[1];
        args.iter()
            .find(|(arg, _)| *arg == name)
            .map(|(_, value)| value.to_string())
            .unwrap_or_else(|| caps[0].to_string())
    }).into_owned()
}
