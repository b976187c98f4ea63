use std::sync::Arc;

use bevy::log::{ error, info };
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::{ I18nError, Language, TranslationTree };

/// File stem whose entries are merged at the root of a language tree
/// instead of becoming a section named after the file.
pub const ROOT_FILE: &str = "_root";

/// Translation trees for every [`Language`].
///
/// Organized as: `language -> tree`. Built once at startup and only read
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations {
    trees: [TranslationTree; Language::ALL.len()],
}

impl Translations {
    /// An empty tree for each language.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self, lang: Language) -> &TranslationTree {
        &self.trees[lang.index()]
    }

    pub fn tree_mut(&mut self, lang: Language) -> &mut TranslationTree {
        &mut self.trees[lang.index()]
    }

    pub fn with_tree(mut self, lang: Language, tree: TranslationTree) -> Self {
        self.trees[lang.index()] = tree;
        self
    }

    /// Languages with at least one translation.
    pub fn loaded_languages(&self) -> Vec<Language> {
        Language::ALL.into_iter()
            .filter(|lang| !self.tree(*lang).is_empty())
            .collect()
    }

    /// Merges one translation file of `lang`. The file becomes the section
    /// `file_stem`, except [`ROOT_FILE`] which is merged at the root.
    pub fn merge_file(
        &mut self,
        lang: Language,
        file_stem: &str,
        value: &Value
    ) -> Result<(), I18nError> {
        let tree = self.tree_mut(lang);
        if file_stem == ROOT_FILE {
            tree.merge_json(value, &format!("{lang}/{file_stem}"))
        } else {
            tree.merge_section_json(file_stem, value)
        }
    }

    /// Leaf paths of `reference` that `lang` does not translate.
    pub fn missing_paths(&self, lang: Language, reference: Language) -> Vec<String> {
        let tree = self.tree(lang);
        self.tree(reference)
            .leaf_paths()
            .into_iter()
            .filter(|path| tree.get_path(path).is_none())
            .collect()
    }
}

// ---------- Loaders ----------

/// Translations bundled into the binary by `build.rs`, parsed on first use.
pub static BUNDLED: Lazy<Arc<Translations>> = Lazy::new(|| {
    match load_bundled_data() {
        Ok(translations) => Arc::new(translations),
        Err(e) => {
            error!("Failed to load bundled translations: {}", e);
            Arc::new(Translations::new())
        }
    }
});

pub fn bundled_translations() -> Arc<Translations> {
    Arc::clone(&BUNDLED)
}

fn load_bundled_data() -> Result<Translations, I18nError> {
    const BUNDLED_TRANSLATIONS: &str = include_str!(
        concat!(env!("OUT_DIR"), "/all_translations.json")
    );

    let value: Value = serde_json::from_str(BUNDLED_TRANSLATIONS).map_err(|source| I18nError::Json {
        path: "all_translations.json".into(),
        source,
    })?;
    parse_translation_value(&value)
}

/// Parses `{ "<lang>": { "<file>": { ... } } }`, the layout written by `build.rs`.
pub fn parse_translation_value(value: &Value) -> Result<Translations, I18nError> {
    let langs = value.as_object().ok_or_else(|| I18nError::InvalidRoot("bundle".to_string()))?;
    let mut translations = Translations::new();

    for (code, files_value) in langs {
        let lang: Language = match code.parse() {
            Ok(lang) => lang,
            Err(e) => {
                bevy::log::warn!("Skipping translations: {}", e);
                continue;
            }
        };

        let files = files_value.as_object().ok_or_else(|| I18nError::InvalidRoot(code.clone()))?;
        for (file_stem, content) in files {
            translations.merge_file(lang, file_stem, content)?;
        }
    }

    Ok(translations)
}

/// Reads `<messages_folder>/<lang>/<file>.json`. Folders and files are
/// merged in name order.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_translations_from_fs(messages_folder: &str) -> Result<Translations, I18nError> {
    use std::fs;
    use std::path::{ Path, PathBuf };

    fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, I18nError> {
        let mut entries = fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort();
        Ok(entries)
    }

    let message_dir = Path::new(messages_folder);
    if !message_dir.is_dir() {
        return Err(I18nError::MissingFolder(message_dir.to_path_buf()));
    }

    let mut translations = Translations::new();

    for folder in sorted_entries(message_dir)? {
        if !folder.is_dir() {
            continue;
        }
        let code = folder.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        let lang: Language = match code.parse() {
            Ok(lang) => lang,
            Err(e) => {
                bevy::log::warn!("Skipping folder {}: {}", folder.display(), e);
                continue;
            }
        };

        for path in sorted_entries(&folder)? {
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let file_stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();

            let content = fs::read_to_string(&path)?;
            let json: Value = serde_json
                ::from_str(&content)
                .map_err(|source| I18nError::Json { path: path.clone(), source })?;
            translations.merge_file(lang, &file_stem, &json)?;
        }
    }

    info!(
        "Loaded translations from '{}' for {:?}",
        messages_folder,
        translations.loaded_languages()
    );
    Ok(translations)
}

#[cfg(target_arch = "wasm32")]
pub fn load_translations_from_fs(_messages_folder: &str) -> Result<Translations, I18nError> {
    Err(I18nError::Io(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "filesystem loading is not available on WASM"
    )))
}
