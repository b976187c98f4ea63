#![doc = include_str!("../README.md")]

//! # krishi-intl
//!
//! Translations for the KrishiMitra farm app (crop catalog, market prices,
//! cost calculator, marketplace and recommendations) as a [Bevy](https://bevyengine.org/) plugin:
//!
//! - **Languages**: English, Hindi and Marathi ([`Language`])
//! - **Key paths**: dot-delimited keys into nested JSON (`"crops.fillRequiredFields"`)
//! - **Bare keys**: `"dashboard"` is found inside any section, e.g. `nav.dashboard`
//! - **Fallback System**: missing keys fall back to English, then to the key itself
//! - **Placeholders**: `{{name}}` replacement
//! - **Live switching**: [`LocalizedText`] entities re-render when the language changes
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use krishi_intl::{ I18nPlugin, LocalizedText };
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(I18nPlugin::default())
//!         .add_systems(Startup, setup_ui)
//!         .run();
//! }
//!
//! fn setup_ui(mut commands: Commands, i18n: Res<krishi_intl::I18n>) {
//!     commands.spawn((Text::new(i18n.t("appName")), Node::default()));
//!     commands.spawn((Text::new(""), LocalizedText::new("dashboard.title")));
//! }
//! ```
//!
//! ## Translation files
//! - `messages/<lang>/<section>.json` becomes the section `<section>`
//! - `messages/<lang>/_root.json` holds top-level keys such as `appName`
//! - **Bundled** (default on WASM or with `bundle-only`): embedded at build time
//! - **Filesystem**: read from [`I18nConfig::messages_folder`] at startup

use std::sync::Arc;

use bevy::prelude::*;
use serde::Deserialize;

mod error;
mod language;
pub mod resolve;
pub mod store;
mod text;
mod tree;

pub use error::I18nError;
pub use language::Language;
pub use store::Translations;
pub use text::{ ChangeLanguage, LanguageChanged, LocalizedText };
pub use tree::{ Section, TranslationNode, TranslationTree };

/// Configuration for the I18n plugin.
///
/// # Example
///
/// ```rust
/// use krishi_intl::{ I18nConfig, Language };
///
/// let config = I18nConfig {
///     use_bundled_translations: false,
///     messages_folder: "locales".to_string(),
///     default_lang: Language::Mr,
///     fallback_lang: Language::En,
/// };
/// ```
#[derive(Debug, Clone, Resource, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    /// Whether to use bundled translations (true) or filesystem loading (false).
    /// Defaults to `true` for WASM targets or when the `bundle-only` feature is enabled.
    pub use_bundled_translations: bool,
    /// Path to the messages folder containing translation files.
    /// Default: "messages"
    pub messages_folder: String,
    /// Language active at startup.
    /// Default: English
    pub default_lang: Language,
    /// Language consulted when the active one misses a key.
    /// Default: English
    pub fallback_lang: Language,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            use_bundled_translations: cfg!(target_arch = "wasm32") || cfg!(feature = "bundle-only"),
            messages_folder: "messages".to_string(),
            default_lang: Language::En,
            fallback_lang: Language::En,
        }
    }
}

// ---------- Bevy Plugin ----------

/// Main plugin.
///
/// Inserts [`I18nConfig`] and [`I18n`], applies [`ChangeLanguage`] requests,
/// writes [`LanguageChanged`] and keeps [`LocalizedText`] up to date.
///
/// ```rust
/// use bevy::prelude::*;
/// use krishi_intl::{ I18nConfig, I18nPlugin, Language };
///
/// App::new().add_plugins(I18nPlugin::with_config(I18nConfig {
///     default_lang: Language::Hi,
///     ..Default::default()
/// }));
/// ```
#[derive(Default)]
pub struct I18nPlugin {
    pub config: I18nConfig,
}

impl I18nPlugin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: I18nConfig) -> Self {
        Self { config }
    }
}

impl Plugin for I18nPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.config.clone())
            .init_resource::<I18n>()
            .add_message::<ChangeLanguage>()
            .add_message::<LanguageChanged>()
            .add_systems(
                PostUpdate,
                (
                    text::apply_language_requests,
                    text::announce_language_change,
                    text::refresh_localized_text,
                ).chain()
            );
    }
}

/// Active language plus the translation store.
///
/// ```rust
/// use bevy::prelude::*;
/// use krishi_intl::{ I18n, Language };
///
/// fn crop_form(mut i18n: ResMut<I18n>) {
///     i18n.set_lang(Language::Hi);
///     let warning = i18n.t("crops.fillRequiredFields");
///     println!("{warning}");
/// }
/// ```
#[derive(Resource, Debug, Clone)]
pub struct I18n {
    translations: Arc<Translations>,
    current_lang: Language,
    fallback_lang: Language,
}

impl FromWorld for I18n {
    fn from_world(world: &mut World) -> Self {
        let config = world.get_resource::<I18nConfig>().cloned().unwrap_or_default();

        let translations = if config.use_bundled_translations {
            store::bundled_translations()
        } else {
            load_filesystem_translations(&config.messages_folder)
        };

        report_incomplete_languages(&translations, config.fallback_lang);
        Self::new(translations, config.default_lang, config.fallback_lang)
    }
}

fn load_filesystem_translations(messages_folder: &str) -> Arc<Translations> {
    match store::load_translations_from_fs(messages_folder) {
        Ok(translations) => Arc::new(translations),
        Err(e) => {
            warn!("Failed to load translations from '{}', using bundled ones: {}", messages_folder, e);
            store::bundled_translations()
        }
    }
}

fn report_incomplete_languages(translations: &Translations, fallback: Language) {
    for lang in Language::ALL {
        if lang == fallback {
            continue;
        }
        let missing = translations.missing_paths(lang, fallback);
        if !missing.is_empty() {
            debug!("'{}' lacks {} keys, '{}' will be used for them", lang, missing.len(), fallback);
        }
    }
}

impl I18n {
    /// Builds the resource directly, e.g. for views used outside an `App`.
    pub fn new(translations: Arc<Translations>, current_lang: Language, fallback_lang: Language) -> Self {
        Self { translations, current_lang, fallback_lang }
    }

    /// Resolves a key path in the active language.
    ///
    /// Never fails: an unknown key is returned as-is.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use krishi_intl::{ I18n, Language, Translations };
    /// let i18n = I18n::new(Arc::new(Translations::new()), Language::Mr, Language::En);
    /// assert_eq!(i18n.t("nonexistent.path"), "nonexistent.path");
    /// ```
    pub fn t(&self, key: &str) -> String {
        resolve::resolve(&self.translations, self.current_lang, self.fallback_lang, key)
    }

    /// Like [`I18n::t`], then replaces `{{name}}` placeholders.
    ///
    /// ```rust
    /// # use krishi_intl::{ I18n, Language };
    /// # let i18n = I18n::new(krishi_intl::store::bundled_translations(), Language::En, Language::En);
    /// let text = i18n.t_with_args("marketplace.offerSent", &[("price", &2150), ("seller", &"Ramesh")]);
    /// assert_eq!(text, "Offer of ₹2150/quintal sent to Ramesh");
    /// ```
    pub fn t_with_args(&self, key: &str, args: &[(&str, &dyn ToString)]) -> String {
        resolve::interpolate(&self.t(key), args)
    }

    /// Resolves without the fallback to the key, to detect missing translations.
    pub fn get(&self, key: &str) -> Option<&str> {
        resolve::lookup(&self.translations, self.current_lang, self.fallback_lang, key)
    }

    pub fn set_lang(&mut self, lang: Language) {
        if self.translations.tree(lang).is_empty() {
            warn!("No translations loaded for '{}', '{}' will be shown", lang, self.fallback_lang);
        }
        self.current_lang = lang;
    }

    /// Sets the active language from its code. Unknown codes leave it unchanged.
    pub fn set_lang_code(&mut self, code: &str) -> Result<(), I18nError> {
        let lang = code.parse::<Language>().inspect_err(|e| warn!("{}", e))?;
        self.set_lang(lang);
        Ok(())
    }

    pub fn get_lang(&self) -> Language {
        self.current_lang
    }

    pub fn fallback_lang(&self) -> Language {
        self.fallback_lang
    }

    pub fn set_fallback_lang(&mut self, lang: Language) {
        self.fallback_lang = lang;
    }

    pub fn available_languages(&self) -> &'static [Language] {
        &Language::ALL
    }

    pub fn translations(&self) -> &Translations {
        &self.translations
    }
}

// ---------- App helpers ----------

/// Extension trait for `App` to set languages by code.
///
/// ```rust
/// use bevy::prelude::*;
/// use krishi_intl::{ I18nPlugin, LanguageAppExt };
///
/// let mut app = App::new();
/// app.add_plugins(I18nPlugin::default());
/// app.set_lang_i18n("mr");
/// app.set_fallback_lang("en");
/// ```
pub trait LanguageAppExt {
    /// Sets the current language. Warns about unknown codes.
    fn set_lang_i18n(&mut self, locale: &str);
    /// Sets the fallback language. Warns about unknown codes.
    fn set_fallback_lang(&mut self, locale: &str);
}

impl LanguageAppExt for App {
    fn set_lang_i18n(&mut self, locale: &str) {
        let Ok(lang) = locale.parse::<Language>() else {
            warn!("Locale '{}' not found in available translations", locale);
            return;
        };
        if let Some(mut i18n) = self.world_mut().get_resource_mut::<I18n>() {
            if i18n.get_lang() != lang {
                i18n.set_lang(lang);
            }
        }
    }

    fn set_fallback_lang(&mut self, locale: &str) {
        let Ok(lang) = locale.parse::<Language>() else {
            warn!("Fallback locale '{}' not found in available translations", locale);
            return;
        };
        if let Some(mut i18n) = self.world_mut().get_resource_mut::<I18n>() {
            i18n.set_fallback_lang(lang);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled(lang: Language) -> I18n {
        I18n::new(store::bundled_translations(), lang, Language::En)
    }

    #[test]
    fn resolution_follows_active_language() {
        let mut i18n = bundled(Language::En);
        let english = i18n.t("dashboard.title");
        i18n.set_lang(Language::Hi);
        let hindi = i18n.t("dashboard.title");
        assert_ne!(english, hindi);
        assert_eq!(i18n.get_lang(), Language::Hi);
    }

    #[test]
    fn set_lang_code_rejects_unknown_codes() {
        let mut i18n = bundled(Language::Hi);
        assert!(matches!(i18n.set_lang_code("fr"), Err(I18nError::UnknownLanguage(_))));
        assert_eq!(i18n.get_lang(), Language::Hi);

        i18n.set_lang_code("MR").unwrap();
        assert_eq!(i18n.get_lang(), Language::Mr);
    }

    #[test]
    fn get_distinguishes_missing_keys() {
        let i18n = bundled(Language::Mr);
        assert_eq!(i18n.get("nonexistent.path"), None);
        assert_eq!(i18n.t("nonexistent.path"), "nonexistent.path");
        assert!(i18n.get("dashboard").is_some());
    }

    #[test]
    fn interpolated_toasts() {
        let i18n = bundled(Language::En);
        assert_eq!(
            i18n.t_with_args("market.priceUpdated", &[("crop", &"Onion"), ("apmc", &"Lasalgaon"), ("price", &1800)]),
            "Price for Onion in Lasalgaon updated to ₹1800"
        );
    }

    #[test]
    fn every_language_is_available() {
        assert_eq!(bundled(Language::En).available_languages(), &Language::ALL);
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: I18nConfig = serde_json::from_str(r#"{ "default_lang": "mr" }"#).unwrap();
        assert_eq!(config.default_lang, Language::Mr);
        assert_eq!(config.fallback_lang, Language::En);
        assert_eq!(config.messages_folder, "messages");
    }

    #[test]
    fn plugin_uses_configured_languages() {
        let mut app = App::new();
        app.add_plugins(
            I18nPlugin::with_config(I18nConfig {
                use_bundled_translations: true,
                default_lang: Language::Hi,
                ..Default::default()
            })
        );
        let i18n = app.world().resource::<I18n>();
        assert_eq!(i18n.get_lang(), Language::Hi);
        assert_eq!(i18n.t("appName"), "कृषिमित्र");
    }

    #[test]
    fn filesystem_failure_falls_back_to_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new();
        app.add_plugins(
            I18nPlugin::with_config(I18nConfig {
                use_bundled_translations: false,
                messages_folder: dir.path().join("missing").to_string_lossy().to_string(),
                ..Default::default()
            })
        );
        assert_eq!(app.world().resource::<I18n>().t("appName"), "KrishiMitra");
    }

    #[test]
    fn app_extension_switches_languages() {
        let mut app = App::new();
        app.add_plugins(
            I18nPlugin::with_config(I18nConfig {
                use_bundled_translations: true,
                ..Default::default()
            })
        );
        app.set_lang_i18n("mr");
        app.set_lang_i18n("xx");
        app.set_fallback_lang("hi");

        let i18n = app.world().resource::<I18n>();
        assert_eq!(i18n.get_lang(), Language::Mr);
        assert_eq!(i18n.fallback_lang(), Language::Hi);
    }
}
