use bevy::prelude::*;

use crate::{ I18n, I18nConfig, Language };

/// Binds an entity's [`Text`] to a translation key.
///
/// The text is rewritten when the component changes and whenever the
/// active language does.
///
/// ```rust
/// use bevy::prelude::*;
/// use krishi_intl::LocalizedText;
///
/// fn spawn_toast(mut commands: Commands) {
///     commands.spawn((
///         Text::new(""),
///         LocalizedText::new("market.priceUpdated")
///             .with_arg("crop", "Wheat")
///             .with_arg("apmc", "Pune")
///             .with_arg("price", 2150),
///     ));
/// }
/// ```
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct LocalizedText {
    key: String,
    args: Vec<(String, String)>,
}

impl LocalizedText {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), args: Vec::new() }
    }

    /// Adds a value for a `{{name}}` placeholder.
    pub fn with_arg(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.args.push((name.into(), value.to_string()));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
        self.args.clear();
    }

    pub(crate) fn render(&self, i18n: &I18n) -> String {
        let args: Vec<(&str, &dyn ToString)> = self.args
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToString))
            .collect();
        i18n.t_with_args(&self.key, &args)
    }
}

/// Request to switch the active language, sent by language switchers.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeLanguage(pub Language);

/// Written once per actual switch of the active language.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageChanged {
    pub previous: Language,
    pub current: Language,
}

pub(crate) fn apply_language_requests(
    mut requests: MessageReader<ChangeLanguage>,
    mut i18n: ResMut<I18n>
) {
    for ChangeLanguage(lang) in requests.read() {
        // reading through Deref keeps change detection quiet for no-op requests
        if i18n.get_lang() != *lang {
            i18n.set_lang(*lang);
        }
    }
}

pub(crate) fn announce_language_change(
    i18n: Res<I18n>,
    config: Res<I18nConfig>,
    mut last: Local<Option<Language>>,
    mut changed: MessageWriter<LanguageChanged>
) {
    let current = i18n.get_lang();
    // before the first frame the startup language is the reference
    let previous = last.unwrap_or(config.default_lang);
    if previous != current {
        info!("Language switched from '{}' to '{}'", previous, current);
        changed.write(LanguageChanged { previous, current });
    }
    *last = Some(current);
}

pub(crate) fn refresh_localized_text(
    i18n: Res<I18n>,
    mut query: Query<(Ref<LocalizedText>, &mut Text)>
) {
    let language_changed = i18n.is_changed();
    for (localized, mut text) in &mut query {
        if !language_changed && !localized.is_changed() {
            continue;
        }
        let resolved = localized.render(&i18n);
        if text.0 != resolved {
            text.0 = resolved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::message::Messages;
    use crate::{ I18nPlugin, LanguageAppExt };

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(
            I18nPlugin::with_config(I18nConfig {
                use_bundled_translations: true,
                ..Default::default()
            })
        );
        app
    }

    fn text_of(app: &App, entity: Entity) -> String {
        app.world().get::<Text>(entity).unwrap().0.clone()
    }

    fn changes(app: &App) -> Vec<LanguageChanged> {
        let messages = app.world().resource::<Messages<LanguageChanged>>();
        messages.iter_current_update_messages().copied().collect()
    }

    #[test]
    fn fills_text_on_spawn() {
        let mut app = app();
        let entity = app.world_mut().spawn((Text::new(""), LocalizedText::new("dashboard"))).id();
        app.update();
        assert_eq!(text_of(&app, entity), "Dashboard");
    }

    #[test]
    fn rerenders_when_language_changes() {
        let mut app = app();
        let title = app.world_mut()
            .spawn((Text::new(""), LocalizedText::new("crops.fillRequiredFields")))
            .id();
        let nav = app.world_mut().spawn((Text::new(""), LocalizedText::new("crops"))).id();
        app.update();
        let english = text_of(&app, title);

        app.world_mut().write_message(ChangeLanguage(Language::Hi));
        app.update();

        let hindi = text_of(&app, title);
        assert_ne!(hindi, english);
        assert_eq!(hindi, app.world().resource::<I18n>().t("crops.fillRequiredFields"));
        assert_eq!(text_of(&app, nav), "फसलें");
        assert_eq!(changes(&app), vec![LanguageChanged {
            previous: Language::En,
            current: Language::Hi,
        }]);
    }

    #[test]
    fn same_language_request_is_a_no_op() {
        let mut app = app();
        app.update();

        app.world_mut().write_message(ChangeLanguage(Language::En));
        app.update();

        assert!(changes(&app).is_empty());
        assert_eq!(app.world().resource::<I18n>().get_lang(), Language::En);
    }

    #[test]
    fn switch_before_first_frame_is_announced() {
        let mut app = app();
        app.world_mut().write_message(ChangeLanguage(Language::Mr));
        app.update();

        assert_eq!(app.world().resource::<I18n>().get_lang(), Language::Mr);
        assert_eq!(changes(&app), vec![LanguageChanged {
            previous: Language::En,
            current: Language::Mr,
        }]);
    }

    #[test]
    fn app_extension_switch_before_first_frame_is_announced() {
        let mut app = app();
        app.set_lang_i18n("hi");
        app.update();

        assert_eq!(changes(&app), vec![LanguageChanged {
            previous: Language::En,
            current: Language::Hi,
        }]);
    }

    #[test]
    fn first_frame_without_switch_is_quiet() {
        let mut app = app();
        app.update();
        assert!(changes(&app).is_empty());
    }

    #[test]
    fn rerenders_when_key_changes() {
        let mut app = app();
        let entity = app.world_mut().spawn((Text::new(""), LocalizedText::new("dashboard"))).id();
        app.update();

        app.world_mut().get_mut::<LocalizedText>(entity).unwrap().set_key("market.title");
        app.update();
        assert_eq!(text_of(&app, entity), "Market Prices");
    }

    #[test]
    fn substitutes_arguments() {
        let mut app = app();
        let entity = app.world_mut()
            .spawn((
                Text::new(""),
                LocalizedText::new("marketplace.messageSent").with_arg("seller", "Ramesh Patil"),
            ))
            .id();
        app.update();
        assert_eq!(text_of(&app, entity), "Message sent to Ramesh Patil");
    }

    #[test]
    fn missing_keys_render_as_key_path() {
        let mut app = app();
        let entity = app.world_mut()
            .spawn((Text::new(""), LocalizedText::new("nonexistent.path")))
            .id();
        app.world_mut().write_message(ChangeLanguage(Language::Mr));
        app.update();
        assert_eq!(text_of(&app, entity), "nonexistent.path");
    }
}
