//! Localized player messages
//!
//! Templates use positional `{0}`, `{1}` placeholders. Lookups fall back to
//! the default language, then to the message key itself.

use hashbrown::HashMap;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Message keys
pub struct Lang;

impl Lang {
    pub const GEAR_ROTATED: &'static str = "GearRotated";
}

fn default_messages() -> HashMap<String, String> {
    HashMap::from([(
        Lang::GEAR_ROTATED.to_string(),
        "New gear rotation! You have been switched to <color=#CACF52>{0}</color>.".to_string(),
    )])
}

#[derive(Debug, Clone, Default)]
pub struct LangCatalog {
    languages: HashMap<String, HashMap<String, String>>,
}

impl LangCatalog {
    /// Catalog preloaded with the default English messages
    pub fn with_defaults() -> Self {
        let mut catalog = Self::default();
        catalog.register_messages(DEFAULT_LANGUAGE, default_messages());
        catalog
    }

    /// Add or override messages for a language.
    pub fn register_messages(&mut self, language: &str, messages: HashMap<String, String>) {
        self.languages
            .entry(language.to_string())
            .or_default()
            .extend(messages);
    }

    /// Raw template for `key` in `language`.
    pub fn get_message<'a>(&'a self, key: &'a str, language: Option<&str>) -> &'a str {
        language
            .and_then(|lang| self.lookup(lang, key))
            .or_else(|| self.lookup(DEFAULT_LANGUAGE, key))
            .unwrap_or(key)
    }

    /// Template for `key` in `language` with placeholders filled from `args`.
    pub fn format(&self, key: &str, language: Option<&str>, args: &[&str]) -> String {
        fill_placeholders(self.get_message(key, language), args)
    }

    fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        self.languages
            .get(language)
            .and_then(|messages| messages.get(key))
            .map(String::as_str)
    }
}

/// Replace `{n}` with `args[n]`. Placeholders without an argument are left as is.
fn fill_placeholders(template: &str, args: &[&str]) -> String {
    let mut out = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{i}}}"), arg);
    }
    out
}
