// i18n.rs — UI strings
//
// Built-in English strings, optionally overridden per language by
// assets/i18n/<lang>.json (flat { "key": "text" } map), searched next to the
// executable first and then in the working directory.
//
// Lookup: tr("key") / tr_with("key", &[("name", ...)]) with {name} placeholders.

use once_cell::sync::OnceCell;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

const BUILTIN: &[(&str, &str)] = &[
    ("app.title", "Photosphere XR"),
    ("session.enter", "Enter VR"),
    ("session.exit", "Exit VR"),
    ("session.unsupported", "Immersive sessions are not available on this display"),
    ("status.idle", "No session"),
    ("status.active", "Session {id}"),
    ("status.loading", "Loading image..."),
    ("status.orientation", "Lat: {lat}° | Lon: {lon}°"),
    ("status.device_pose", "Device pose"),
    ("menu.open_image", "Open panorama (O)"),
    ("file.filter.images", "Images"),
];

#[derive(Debug, Clone)]
pub struct Catalog {
    pub lang: String,
    overrides: HashMap<String, String>,
}

impl Catalog {
    pub fn new(lang: impl Into<String>, overrides: HashMap<String, String>) -> Self {
        Self {
            lang: lang.into(),
            overrides,
        }
    }

    pub fn get(&self, key: &str) -> String {
        if let Some(v) = self.overrides.get(key) {
            return v.clone();
        }
        BUILTIN
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .unwrap_or_else(|| key.to_string())
    }
}

static CATALOG: OnceCell<RwLock<Catalog>> = OnceCell::new();

fn find_lang_file(lang: &str) -> Option<PathBuf> {
    let rel = Path::new("assets").join("i18n").join(format!("{lang}.json"));

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&rel)));

    beside_exe.into_iter().chain([rel]).find(|p| p.exists())
}

fn load_overrides(lang: &str) -> HashMap<String, String> {
    let Some(path) = find_lang_file(lang) else {
        if lang != "en" {
            log::warn!("no translation file for '{lang}', using English");
        }
        return HashMap::new();
    };

    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| {
            serde_json::from_str::<HashMap<String, String>>(&text).map_err(|e| e.to_string())
        });

    match parsed {
        Ok(map) => {
            log::info!("loaded {} strings from {}", map.len(), path.display());
            map
        }
        Err(e) => {
            log::warn!("ignoring {}: {e}", path.display());
            HashMap::new()
        }
    }
}

/// Installs the catalog for `lang`. Later calls replace the current one.
pub fn init(lang: &str) {
    let catalog = Catalog::new(lang, load_overrides(lang));
    log::debug!("ui language: {}", catalog.lang);

    if let Some(lock) = CATALOG.get() {
        if let Ok(mut w) = lock.write() {
            *w = catalog;
        }
    } else {
        let _ = CATALOG.set(RwLock::new(catalog));
    }
}

/// Localized text for `key`; unknown keys come back unchanged.
pub fn tr(key: &str) -> String {
    match CATALOG.get().and_then(|l| l.read().ok()) {
        Some(catalog) => catalog.get(key),
        None => Catalog::new("en", HashMap::new()).get(key),
    }
}

pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    substitute(tr(key), args)
}

fn substitute(mut s: String, args: &[(&str, String)]) -> String {
    for (k, v) in args {
        s = s.replace(&format!("{{{k}}}"), v);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_and_missing_key() {
        let catalog = Catalog::new("en", HashMap::new());
        assert_eq!(catalog.get("session.enter"), "Enter VR");
        assert_eq!(catalog.get("no.such.key"), "no.such.key");
    }

    #[test]
    fn test_overrides_win() {
        let mut map = HashMap::new();
        map.insert("session.enter".to_string(), "Entrer en VR".to_string());
        let catalog = Catalog::new("fr", map);
        assert_eq!(catalog.get("session.enter"), "Entrer en VR");
        assert_eq!(catalog.get("session.exit"), "Exit VR");
    }

    #[test]
    fn test_substitute_placeholders() {
        let s = substitute(
            "Lat: {lat}° | Lon: {lon}° | {other}".to_string(),
            &[("lat", "1.0".to_string()), ("lon", "-2.5".to_string())],
        );
        assert_eq!(s, "Lat: 1.0° | Lon: -2.5° | {other}");
    }

    #[test]
    fn test_tr_with_before_init_uses_builtin() {
        let s = tr_with("status.active", &[("id", "3".to_string())]);
        assert_eq!(s, "Session 3");
    }
}
