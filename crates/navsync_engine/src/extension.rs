//! Browser extension bundle: manifest, background script and side panel,
//! parameterized by API base, secret, title and browser variant.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use navsync_logging::{nav_info, nav_warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::persist::{AtomicFileWriter, PersistError};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const BACKGROUND_FILE: &str = "background.js";
pub const SIDEBAR_HTML_FILE: &str = "sidebar.html";
pub const SIDEBAR_JS_FILE: &str = "sidebar.js";
pub const ICON_FILE: &str = "icon.png";
pub const ICON_MISSING_FILE: &str = "icon_missing.txt";

const CONFIG_PLACEHOLDER: &str = "__NAVSYNC_CONFIG__";
const TITLE_PLACEHOLDER: &str = "__NAVSYNC_TITLE__";
const GECKO_ID: &str = "navsync@example.com";
const SHORTCUT: &str = "Ctrl+Shift+E";
const SHORTCUT_MAC: &str = "Command+Shift+E";

const BACKGROUND_TEMPLATE: &str = include_str!("templates/background.js");
const SIDEBAR_HTML_TEMPLATE: &str = include_str!("templates/sidebar.html");
const SIDEBAR_JS_TEMPLATE: &str = include_str!("templates/sidebar.js");

#[derive(Debug, Error)]
pub enum BundleError {
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserVariant {
    #[default]
    Chrome,
    Firefox,
}

impl fmt::Display for BrowserVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserVariant::Chrome => write!(f, "chrome"),
            BrowserVariant::Firefox => write!(f, "firefox"),
        }
    }
}

impl FromStr for BrowserVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chrome" => Ok(BrowserVariant::Chrome),
            "firefox" => Ok(BrowserVariant::Firefox),
            other => Err(format!("unknown browser variant: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtensionSettings {
    pub api_base: String,
    pub secret: String,
    pub title: String,
    pub variant: BrowserVariant,
    /// PNG bytes for the toolbar icon, if one could be produced.
    pub icon_png: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleFile {
    pub name: &'static str,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionBundle {
    pub files: Vec<BundleFile>,
}

impl ExtensionBundle {
    pub fn file(&self, name: &str) -> Option<&BundleFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.file(name)
            .and_then(|f| std::str::from_utf8(&f.contents).ok())
    }

    /// Writes every file into `dir`, each one atomically.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, BundleError> {
        let writer = AtomicFileWriter::new(dir.to_path_buf());
        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            written.push(writer.write(file.name, &file.contents)?);
        }
        nav_info!("Wrote {} extension files to {:?}", written.len(), dir);
        Ok(written)
    }
}

pub fn manifest_json(settings: &ExtensionSettings) -> serde_json::Value {
    let mut manifest = json!({
        "manifest_version": 3,
        "name": display_title(settings),
        "version": env!("CARGO_PKG_VERSION"),
        "minimum_chrome_version": "116",
        "description": "Side panel navigation with one-click saving from the context menu",
        "permissions": [
            "activeTab", "scripting", "sidePanel", "storage", "favicon", "contextMenus",
            "notifications"
        ],
        "background": { "service_worker": BACKGROUND_FILE },
        "action": { "default_title": format!("Toggle side panel ({SHORTCUT})") },
        "side_panel": { "default_path": SIDEBAR_HTML_FILE },
        "icons": { "128": ICON_FILE },
        "commands": {
            "_execute_action": {
                "suggested_key": { "default": SHORTCUT, "mac": SHORTCUT_MAC },
                "description": "Open or close the side panel"
            }
        }
    });

    if settings.variant == BrowserVariant::Firefox {
        manifest["browser_specific_settings"] = json!({
            "gecko": { "id": GECKO_ID, "strict_min_version": "109.0" }
        });
    }
    manifest
}

pub fn build_bundle(settings: &ExtensionSettings) -> Result<ExtensionBundle, BundleError> {
    let config = serde_json::to_string(&json!({
        "apiBase": settings.api_base.trim_end_matches('/'),
        "password": settings.secret,
    }))?;
    let title = display_title(settings);

    let mut files = vec![
        BundleFile {
            name: MANIFEST_FILE,
            contents: serde_json::to_vec_pretty(&manifest_json(settings))?,
        },
        BundleFile {
            name: BACKGROUND_FILE,
            contents: BACKGROUND_TEMPLATE
                .replace(CONFIG_PLACEHOLDER, &config)
                .into_bytes(),
        },
        BundleFile {
            name: SIDEBAR_HTML_FILE,
            contents: SIDEBAR_HTML_TEMPLATE
                .replace(TITLE_PLACEHOLDER, &escape_html(&title))
                .into_bytes(),
        },
        BundleFile {
            name: SIDEBAR_JS_FILE,
            contents: SIDEBAR_JS_TEMPLATE
                .replace(CONFIG_PLACEHOLDER, &config)
                .into_bytes(),
        },
    ];

    match &settings.icon_png {
        Some(icon) => files.push(BundleFile {
            name: ICON_FILE,
            contents: icon.clone(),
        }),
        None => {
            nav_warn!("No icon available for the extension bundle");
            files.push(BundleFile {
                name: ICON_MISSING_FILE,
                contents: b"No icon could be generated. Save a 128x128 icon.png next to manifest.json."
                    .to_vec(),
            });
        }
    }

    Ok(ExtensionBundle { files })
}

fn display_title(settings: &ExtensionSettings) -> String {
    let title = settings.title.trim();
    if title.is_empty() {
        "Navsync".to_string()
    } else {
        title.to_string()
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("Firefox".parse::<BrowserVariant>(), Ok(BrowserVariant::Firefox));
        assert_eq!(" chrome ".parse::<BrowserVariant>(), Ok(BrowserVariant::Chrome));
        assert!("safari".parse::<BrowserVariant>().is_err());
    }

    #[test]
    fn title_is_html_escaped() {
        assert_eq!(escape_html("A & <B>"), "A &amp; &lt;B&gt;");
    }
}
