use navsync_engine::{
    build_bundle, manifest_json, BrowserVariant, ExtensionSettings, BACKGROUND_FILE, ICON_FILE,
    ICON_MISSING_FILE, MANIFEST_FILE, SIDEBAR_HTML_FILE, SIDEBAR_JS_FILE,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn settings(variant: BrowserVariant) -> ExtensionSettings {
    ExtensionSettings {
        api_base: "https://nav.example.com/".to_string(),
        secret: "pa\"ss".to_string(),
        title: "My <Links>".to_string(),
        variant,
        icon_png: None,
    }
}

#[test]
fn chrome_manifest_has_no_gecko_settings() {
    let manifest = manifest_json(&settings(BrowserVariant::Chrome));
    assert_eq!(manifest["manifest_version"], 3);
    assert_eq!(manifest["side_panel"]["default_path"], SIDEBAR_HTML_FILE);
    assert_eq!(
        manifest["commands"]["_execute_action"]["suggested_key"]["default"],
        "Ctrl+Shift+E"
    );
    assert!(manifest.get("browser_specific_settings").is_none());
}

#[test]
fn firefox_manifest_declares_gecko_id() {
    let manifest = manifest_json(&settings(BrowserVariant::Firefox));
    assert_eq!(
        manifest["browser_specific_settings"]["gecko"]["strict_min_version"],
        "109.0"
    );
}

#[test]
fn scripts_embed_escaped_configuration() {
    let bundle = build_bundle(&settings(BrowserVariant::Chrome)).unwrap();

    let background = bundle.text(BACKGROUND_FILE).unwrap();
    assert!(background.contains(r#""apiBase":"https://nav.example.com""#));
    assert!(background.contains(r#""password":"pa\"ss""#));
    assert!(!background.contains("__NAVSYNC_"));

    let sidebar_js = bundle.text(SIDEBAR_JS_FILE).unwrap();
    assert!(sidebar_js.contains("navsync_data"));
    assert!(!sidebar_js.contains("__NAVSYNC_"));

    let sidebar_html = bundle.text(SIDEBAR_HTML_FILE).unwrap();
    assert!(sidebar_html.contains("My &lt;Links&gt;"));
}

#[test]
fn missing_icon_is_replaced_by_a_note() {
    let bundle = build_bundle(&settings(BrowserVariant::Chrome)).unwrap();
    assert!(bundle.file(ICON_FILE).is_none());
    assert!(bundle.file(ICON_MISSING_FILE).is_some());

    let with_icon = build_bundle(&ExtensionSettings {
        icon_png: Some(vec![0x89, b'P', b'N', b'G']),
        ..settings(BrowserVariant::Chrome)
    })
    .unwrap();
    assert_eq!(with_icon.file(ICON_FILE).unwrap().contents, vec![0x89, b'P', b'N', b'G']);
    assert!(with_icon.file(ICON_MISSING_FILE).is_none());
}

#[test]
fn bundle_is_written_to_a_directory() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("extension");
    let bundle = build_bundle(&settings(BrowserVariant::Firefox)).unwrap();

    let written = bundle.write_to(&out).unwrap();

    assert_eq!(written.len(), 5);
    for name in [MANIFEST_FILE, BACKGROUND_FILE, SIDEBAR_HTML_FILE, SIDEBAR_JS_FILE, ICON_MISSING_FILE] {
        assert!(out.join(name).is_file(), "{name} missing");
    }
    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join(MANIFEST_FILE)).unwrap()).unwrap();
    assert_eq!(manifest["name"], "My <Links>");
}
