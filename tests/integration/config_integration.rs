//! Integration tests for Configuration System

use galen_config::config::keys;
use galen_config::{ConfigError, ErrorRate, LoadOutcome};

use crate::integration::ConfigFixture;

#[test]
fn test_default_browser_from_override_without_file() {
    let fixture = ConfigFixture::without_file();
    fixture.overrides.set(keys::DEFAULT_BROWSER, "chrome");

    assert!(matches!(fixture.config.load(), LoadOutcome::FileAbsent(_)));
    assert_eq!(fixture.config.default_browser(), "chrome");
}

#[test]
fn test_image_tolerance_from_file() {
    let fixture = ConfigFixture::with_file("galen.spec.image.tolerance=40\n");
    assert_eq!(fixture.config.image_spec_default_tolerance(), Ok(40));
}

#[test]
fn test_invalid_log_level_in_file_falls_back() {
    let fixture = ConfigFixture::with_file("galen.log.level=abc\n");
    assert_eq!(fixture.config.log_level(), 10);
}

#[test]
fn test_read_property_default_when_unset() {
    let fixture = ConfigFixture::with_file("other=1\n");
    assert_eq!(
        fixture.config.read_property_or("galen.unknown", "fallback"),
        "fallback"
    );
    assert_eq!(fixture.config.read_property("galen.unknown"), None);
}

#[test]
fn test_override_beats_file_for_every_reader() {
    let fixture = ConfigFixture::with_file(
        "galen.spec.image.tolerance=40\n\
         galen.screenshot.autoresize=true\n\
         galen.test.js.file.suffix=.file.js\n",
    );
    fixture.overrides.set(keys::SPEC_IMAGE_TOLERANCE, "12");
    fixture.overrides.set(keys::SCREENSHOT_AUTORESIZE, "false");
    fixture.overrides.set(keys::TEST_JS_SUFFIX, ".spec.js");

    assert_eq!(fixture.config.image_spec_default_tolerance(), Ok(12));
    assert!(!fixture.config.should_autoresize_screenshots());
    assert_eq!(fixture.config.test_js_suffix(), ".spec.js");
}

#[test]
fn test_mandatory_property() {
    let fixture = ConfigFixture::with_file("present=value\nblank=   \n");
    fixture.overrides.set("override.blank", "");

    assert_eq!(
        fixture.config.read_mandatory_property("present"),
        Ok("value".to_string())
    );
    for key in ["blank", "override.blank", "absent"] {
        let err = fixture.config.read_mandatory_property(key).unwrap_err();
        assert_eq!(err.key(), key);
        assert_eq!(err.to_string(), format!("Missing property: {}", key));
    }
}

#[test]
fn test_reset_reflects_only_new_state() {
    let fixture = ConfigFixture::with_file(
        "galen.default.browser=safari\n\
         galen.reporting.listeners=a,b\n\
         galen.range.approximation=4\n\
         old.key=1\n",
    );
    assert_eq!(fixture.config.default_browser(), "safari");
    assert_eq!(fixture.config.reporting_listeners(), vec!["a", "b"]);

    fixture.write_file("galen.reporting.listeners= x ,, y\nnew.key=2\n");
    fixture.overrides.set(keys::DEFAULT_BROWSER, "edge");
    assert!(matches!(fixture.config.reset(), LoadOutcome::Loaded(_)));

    assert_eq!(fixture.config.default_browser(), "edge");
    assert_eq!(fixture.config.reporting_listeners(), vec!["x", "y"]);
    assert_eq!(fixture.config.range_approximation(), 2);
    assert_eq!(fixture.config.read_property("old.key"), None);
    assert_eq!(fixture.config.read_property("new.key"), Some("2".to_string()));
}

#[test]
fn test_reset_after_file_removed_clears_base_properties() {
    let fixture = ConfigFixture::with_file("k=v\n");
    assert_eq!(fixture.config.read_property("k"), Some("v".to_string()));

    fixture.remove_file();
    assert!(matches!(fixture.config.reset(), LoadOutcome::FileAbsent(_)));
    assert_eq!(fixture.config.read_property("k"), None);
}

#[test]
fn test_unreadable_content_keeps_previous_state() {
    let fixture = ConfigFixture::with_file("galen.spec.image.tolerance=30\n");
    assert_eq!(fixture.config.image_spec_default_tolerance(), Ok(30));

    fixture.write_file("galen.spec.image.tolerance=50\nbroken=\\u00\n");
    assert!(fixture.config.reset().is_failed());
    assert_eq!(fixture.config.image_spec_default_tolerance(), Ok(30));
}

#[test]
fn test_strict_accessor_errors_surface() {
    let fixture = ConfigFixture::with_file(
        "galen.spec.image.tolerance=high\n\
         galen.spec.image.error=5 pixels\n",
    );

    assert!(matches!(
        fixture.config.image_spec_default_tolerance(),
        Err(ConfigError::InvalidConfiguration { .. })
    ));
    assert!(matches!(
        fixture.config.image_spec_default_error_rate(),
        Err(ConfigError::InvalidConfiguration { .. })
    ));
    assert!(fixture.config.settings().is_err());
}

#[test]
fn test_full_page_settings() {
    let fixture = ConfigFixture::with_file(
        "galen.browser.screenshots.fullPage=true\n\
         galen.browser.screenshots.fullPage.scrollTimeout=0\n\
         galen.browser.screenshots.fullPage.scrollWait=250\n",
    );
    assert_eq!(fixture.config.full_page_screenshots(), Some(true));
    assert_eq!(fixture.config.full_page_scroll_timeout(), Ok(Some(0)));
    assert_eq!(fixture.config.full_page_scroll_wait(), Ok(Some(250)));
}

#[test]
fn test_settings_serialize_for_reporting() {
    let fixture = ConfigFixture::with_file(
        "galen.reporting.listeners=html, json\n\
         galen.spec.image.error=2.5%\n",
    );
    let settings = fixture.config.settings().unwrap();
    assert_eq!(settings.image_error_rate, ErrorRate::Percent(2.5));

    let json = serde_json::to_value(&settings).unwrap();
    assert_eq!(json["reporting_listeners"], serde_json::json!(["html", "json"]));
    assert_eq!(json["default_browser"], "firefox");
    assert_eq!(json["image_error_rate"]["type"], "percent");
    assert_eq!(json["image_error_rate"]["value"], 2.5);
    assert_eq!(json["full_page_scroll_wait"], serde_json::Value::Null);
}
