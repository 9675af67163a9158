//! Recognized property keys.

pub const SCREENSHOT_AUTORESIZE: &str = "galen.screenshot.autoresize";
pub const SCREENSHOT_FULLPAGE: &str = "galen.browser.screenshots.fullPage";
/// Smart wait for the scroll position, bounded by this timeout. Zero turns it off.
pub const SCREENSHOT_FULLPAGE_SCROLLTIMEOUT: &str = "galen.browser.screenshots.fullPage.scrollTimeout";
/// Hard wait during scroll.
pub const SCREENSHOT_FULLPAGE_SCROLLWAIT: &str = "galen.browser.screenshots.fullPage.scrollWait";
pub const SPEC_IMAGE_TOLERANCE: &str = "galen.spec.image.tolerance";
pub const SPEC_IMAGE_ERROR_RATE: &str = "galen.spec.image.error";
pub const SPEC_GLOBAL_VISIBILITY_CHECK: &str = "galen.spec.global.visibility";
pub const TEST_JS_SUFFIX: &str = "galen.test.js.file.suffix";
pub const TEST_SUFFIX: &str = "galen.test.file.suffix";
pub const CONFIG_FILE: &str = "galen.config.file";
pub const RANGE_APPROXIMATION: &str = "galen.range.approximation";
pub const REPORTING_LISTENERS: &str = "galen.reporting.listeners";
pub const DEFAULT_BROWSER: &str = "galen.default.browser";
pub const LOG_LEVEL: &str = "galen.log.level";
pub const USE_FAIL_EXIT_CODE: &str = "galen.use.fail.exit.code";

pub(crate) const DEFAULT_CONFIG_FILE: &str = "config";
pub(crate) const DEFAULT_RANGE_APPROXIMATION: i32 = 2;
pub(crate) const DEFAULT_BROWSER_NAME: &str = "firefox";
pub(crate) const DEFAULT_LOG_LEVEL: i32 = 10;
pub(crate) const DEFAULT_IMAGE_TOLERANCE: i32 = 25;
pub(crate) const DEFAULT_IMAGE_ERROR_RATE: &str = "0px";
pub(crate) const DEFAULT_TEST_JS_SUFFIX: &str = ".test.js";
pub(crate) const DEFAULT_TEST_SUFFIX: &str = ".test";
