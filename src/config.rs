//! Configuration System
//!
//! Layered resolver for Galen settings. Every key is looked up in an override
//! source first (the process environment by default), then in the base
//! properties loaded from a flat `key=value` file, then falls back to the
//! caller's default. Typed accessors coerce and validate the resolved text.
//!
//! The loaded state is an immutable [`ConfigSnapshot`] behind an `Arc`. A load
//! builds the next snapshot off-lock and publishes it with one pointer swap,
//! so readers on other threads see either the old or the new state in full.
//! Loads themselves are serialized: the last `load`/`reset` to start is the
//! last one to publish.

use crate::error::{ConfigError, LoadError};
use crate::error_rate::ErrorRate;
use crate::values;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

pub mod keys;
pub mod merge;
pub mod sources;

pub use merge::PropertyOverlay;
pub use sources::{EnvOverrides, MapOverrides, OverrideSource};

/// Immutable view of one load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    properties: BTreeMap<String, String>,
    source: Option<PathBuf>,
    range_approximation: i32,
    reporting_listeners: Vec<String>,
    default_browser: String,
}

impl ConfigSnapshot {
    /// Compute derived fields for `properties` as seen through `overrides`.
    ///
    /// A derived field that cannot be coerced takes its default; the error is
    /// returned next to the snapshot.
    fn build(
        properties: BTreeMap<String, String>,
        source: Option<PathBuf>,
        overrides: &dyn OverrideSource,
    ) -> (Self, Option<ConfigError>) {
        let overlay = PropertyOverlay::new(overrides, &properties);

        let (range_approximation, derived_error) = match values::parse_int_for(
            keys::RANGE_APPROXIMATION,
            &overlay.resolve_or(
                keys::RANGE_APPROXIMATION,
                &keys::DEFAULT_RANGE_APPROXIMATION.to_string(),
            ),
        ) {
            Ok(value) => (value, None),
            Err(err) => (keys::DEFAULT_RANGE_APPROXIMATION, Some(err)),
        };
        let reporting_listeners =
            values::split_comma_list(&overlay.resolve_or(keys::REPORTING_LISTENERS, ""));
        let default_browser = overlay.resolve_or(keys::DEFAULT_BROWSER, keys::DEFAULT_BROWSER_NAME);

        let snapshot = Self {
            properties,
            source,
            range_approximation,
            reporting_listeners,
            default_browser,
        };
        (snapshot, derived_error)
    }

    /// Snapshot published when the very first load fails.
    fn fallback(overrides: &dyn OverrideSource) -> Self {
        Self::build(BTreeMap::new(), None, overrides).0
    }

    /// Base properties, without overrides applied.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// File the base properties were read from, if one was found.
    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn range_approximation(&self) -> i32 {
        self.range_approximation
    }

    pub fn reporting_listeners(&self) -> &[String] {
        &self.reporting_listeners
    }

    pub fn default_browser(&self) -> &str {
        &self.default_browser
    }
}

/// Result of a `load`/`reset` call.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Base properties were read from this file.
    Loaded(PathBuf),
    /// No regular file at this path; base properties are empty.
    FileAbsent(PathBuf),
    /// A new snapshot was published, but a derived setting could not be
    /// coerced and took its default. Base properties are in place.
    DerivedFallback { path: PathBuf, error: ConfigError },
    /// The load failed and the previous snapshot was kept.
    Failed(LoadError),
}

impl LoadOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, LoadOutcome::Failed(_))
    }

    /// The derived setting that fell back to its default, if any.
    pub fn derived_error(&self) -> Option<&ConfigError> {
        match self {
            LoadOutcome::DerivedFallback { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Every recognized setting, resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSettings {
    pub config_file: Option<PathBuf>,
    pub default_browser: String,
    pub range_approximation: i32,
    pub reporting_listeners: Vec<String>,
    pub log_level: i32,
    pub use_fail_exit_code: bool,
    pub screenshot_autoresize: bool,
    pub full_page_screenshots: Option<bool>,
    pub full_page_scroll_timeout: Option<i32>,
    pub full_page_scroll_wait: Option<i32>,
    pub global_visibility_check: bool,
    pub image_tolerance: i32,
    pub image_error_rate: ErrorRate,
    pub test_suffix: String,
    pub test_js_suffix: String,
}

/// Typed reads against one snapshot.
struct SettingsView<'a> {
    snapshot: &'a ConfigSnapshot,
    overlay: PropertyOverlay<'a>,
}

impl<'a> SettingsView<'a> {
    fn new(overrides: &'a dyn OverrideSource, snapshot: &'a ConfigSnapshot) -> Self {
        Self {
            snapshot,
            overlay: PropertyOverlay::new(overrides, &snapshot.properties),
        }
    }

    fn get_int_property(&self, key: &str, default: i32) -> Result<i32, ConfigError> {
        match self.overlay.resolve(key, None) {
            Some(value) => values::parse_int_for(key, &value),
            None => Ok(default),
        }
    }

    fn get_boolean_property(&self, key: &str, default: bool) -> bool {
        self.overlay
            .resolve(key, None)
            .map(|value| values::parse_bool_lenient(&value))
            .unwrap_or(default)
    }

    fn get_optional_non_negative(&self, key: &str) -> Result<Option<i32>, ConfigError> {
        self.overlay
            .resolve(key, None)
            .map(|value| {
                let parsed = values::parse_int_for(key, &value)?;
                values::check_range(key, parsed, 0, i32::MAX)
            })
            .transpose()
    }

    fn log_level(&self) -> i32 {
        let value = self
            .overlay
            .resolve_or(keys::LOG_LEVEL, &keys::DEFAULT_LOG_LEVEL.to_string());
        if values::is_numeric(&value) {
            values::parse_int(&value).unwrap_or(keys::DEFAULT_LOG_LEVEL)
        } else {
            keys::DEFAULT_LOG_LEVEL
        }
    }

    fn use_fail_exit_code(&self) -> bool {
        match self.overlay.resolve(keys::USE_FAIL_EXIT_CODE, None) {
            Some(value) if !value.trim().is_empty() => values::parse_bool_lenient(&value),
            _ => false,
        }
    }

    fn full_page_screenshots(&self) -> Option<bool> {
        self.overlay
            .resolve(keys::SCREENSHOT_FULLPAGE, None)
            .map(|value| values::parse_bool_lenient(&value))
    }

    fn image_spec_default_error_rate(&self) -> Result<ErrorRate, ConfigError> {
        let text = self
            .overlay
            .resolve_or(keys::SPEC_IMAGE_ERROR_RATE, keys::DEFAULT_IMAGE_ERROR_RATE);
        text.parse::<ErrorRate>()
            .map_err(|_| ConfigError::invalid(keys::SPEC_IMAGE_ERROR_RATE, &text))
    }

    fn settings(&self) -> Result<ResolvedSettings, ConfigError> {
        Ok(ResolvedSettings {
            config_file: self.snapshot.source.clone(),
            default_browser: self.snapshot.default_browser.clone(),
            range_approximation: self.snapshot.range_approximation,
            reporting_listeners: self.snapshot.reporting_listeners.clone(),
            log_level: self.log_level(),
            use_fail_exit_code: self.use_fail_exit_code(),
            screenshot_autoresize: self.get_boolean_property(keys::SCREENSHOT_AUTORESIZE, true),
            full_page_screenshots: self.full_page_screenshots(),
            full_page_scroll_timeout: self
                .get_optional_non_negative(keys::SCREENSHOT_FULLPAGE_SCROLLTIMEOUT)?,
            full_page_scroll_wait: self
                .get_optional_non_negative(keys::SCREENSHOT_FULLPAGE_SCROLLWAIT)?,
            global_visibility_check: self
                .get_boolean_property(keys::SPEC_GLOBAL_VISIBILITY_CHECK, true),
            image_tolerance: self
                .get_int_property(keys::SPEC_IMAGE_TOLERANCE, keys::DEFAULT_IMAGE_TOLERANCE)?,
            image_error_rate: self.image_spec_default_error_rate()?,
            test_suffix: self
                .overlay
                .resolve_or(keys::TEST_SUFFIX, keys::DEFAULT_TEST_SUFFIX),
            test_js_suffix: self
                .overlay
                .resolve_or(keys::TEST_JS_SUFFIX, keys::DEFAULT_TEST_JS_SUFFIX),
        })
    }
}

/// Galen configuration store.
///
/// Starts unloaded; the first read loads it. `reset` reloads on demand.
pub struct GalenConfig {
    overrides: Arc<dyn OverrideSource>,
    state: RwLock<Option<Arc<ConfigSnapshot>>>,
    /// Held from reading the file until the snapshot is published.
    /// Always taken before `state`.
    load_lock: Mutex<()>,
}

impl fmt::Debug for GalenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GalenConfig")
            .field("overrides", &self.overrides.name())
            .field("state", &*self.state.read())
            .finish()
    }
}

impl Default for GalenConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl GalenConfig {
    /// Create an unloaded store over the given override source.
    pub fn new(overrides: Arc<dyn OverrideSource>) -> Self {
        Self {
            overrides,
            state: RwLock::new(None),
            load_lock: Mutex::new(()),
        }
    }

    /// Store whose overrides come from the process environment.
    pub fn from_env() -> Self {
        Self::new(Arc::new(EnvOverrides))
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().is_some()
    }

    /// Path of the config file, as named by the override source.
    pub fn config_file_path(&self) -> PathBuf {
        PathBuf::from(
            self.overrides
                .lookup(keys::CONFIG_FILE)
                .unwrap_or_else(|| keys::DEFAULT_CONFIG_FILE.to_string()),
        )
    }

    /// Load the config file and publish a new snapshot.
    ///
    /// Failures never propagate: the previous snapshot stays in place (or an
    /// empty one is published on first load) and the error is returned inside
    /// the outcome. Concurrent calls run one at a time, so the snapshot left
    /// in place is the one read by the last call.
    pub fn load(&self) -> LoadOutcome {
        let _loading = self.load_lock.lock();
        let result = self.read_snapshot();
        let mut state = self.state.write();
        self.publish(&mut state, result)
    }

    /// Reload from scratch.
    pub fn reset(&self) -> LoadOutcome {
        self.load()
    }

    /// Current snapshot, loading first if needed.
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        if let Some(snapshot) = self.current() {
            return snapshot;
        }

        let _loading = self.load_lock.lock();
        // Another thread may have finished the first load while we waited
        if let Some(snapshot) = self.current() {
            return snapshot;
        }
        let result = self.read_snapshot();
        let mut state = self.state.write();
        self.publish(&mut state, result);
        match state.as_ref() {
            Some(snapshot) => Arc::clone(snapshot),
            None => Arc::new(ConfigSnapshot::fallback(self.overrides.as_ref())),
        }
    }

    fn current(&self) -> Option<Arc<ConfigSnapshot>> {
        self.state.read().as_ref().map(Arc::clone)
    }

    fn read_snapshot(&self) -> Result<(ConfigSnapshot, LoadOutcome), LoadError> {
        let path = self.config_file_path();

        let (properties, source) = if path.is_file() {
            let properties = sources::properties_file::load_file(&path)?;
            let source = dunce::canonicalize(&path).unwrap_or_else(|_| path.clone());
            (properties, Some(source))
        } else {
            (BTreeMap::new(), None)
        };

        let found = source.is_some();
        let (snapshot, derived_error) =
            ConfigSnapshot::build(properties, source, self.overrides.as_ref());
        let outcome = match derived_error {
            Some(error) => LoadOutcome::DerivedFallback { path, error },
            None if found => LoadOutcome::Loaded(path),
            None => LoadOutcome::FileAbsent(path),
        };
        Ok((snapshot, outcome))
    }

    fn publish(
        &self,
        state: &mut Option<Arc<ConfigSnapshot>>,
        result: Result<(ConfigSnapshot, LoadOutcome), LoadError>,
    ) -> LoadOutcome {
        match result {
            Ok((snapshot, outcome)) => {
                match &outcome {
                    LoadOutcome::Loaded(path) => debug!(
                        config_path = %path.display(),
                        keys = snapshot.properties.len(),
                        "Loaded Galen config file"
                    ),
                    LoadOutcome::FileAbsent(path) => debug!(
                        config_path = %path.display(),
                        "Galen config file not found, using overrides and defaults"
                    ),
                    LoadOutcome::DerivedFallback { path, error } => warn!(
                        config_path = %path.display(),
                        error = %error,
                        keys = snapshot.properties.len(),
                        "Invalid derived Galen setting, using its default"
                    ),
                    LoadOutcome::Failed(_) => {}
                }
                *state = Some(Arc::new(snapshot));
                outcome
            }
            Err(err) => {
                warn!(
                    error = %err,
                    overrides = self.overrides.name(),
                    "Failed to load Galen config, keeping previous settings"
                );
                if state.is_none() {
                    *state = Some(Arc::new(ConfigSnapshot::fallback(self.overrides.as_ref())));
                }
                LoadOutcome::Failed(err)
            }
        }
    }

    fn with_view<R>(&self, f: impl FnOnce(&SettingsView<'_>) -> R) -> R {
        let snapshot = self.snapshot();
        let view = SettingsView::new(self.overrides.as_ref(), &snapshot);
        f(&view)
    }

    /// Resolved value, or `None` when no source defines `key`.
    pub fn read_property(&self, key: &str) -> Option<String> {
        self.with_view(|view| view.overlay.resolve(key, None))
    }

    pub fn read_property_or(&self, key: &str, default: &str) -> String {
        self.with_view(|view| view.overlay.resolve_or(key, default))
    }

    /// Resolved value; fails when `key` is missing or blank.
    pub fn read_mandatory_property(&self, key: &str) -> Result<String, ConfigError> {
        self.with_view(|view| view.overlay.resolve_mandatory(key))
    }

    /// Integer value, or `default` when `key` is unset.
    ///
    /// A value that is set but not an integer is an error; the default never
    /// stands in for it.
    pub fn get_int_property(&self, key: &str, default: i32) -> Result<i32, ConfigError> {
        self.with_view(|view| view.get_int_property(key, default))
    }

    /// As [`get_int_property`](Self::get_int_property), limited to `[min, max]`.
    pub fn get_int_property_in_range(
        &self,
        key: &str,
        default: i32,
        min: i32,
        max: i32,
    ) -> Result<i32, ConfigError> {
        let value = self.get_int_property(key, default)?;
        values::check_range(key, value, min, max)
    }

    /// Lenient boolean: never fails.
    pub fn get_boolean_property(&self, key: &str, default: bool) -> bool {
        self.with_view(|view| view.get_boolean_property(key, default))
    }

    pub fn range_approximation(&self) -> i32 {
        self.snapshot().range_approximation
    }

    pub fn reporting_listeners(&self) -> Vec<String> {
        self.snapshot().reporting_listeners.clone()
    }

    pub fn default_browser(&self) -> String {
        self.snapshot().default_browser.clone()
    }

    /// Log level; anything but plain digits falls back to 10.
    pub fn log_level(&self) -> i32 {
        self.with_view(|view| view.log_level())
    }

    pub fn use_fail_exit_code(&self) -> bool {
        self.with_view(|view| view.use_fail_exit_code())
    }

    pub fn should_autoresize_screenshots(&self) -> bool {
        self.get_boolean_property(keys::SCREENSHOT_AUTORESIZE, true)
    }

    pub fn should_check_visibility_globally(&self) -> bool {
        self.get_boolean_property(keys::SPEC_GLOBAL_VISIBILITY_CHECK, true)
    }

    /// Full-page screenshot mode, if configured.
    pub fn full_page_screenshots(&self) -> Option<bool> {
        self.with_view(|view| view.full_page_screenshots())
    }

    /// Smart scroll wait timeout; `Some(0)` turns the smart wait off.
    pub fn full_page_scroll_timeout(&self) -> Result<Option<i32>, ConfigError> {
        self.with_view(|view| {
            view.get_optional_non_negative(keys::SCREENSHOT_FULLPAGE_SCROLLTIMEOUT)
        })
    }

    /// Hard wait during scroll.
    pub fn full_page_scroll_wait(&self) -> Result<Option<i32>, ConfigError> {
        self.with_view(|view| {
            view.get_optional_non_negative(keys::SCREENSHOT_FULLPAGE_SCROLLWAIT)
        })
    }

    pub fn image_spec_default_tolerance(&self) -> Result<i32, ConfigError> {
        self.get_int_property(keys::SPEC_IMAGE_TOLERANCE, keys::DEFAULT_IMAGE_TOLERANCE)
    }

    pub fn image_spec_default_error_rate(&self) -> Result<ErrorRate, ConfigError> {
        self.with_view(|view| view.image_spec_default_error_rate())
    }

    pub fn test_js_suffix(&self) -> String {
        self.read_property_or(keys::TEST_JS_SUFFIX, keys::DEFAULT_TEST_JS_SUFFIX)
    }

    pub fn test_suffix(&self) -> String {
        self.read_property_or(keys::TEST_SUFFIX, keys::DEFAULT_TEST_SUFFIX)
    }

    /// Write into the in-memory base properties. Nothing is persisted, and
    /// derived fields keep their load-time values until the next reset.
    pub fn set_property(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        self.snapshot();
        let mut state = self.state.write();
        if let Some(snapshot) = state.as_mut() {
            Arc::make_mut(snapshot).properties.insert(key, value);
        }
    }

    /// Resolve every recognized setting at once, against a single snapshot.
    pub fn settings(&self) -> Result<ResolvedSettings, ConfigError> {
        self.with_view(|view| view.settings())
    }
}
