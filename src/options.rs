//! Formatting toggles and their file-backed store.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Result, RosterError};

/// Directory under the user config dir holding saved options.
const CONFIG_DIR_NAME: &str = "roster-cleaner";
const OPTIONS_FILE_NAME: &str = "options.json";

/// Independent rendering toggles. Missing keys take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormattingOptions {
    pub show_points: bool,
    pub smart_format: bool,
    pub show_models: bool,
    pub consolidate_duplicates: bool,
    /// Forces `inline_enhancements` on.
    pub one_liner: bool,
    pub inline_enhancements: bool,
    pub show_header: bool,
    pub no_empty_lines: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        FormattingOptions {
            show_points: true,
            smart_format: true,
            show_models: false,
            consolidate_duplicates: false,
            one_liner: false,
            inline_enhancements: false,
            show_header: true,
            no_empty_lines: false,
        }
    }
}

impl FormattingOptions {
    fn toggles_mut(&mut self) -> [(&'static str, &mut bool); 8] {
        [
            ("showPoints", &mut self.show_points),
            ("smartFormat", &mut self.smart_format),
            ("showModels", &mut self.show_models),
            ("consolidateDuplicates", &mut self.consolidate_duplicates),
            ("oneLiner", &mut self.one_liner),
            ("inlineEnhancements", &mut self.inline_enhancements),
            ("showHeader", &mut self.show_header),
            ("noEmptyLines", &mut self.no_empty_lines),
        ]
    }

    /// Read toggles from a loosely-typed object.
    ///
    /// Absent keys keep their defaults and unknown keys are ignored. A present
    /// key holding anything but a boolean (`null` included) is rejected with the
    /// key's name.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| RosterError::invalid_argument("options", "an object"))?;

        let mut options = FormattingOptions::default();
        for (key, slot) in options.toggles_mut() {
            match object.get(key) {
                None => {}
                Some(Value::Bool(flag)) => *slot = *flag,
                Some(_) => return Err(RosterError::invalid_argument(key, "a boolean")),
            }
        }
        Ok(options)
    }

    /// Enhancement inlining is implied by one-liner output.
    pub fn effective_inline_enhancements(&self) -> bool {
        self.inline_enhancements || self.one_liner
    }
}

/// Saved options on disk: JSON by default, YAML for `.yaml`/`.yml` paths.
#[derive(Debug, Clone)]
pub struct OptionsStore {
    path: PathBuf,
}

impl OptionsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OptionsStore { path: path.into() }
    }

    /// `<config_dir>/roster-cleaner/options.json`, falling back to the
    /// working directory when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(OPTIONS_FILE_NAME)
    }

    pub fn at_default_location() -> Self {
        OptionsStore::new(OptionsStore::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_yaml(&self) -> bool {
        matches!(
            self.path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        )
    }

    /// Stored options over defaults. Never fails: unreadable or malformed
    /// data is logged and replaced by the defaults.
    pub fn load(&self) -> FormattingOptions {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no saved options, using defaults");
            return FormattingOptions::default();
        }
        match self.try_load() {
            Ok(options) => options,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable saved options");
                FormattingOptions::default()
            }
        }
    }

    fn try_load(&self) -> Result<FormattingOptions> {
        let contents = fs::read_to_string(&self.path)?;
        if self.is_yaml() {
            Ok(serde_yaml::from_str(&contents)?)
        } else {
            let value: Value = serde_json::from_str(&contents)?;
            FormattingOptions::from_value(&value)
        }
    }

    pub fn save(&self, options: &FormattingOptions) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let contents = if self.is_yaml() {
            serde_yaml::to_string(options)?
        } else {
            serde_json::to_string_pretty(options)?
        };
        fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), "saved options");
        Ok(())
    }
}
