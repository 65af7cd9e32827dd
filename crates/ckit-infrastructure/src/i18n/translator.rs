//! JSON-dictionary translator

use crate::error_ext::ErrorContext;
use ckit_domain::constants::DEFAULT_LANG;
use ckit_domain::error::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

const SUPPORTED_EXTENSION: &str = "json";

/// Translations of one locale, keyed by message key
pub type Dictionary = HashMap<String, Value>;

/// Translator built from in-memory dictionaries and/or a resources directory
///
/// # Example
///
/// ```ignore
/// let trs = EasyTranslator::new("[Translator]")
///     .use_resources("/srv/app/locales")
///     .use_fallback_lng("en")
///     .initial()
///     .await?;
/// assert_eq!(trs.t("HELLO", Some("zh-TW")), "你好");
/// ```
#[derive(Debug, Clone)]
pub struct EasyTranslator {
    prefix: String,
    resources_path: Option<PathBuf>,
    fallback_lng: String,
    dictionaries: HashMap<String, Dictionary>,
}

impl Default for EasyTranslator {
    fn default() -> Self {
        Self::new("")
    }
}

impl EasyTranslator {
    /// Translator logging with `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            resources_path: None,
            fallback_lng: DEFAULT_LANG.to_string(),
            dictionaries: HashMap::new(),
        }
    }

    /// Load `<locale>.json` files from `path` on [`Self::initial`]
    ///
    /// Blank paths are ignored.
    #[must_use]
    pub fn use_resources(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !path.as_os_str().is_empty() {
            self.resources_path = Some(path);
        }
        self
    }

    /// Register a dictionary for `locale`
    #[must_use]
    pub fn use_dictionary<K, V>(mut self, locale: &str, dict: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let dict = dict
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect();
        self.dictionaries.insert(locale.to_lowercase(), dict);
        self
    }

    /// Locale used when the requested one is unknown or lacks a key
    ///
    /// Blank values are ignored.
    #[must_use]
    pub fn use_fallback_lng(mut self, lng: &str) -> Self {
        if !lng.trim().is_empty() {
            self.fallback_lng = lng.to_lowercase();
        }
        self
    }

    /// Load the resources directory, if one was set
    pub async fn initial(mut self) -> Result<Self> {
        let Some(dir) = self.resources_path.clone() else {
            return Ok(self);
        };

        let meta = tokio::fs::metadata(&dir).await.map_err(|e| {
            Error::io_with_source(
                format!("{} The resources directory does not exist", self.prefix),
                e,
            )
        })?;
        if !meta.is_dir() {
            return Err(Error::io(format!(
                "{} Input path {} is not a directory",
                self.prefix,
                dir.display()
            )));
        }

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&dir)
            .await
            .io_context(format!("Failed to list {}", dir.display()))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .io_context(format!("Failed to list {}", dir.display()))?
        {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == SUPPORTED_EXTENSION) {
                files.push(path);
            }
        }
        if files.is_empty() {
            return Err(Error::io(format!(
                "{} Input path {} must have at least one file named {}.{SUPPORTED_EXTENSION}",
                self.prefix,
                dir.display(),
                self.fallback_lng
            )));
        }

        for path in files {
            let Some(lng) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            info!(client = %self.prefix, "Load support lang: {lng}");
            let content = tokio::fs::read_to_string(&path)
                .await
                .io_context(format!("Failed to read {}", path.display()))?;
            let dict: Dictionary = serde_json::from_str(&content)?;
            self.dictionaries.insert(lng.to_lowercase(), dict);
        }
        Ok(self)
    }

    /// Translate `key` for `locale`
    ///
    /// Falls back to the fallback locale, then to the key itself.
    pub fn t(&self, key: &str, locale: Option<&str>) -> String {
        let requested = locale
            .filter(|l| !l.trim().is_empty())
            .map(str::to_lowercase);
        requested
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.fallback_lng.as_str()))
            .find_map(|lng| self.lookup(lng, key))
            .unwrap_or_else(|| key.to_string())
    }

    /// Locales currently loaded
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self.dictionaries.keys().cloned().collect();
        locales.sort();
        locales
    }

    fn lookup(&self, lng: &str, key: &str) -> Option<String> {
        self.dictionaries
            .get(lng)?
            .get(key)?
            .as_str()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string)
    }
}
