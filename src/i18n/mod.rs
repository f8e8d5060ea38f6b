//! Internationalization (i18n) support
//!
//! Every user-visible string the controller writes comes from here. English
//! and Chinese catalogs are built in; files in the site's language directory
//! (`en.yml`, `zh-CN.json`, ...) override individual keys.

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN_EN: &str = r#"
posts:
  count:
    zero: "No posts"
    one: "1 post"
    other: "%d posts"
  empty: "No posts yet"
  read_more: "Read more →"
post:
  loading: "Loading"
  published: "Published on %s"
date:
  unknown: "Unknown date"
error:
  load_posts: "Failed to load posts, please reload the page"
  load_post: "Failed to load the post"
  not_found: "Post not found"
  reload: "Reload"
"#;

const BUILTIN_ZH: &str = r#"
posts:
  count:
    zero: "共计 0 篇文章"
    one: "共计 1 篇文章"
    other: "共计 %d 篇文章"
  empty: "暂无文章"
  read_more: "阅读全文 →"
post:
  loading: "加载中"
  published: "发布于 %s"
date:
  unknown: "日期未知"
error:
  load_posts: "加载文章失败，请刷新页面重试"
  load_post: "加载文章内容失败"
  not_found: "文章不存在"
  reload: "刷新页面"
"#;

type Catalog = HashMap<String, serde_yaml::Value>;

/// Internationalization handler
#[derive(Debug, Clone)]
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, Catalog>,
}

impl I18n {
    /// Create a handler with the built-in catalogs
    pub fn new(language: &str) -> Self {
        let mut translations = HashMap::new();
        for (lang, source) in [("en", BUILTIN_EN), ("zh", BUILTIN_ZH)] {
            match serde_yaml::from_str::<Catalog>(source) {
                Ok(data) => {
                    translations.insert(lang.to_string(), data);
                }
                Err(e) => tracing::error!("Built-in catalog {} is invalid: {}", lang, e),
            }
        }

        Self {
            language: language.to_string(),
            translations,
        }
    }

    /// Load language files from a directory, overriding built-in keys
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let ext = path.extension().and_then(|e| e.to_str());
            if !matches!(ext, Some("yml") | Some("yaml") | Some("json")) {
                continue;
            }

            let lang = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("en")
                .to_string();
            let content = fs::read_to_string(&path)?;

            // Skip invalid files
            let data: Option<Catalog> = if ext == Some("json") {
                match serde_json::from_str::<serde_json::Value>(&content) {
                    Ok(json) => Some(convert_json_to_yaml(json)),
                    Err(e) => {
                        tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                        None
                    }
                }
            } else {
                match serde_yaml::from_str(&content) {
                    Ok(data) => Some(data),
                    Err(e) => {
                        tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                        None
                    }
                }
            };

            if let Some(data) = data {
                let catalog = self.translations.entry(lang).or_default();
                for (key, value) in data {
                    merge_value(catalog, key, value);
                }
                tracing::debug!("Loaded language file: {:?}", path);
            }
        }

        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by key; key can be nested like "error.reload"
    pub fn get(&self, key: &str) -> String {
        for lang in self.fallback_chain() {
            if let Some(value) = self
                .translations
                .get(lang)
                .and_then(|data| get_nested_value(data, key))
            {
                return yaml_value_to_string(value);
            }
        }

        // Return key as fallback
        key.to_string()
    }

    /// Get a translation and substitute `%s` with `arg`
    pub fn format(&self, key: &str, arg: &str) -> String {
        self.get(key).replace("%s", arg)
    }

    /// Get a pluralized translation, replacing `%d` with the count
    pub fn get_plural(&self, key: &str, count: usize) -> String {
        let plural_key = match count {
            0 => format!("{}.zero", key),
            1 => format!("{}.one", key),
            _ => format!("{}.other", key),
        };

        self.get(&plural_key).replace("%d", &count.to_string())
    }

    /// Exact language, then its base ("zh-CN" -> "zh"), then English
    fn fallback_chain(&self) -> Vec<&str> {
        let mut chain = vec![self.language.as_str()];
        if let Some((base, _)) = self.language.split_once(|c| c == '-' || c == '_') {
            chain.push(base);
        }
        if !chain.contains(&"en") {
            chain.push("en");
        }
        chain
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new("en")
    }
}

/// Merge `value` into `catalog[key]`, descending into nested mappings
fn merge_value(catalog: &mut Catalog, key: String, value: serde_yaml::Value) {
    if let (Some(serde_yaml::Value::Mapping(existing)), serde_yaml::Value::Mapping(incoming)) =
        (catalog.get_mut(&key), &value)
    {
        merge_mapping(existing, incoming);
        return;
    }
    catalog.insert(key, value);
}

fn merge_mapping(existing: &mut serde_yaml::Mapping, incoming: &serde_yaml::Mapping) {
    for (k, v) in incoming {
        if let (Some(serde_yaml::Value::Mapping(inner)), serde_yaml::Value::Mapping(v)) =
            (existing.get_mut(k), v)
        {
            merge_mapping(inner, v);
            continue;
        }
        existing.insert(k.clone(), v.clone());
    }
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(data: &'a Catalog, key: &str) -> Option<&'a serde_yaml::Value> {
    let mut parts = key.split('.');
    let mut current = data.get(parts.next()?);

    for part in parts {
        match current {
            Some(serde_yaml::Value::Mapping(map)) => {
                current = map.get(serde_yaml::Value::String(part.to_string()));
            }
            _ => return None,
        }
    }

    match current {
        Some(serde_yaml::Value::Mapping(_)) => None,
        other => other,
    }
}

/// Convert a YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

/// Convert JSON value to YAML HashMap
fn convert_json_to_yaml(json: serde_json::Value) -> Catalog {
    let mut result = HashMap::new();

    if let serde_json::Value::Object(obj) = json {
        for (key, value) in obj {
            result.insert(key, json_value_to_yaml(value));
        }
    }

    result
}

fn json_value_to_yaml(json: serde_json::Value) -> serde_yaml::Value {
    match json {
        serde_json::Value::Null => serde_yaml::Value::Null,
        serde_json::Value::Bool(b) => serde_yaml::Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                serde_yaml::Value::Number(i.into())
            } else if let Some(f) = n.as_f64() {
                serde_yaml::Value::Number(serde_yaml::Number::from(f))
            } else {
                serde_yaml::Value::Null
            }
        }
        serde_json::Value::String(s) => serde_yaml::Value::String(s),
        serde_json::Value::Array(arr) => {
            serde_yaml::Value::Sequence(arr.into_iter().map(json_value_to_yaml).collect())
        }
        serde_json::Value::Object(obj) => {
            let mut map = serde_yaml::Mapping::new();
            for (k, v) in obj {
                map.insert(serde_yaml::Value::String(k), json_value_to_yaml(v));
            }
            serde_yaml::Value::Mapping(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_translations() {
        let i18n = I18n::new("en");
        assert_eq!(i18n.get("error.reload"), "Reload");
        assert_eq!(i18n.format("post.published", "May 1, 2024"), "Published on May 1, 2024");
        assert_eq!(i18n.get("unknown.key"), "unknown.key");
        // A mapping is not a translation
        assert_eq!(i18n.get("posts.count"), "posts.count");
    }

    #[test]
    fn test_language_fallback_chain() {
        let i18n = I18n::new("zh-CN");
        assert_eq!(i18n.get("posts.empty"), "暂无文章");

        let i18n = I18n::new("de");
        assert_eq!(i18n.get("posts.empty"), "No posts yet");
        assert_eq!(i18n.get("error.not_found"), "Post not found");
    }

    #[test]
    fn test_plural() {
        let i18n = I18n::new("en");
        assert_eq!(i18n.get_plural("posts.count", 0), "No posts");
        assert_eq!(i18n.get_plural("posts.count", 1), "1 post");
        assert_eq!(i18n.get_plural("posts.count", 7), "7 posts");

        let i18n = I18n::new("zh-CN");
        assert_eq!(i18n.get_plural("posts.count", 3), "共计 3 篇文章");
    }

    #[test]
    fn test_load_languages_overrides() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("en.yml"),
            "posts:\n  empty: Nothing here\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("fr.json"),
            r#"{"error": {"reload": "Recharger"}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.yml"), "posts: [unclosed").unwrap();

        let mut i18n = I18n::new("en");
        i18n.load_languages(dir.path()).unwrap();
        assert_eq!(i18n.get("posts.empty"), "Nothing here");
        // Sibling keys survive the merge
        assert_eq!(i18n.get("posts.read_more"), "Read more →");

        let mut fr = I18n::new("fr");
        fr.load_languages(dir.path()).unwrap();
        assert_eq!(fr.get("error.reload"), "Recharger");
        assert_eq!(fr.get("error.not_found"), "Post not found");
    }

    #[test]
    fn test_missing_language_dir() {
        let mut i18n = I18n::default();
        assert!(i18n.load_languages("/definitely/not/here").is_ok());
        assert_eq!(i18n.language(), "en");
    }
}
