//! Translation lookup: message key + language tag → display string.
//!
//! Catalogs are JSON objects, one per language tag. Nested objects flatten
//! to dotted keys (`{"toast": {"requestFailed": ".."}}` becomes
//! `toast.requestFailed`). Lookups fall back to the default language and
//! then to the key itself, so a missing translation never hides text.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

use crate::error::ManagerError;

/// Language used when nothing else is configured.
pub const DEFAULT_LANGUAGE: &str = "en-US";

const BUILTIN_EN_US: &str = r#"{
  "toast": {
    "requestFailed": "Could not reach the API. Check the server URL and your connection."
  },
  "socket": {
    "connected": "Real-time connection established",
    "disconnected": "Real-time connection lost",
    "reconnecting": "Reconnecting (attempt {{attempt}})",
    "reconnectFailed": "Gave up reconnecting after {{attempts}} attempts"
  },
  "login": {
    "message": {
      "invalidServer": "Invalid server",
      "invalidCredentials": "Invalid credentials"
    }
  }
}"#;

const BUILTIN_PT_BR: &str = r#"{
  "toast": {
    "requestFailed": "Não foi possível acessar a API. Verifique a URL do servidor e sua conexão."
  },
  "socket": {
    "connected": "Conexão em tempo real estabelecida",
    "disconnected": "Conexão em tempo real perdida",
    "reconnecting": "Reconectando (tentativa {{attempt}})",
    "reconnectFailed": "Reconexão abandonada após {{attempts}} tentativas"
  },
  "login": {
    "message": {
      "invalidServer": "Servidor inválido",
      "invalidCredentials": "Credenciais inválidas"
    }
  }
}"#;

/// Per-language string catalogs.
#[derive(Debug, Clone)]
pub struct Translator {
    default_language: String,
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl Translator {
    /// Creates an empty translator falling back to `default_language`.
    #[must_use]
    pub fn new(default_language: impl Into<String>) -> Self {
        Self {
            default_language: default_language.into(),
            catalogs: HashMap::new(),
        }
    }

    /// Creates a translator preloaded with the bundled `en-US` and `pt-BR`
    /// catalogs.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Serialization`] if a bundled catalog is
    /// malformed.
    pub fn with_builtin(default_language: impl Into<String>) -> Result<Self, ManagerError> {
        let mut translator = Self::new(default_language);
        translator.load_json("en-US", BUILTIN_EN_US)?;
        translator.load_json("pt-BR", BUILTIN_PT_BR)?;
        Ok(translator)
    }

    /// Returns the fallback language.
    #[must_use]
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Merges `catalog` into the catalog for `language`. Nested objects
    /// flatten to dotted keys; non-string leaves are stored in their JSON
    /// form.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Config`] if `catalog` is not a JSON object.
    pub fn add_catalog(&mut self, language: &str, catalog: &Value) -> Result<(), ManagerError> {
        let Value::Object(_) = catalog else {
            return Err(ManagerError::Config(format!(
                "catalog for {language} must be a JSON object"
            )));
        };
        let entries = self.catalogs.entry(language.to_string()).or_default();
        flatten(String::new(), catalog, entries);
        Ok(())
    }

    /// Parses `json` and merges it into the catalog for `language`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Serialization`] for invalid JSON or
    /// [`ManagerError::Config`] if it is not an object.
    pub fn load_json(&mut self, language: &str, json: &str) -> Result<(), ManagerError> {
        let value: Value = serde_json::from_str(json)?;
        self.add_catalog(language, &value)
    }

    /// Loads every `*.json` file in `dir`, using the file stem as the
    /// language tag (`pt-BR.json` → `pt-BR`). Returns the number of
    /// catalogs loaded.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Io`] if the directory cannot be read, or the
    /// parse error of the first malformed file.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, ManagerError> {
        let mut loaded = 0;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(language) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(&path)?;
            self.load_json(language, &text)?;
            tracing::debug!(language, path = %path.display(), "catalog loaded");
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Returns the loaded language tags, sorted.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.catalogs.keys().cloned().collect();
        languages.sort();
        languages
    }

    /// Returns `true` if a catalog exists for `language`.
    #[must_use]
    pub fn has_language(&self, language: &str) -> bool {
        self.catalogs.contains_key(language)
    }

    /// Looks up `key` in `language`, then in the default language, and
    /// finally returns the key itself.
    #[must_use]
    pub fn translate(&self, language: &str, key: &str) -> String {
        self.lookup(language, key).unwrap_or(key).to_string()
    }

    /// Like [`Translator::translate`], replacing `{{name}}` placeholders
    /// with the matching argument. Unknown placeholders are left as they
    /// are.
    #[must_use]
    pub fn translate_with(&self, language: &str, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.translate(language, key);
        for (name, value) in args {
            text = text.replace(&format!("{{{{{name}}}}}"), value);
        }
        text
    }

    fn lookup(&self, language: &str, key: &str) -> Option<&str> {
        let find = |lang: &str| {
            self.catalogs
                .get(lang)
                .and_then(|catalog| catalog.get(key))
                .map(String::as_str)
        };
        find(language).or_else(|| {
            tracing::trace!(language, key, "missing translation, using default language");
            find(&self.default_language)
        })
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGE)
    }
}

fn flatten(prefix: String, value: &Value, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(path, child, out);
            }
        }
        Value::String(text) => {
            out.insert(prefix, text.clone());
        }
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}
