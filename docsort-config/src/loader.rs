//! Sort registry loading.

use anyhow::{Context, anyhow};
use docsort_model::FieldRegistry;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Environment variable naming a TOML or JSON registry file.
pub const REGISTRY_PATH_ENV: &str = "DOCSORT_REGISTRY_PATH";
/// Environment variable holding an inline JSON registry.
pub const REGISTRY_JSON_ENV: &str = "DOCSORT_REGISTRY_JSON";

const DEFAULT_CANDIDATES: &[&str] = &[
    "sort_registry.toml",
    "sort_registry.json",
    "config/sort_registry.toml",
    "config/sort_registry.json",
];

/// Source that produced the registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RegistrySource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Registry loader. The registry itself is a flat mapping of logical field
/// name to spec:
///
/// ```toml
/// [name]
/// type = "string"
///
/// [date]
/// type = "date"
/// storage_key = "updated_at"
/// null_replacement_key = "created_at"
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryConfig;

impl RegistryConfig {
    /// Load the registry using environment variables.
    /// Evaluation order:
    /// 1) `$DOCSORT_REGISTRY_PATH` (TOML or JSON file),
    /// 2) `$DOCSORT_REGISTRY_JSON` (inline JSON),
    /// 3) the first default file found in the working directory,
    /// 4) an empty registry.
    pub fn load_from_env() -> anyhow::Result<(FieldRegistry, RegistrySource)> {
        Self::load_from_env_in(Path::new("."))
    }

    /// Like [`RegistryConfig::load_from_env`], resolving default files
    /// relative to `base`.
    pub fn load_from_env_in(base: &Path) -> anyhow::Result<(FieldRegistry, RegistrySource)> {
        let (registry, source) = Self::resolve(
            env::var(REGISTRY_PATH_ENV).ok(),
            env::var(REGISTRY_JSON_ENV).ok(),
            base,
        )?;
        info!(fields = registry.len(), source = ?source, "loaded sort registry");
        Ok((registry, source))
    }

    fn resolve(
        path_var: Option<String>,
        inline_var: Option<String>,
        base: &Path,
    ) -> anyhow::Result<(FieldRegistry, RegistrySource)> {
        if let Some(path_str) = path_var
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let registry = Self::load_from_file(&path)?;
            return Ok((registry, RegistrySource::EnvPath(path)));
        }

        if let Some(raw) = inline_var
            && !raw.trim().is_empty()
        {
            let registry = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {REGISTRY_JSON_ENV}"))?;
            return Ok((registry, RegistrySource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(base) {
            let registry = Self::load_from_file(&path)?;
            return Ok((registry, RegistrySource::File(path)));
        }

        debug!("no sort registry configured; using an empty registry");
        Ok((FieldRegistry::default(), RegistrySource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<FieldRegistry> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read sort registry from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents)
                .with_context(|| format!("invalid sort registry {}", path.display())),
            Some("toml") | Some("tml") => toml::from_str(&contents).map_err(|err| {
                anyhow!("invalid sort registry {}: {}", path.display(), err)
            }),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    /// Parse registry text of unknown format: TOML first, then JSON.
    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<FieldRegistry> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse sort registry {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<FieldRegistry> {
        serde_json::from_str(raw).map_err(|err| anyhow!("invalid sort registry json: {err}"))
    }

    fn find_default_file(base: &Path) -> Option<PathBuf> {
        DEFAULT_CANDIDATES
            .iter()
            .map(|candidate| base.join(candidate))
            .find(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docsort_model::FieldKind;
    use std::io::Write;

    #[test]
    fn path_variable_wins_over_inline_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.toml");
        fs::write(&path, "[score]\ntype = \"number\"\n").unwrap();

        let (registry, source) = RegistryConfig::resolve(
            Some(path.display().to_string()),
            Some(r#"{"name": {"type": "string"}}"#.to_string()),
            dir.path(),
        )
        .unwrap();

        assert_eq!(source, RegistrySource::EnvPath(path));
        assert!(registry.contains("score"));
        assert!(!registry.contains("name"));
    }

    #[test]
    fn blank_variables_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let (registry, source) = RegistryConfig::resolve(
            Some("   ".to_string()),
            Some(String::new()),
            dir.path(),
        )
        .unwrap();

        assert_eq!(source, RegistrySource::Default);
        assert!(registry.is_empty());
    }

    #[test]
    fn inline_json_accepts_camel_case_keys() {
        let dir = tempfile::tempdir().unwrap();
        let (registry, source) = RegistryConfig::resolve(
            None,
            Some(
                r#"{"date": {"type": "date", "databaseKey": "updated_at", "nullReplacementKey": "created_at"}}"#
                    .to_string(),
            ),
            dir.path(),
        )
        .unwrap();

        assert_eq!(source, RegistrySource::EnvInline);
        let spec = registry.get("date").unwrap();
        assert_eq!(spec.kind, FieldKind::Date);
        assert_eq!(spec.storage_key_or("date"), "updated_at");
        assert_eq!(spec.replacement_key(), Some("created_at"));
    }

    #[test]
    fn default_file_is_discovered_under_base() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        let path = dir.path().join("config/sort_registry.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"{{"tags": {{"type": "array", "storage_key": "meta.tags"}}}}"#).unwrap();

        let (registry, source) = RegistryConfig::resolve(None, None, dir.path()).unwrap();
        assert_eq!(source, RegistrySource::File(path));
        assert_eq!(registry.get("tags").map(|s| s.kind), Some(FieldKind::Array));
    }

    #[test]
    fn unknown_extension_tries_toml_then_json() {
        let from_toml =
            RegistryConfig::parse_from_str("[name]\ntype = \"string\"\n", "inline").unwrap();
        assert!(from_toml.contains("name"));

        let from_json =
            RegistryConfig::parse_from_str(r#"{"score": {"type": "number"}}"#, "inline").unwrap();
        assert!(from_json.contains("score"));

        let err = RegistryConfig::parse_from_str("not a registry", "inline").unwrap_err();
        assert!(err.to_string().contains("failed to parse sort registry inline"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RegistryConfig::load_from_file(Path::new("/nonexistent/registry.toml"))
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/registry.toml"));
    }
}
