use docsort_config::RegistryConfig;
use docsort_core::{CompileOptions, CompiledPipeline, PipelineCompiler, SortKeys};
use serde_json::json;
use std::fs;

const REGISTRY_TOML: &str = r#"
[name]
type = "string"

[score]
type = "number"

[sectionLength]
type = "array"
storage_key = "section"

[date]
type = "date"
databaseKey = "updated_at"
nullReplacementKey = "created_at"
nullReplacementValue = 0

[legacy]
type = "objectId"
"#;

fn compiler_from_file() -> PipelineCompiler {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sort_registry.toml");
    fs::write(&path, REGISTRY_TOML).unwrap();

    let registry = RegistryConfig::load_from_file(&path).unwrap();
    PipelineCompiler::with_registry(registry)
}

#[test]
fn file_registry_drives_compilation() {
    let pipeline = compiler_from_file()
        .compile(Some("-sectionLength,date,name"), &CompileOptions::default())
        .unwrap();

    assert_eq!(
        pipeline.to_json(),
        json!([
            {
                "$set": {
                    "section__sort_size": { "$size": "$section" },
                    "updated_at__sort_coalesce": { "$ifNull": ["$updated_at", "$created_at", 0] },
                    "name__sort_lower": { "$toLower": "$name" }
                }
            },
            {
                "$sort": {
                    "section__sort_size": -1,
                    "updated_at__sort_coalesce": 1,
                    "name__sort_lower": 1
                }
            },
            {
                "$unset": [
                    "section__sort_size",
                    "updated_at__sort_coalesce",
                    "name__sort_lower"
                ]
            }
        ])
    );
}

#[test]
fn unrecognized_type_from_config_falls_back() {
    let pipeline = compiler_from_file()
        .compile(Some("score,legacy"), &CompileOptions::default())
        .unwrap();
    assert_eq!(pipeline, CompiledPipeline::sort_only(SortKeys::id_ascending()));
}
