//! Per-kind strategy for turning a registry field into a sortable value.

use docsort_model::{Expr, FieldKind, FieldSpec};

/// Marker separating an encoded storage key from the strategy tag in
/// temporary field names.
pub const TEMP_FIELD_MARKER: &str = "__sort_";

/// How one directive field is sorted.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPlan {
    /// Sort on the stored value as-is
    Direct { path: String },
    /// Materialize `expr` into `name`, sort on it, then drop it
    Temporary { name: String, expr: Expr },
}

impl FieldPlan {
    /// Field the sort stage refers to.
    pub fn sort_path(&self) -> &str {
        match self {
            FieldPlan::Direct { path } => path,
            FieldPlan::Temporary { name, .. } => name,
        }
    }
}

/// Deterministic temporary name for `storage_key`.
///
/// The key is escaped (`-` as `-_`, `.` as `--`) so the temporary stays a
/// top-level field and distinct storage keys never share a name: `marks.grade`
/// becomes `marks--grade`, while `marks_grade` is left untouched. The strategy
/// tag keeps two strategies over one key apart.
pub fn temp_field_name(storage_key: &str, tag: &str) -> String {
    let mut name = String::with_capacity(storage_key.len() + TEMP_FIELD_MARKER.len() + tag.len());
    for ch in storage_key.chars() {
        match ch {
            '-' => name.push_str("-_"),
            '.' => name.push_str("--"),
            other => name.push(other),
        }
    }
    name.push_str(TEMP_FIELD_MARKER);
    name.push_str(tag);
    name
}

/// Plans a registry field. `None` means the kind is not one the compiler
/// knows how to sort, and the whole compile must fall back.
pub fn plan_field(logical_name: &str, spec: &FieldSpec) -> Option<FieldPlan> {
    let storage_key = spec.storage_key_or(logical_name);

    let plan = match spec.kind {
        FieldKind::String => FieldPlan::Temporary {
            name: temp_field_name(storage_key, "lower"),
            expr: Expr::lower(Expr::field(storage_key)),
        },
        FieldKind::Array => FieldPlan::Temporary {
            name: temp_field_name(storage_key, "size"),
            expr: Expr::size(Expr::field(storage_key)),
        },
        FieldKind::Date if spec.has_null_replacement() => FieldPlan::Temporary {
            name: temp_field_name(storage_key, "coalesce"),
            expr: Expr::coalesce(null_coalescing_candidates(storage_key, spec)),
        },
        FieldKind::Date | FieldKind::Number | FieldKind::Boolean => FieldPlan::Direct {
            path: storage_key.to_string(),
        },
        FieldKind::Unrecognized => return None,
    };

    Some(plan)
}

// Stored value, then the replacement key's value, then the literal.
fn null_coalescing_candidates(storage_key: &str, spec: &FieldSpec) -> Vec<Expr> {
    let mut candidates = vec![Expr::field(storage_key)];
    if let Some(key) = spec.replacement_key() {
        candidates.push(Expr::field(key));
    }
    if let Some(value) = spec.replacement_value() {
        candidates.push(Expr::Literal(value.clone()));
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn string_and_array_always_use_temporaries() {
        let plan = plan_field("name", &FieldSpec::string()).unwrap();
        assert_eq!(
            plan,
            FieldPlan::Temporary {
                name: "name__sort_lower".to_string(),
                expr: Expr::lower(Expr::field("name")),
            }
        );

        let plan =
            plan_field("sectionLength", &FieldSpec::array().with_storage_key("section")).unwrap();
        assert_eq!(plan.sort_path(), "section__sort_size");
        assert!(matches!(plan, FieldPlan::Temporary { .. }));
    }

    #[test]
    fn scalar_kinds_sort_on_storage_key() {
        for spec in [FieldSpec::number(), FieldSpec::boolean(), FieldSpec::date()] {
            let plan = plan_field("x", &spec.with_storage_key("stats.x")).unwrap();
            assert_eq!(
                plan,
                FieldPlan::Direct {
                    path: "stats.x".to_string()
                }
            );
        }
    }

    #[test]
    fn date_with_replacement_coalesces_in_precedence_order() {
        let spec = FieldSpec::date()
            .with_storage_key("updated_at")
            .with_null_replacement_key("created_at")
            .with_null_replacement_value("1970-01-01T00:00:00Z");

        let plan = plan_field("date", &spec).unwrap();
        assert_eq!(
            plan,
            FieldPlan::Temporary {
                name: "updated_at__sort_coalesce".to_string(),
                expr: Expr::coalesce(vec![
                    Expr::field("updated_at"),
                    Expr::field("created_at"),
                    Expr::literal(json!("1970-01-01T00:00:00Z")),
                ]),
            }
        );
    }

    #[test]
    fn date_with_only_literal_skips_missing_key() {
        let spec = FieldSpec::date().with_null_replacement_value(0);
        let plan = plan_field("when", &spec).unwrap();
        assert_eq!(
            plan,
            FieldPlan::Temporary {
                name: "when__sort_coalesce".to_string(),
                expr: Expr::coalesce(vec![Expr::field("when"), Expr::literal(0)]),
            }
        );
    }

    #[test]
    fn nested_storage_keys_encode_into_top_level_names() {
        assert_eq!(temp_field_name("marks.grade", "lower"), "marks--grade__sort_lower");
        assert!(!temp_field_name("a.b.c", "size").contains('.'));
    }

    #[test]
    fn distinct_storage_keys_never_share_a_temp_name() {
        let keys = ["marks.grade", "marks_grade", "marks-grade", "a.-b", "a-.b", "a--b", "a..b"];
        let names: HashSet<String> = keys
            .iter()
            .map(|key| temp_field_name(key, "lower"))
            .collect();
        assert_eq!(names.len(), keys.len());
    }

    #[test]
    fn unrecognized_kind_has_no_plan() {
        assert!(plan_field("id", &FieldSpec::new(FieldKind::Unrecognized)).is_none());
    }
}
