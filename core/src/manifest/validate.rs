use super::{InstallEntry, Manifest, SUPPORTED_VERSION, Source, SourceKind};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Lowers a parsed YAML document into a [`Manifest`], or returns every
/// problem found along the way.
pub(super) fn lower(document: &Value) -> Result<Manifest, Vec<String>> {
    let Some(root) = document.as_mapping() else {
        return Err(vec!["manifest must be a mapping".to_string()]);
    };

    let mut problems = Vec::new();

    let version = match root.get("version") {
        None => {
            problems.push("manifest must include 'version' field".to_string());
            None
        }
        Some(value) if is_supported_version(value) => Some(SUPPORTED_VERSION),
        Some(value) => {
            problems.push(format!("unsupported manifest version: {}", render(value)));
            None
        }
    };

    let sources = match root.get("sources") {
        None => {
            problems.push("manifest must include 'sources' section".to_string());
            None
        }
        Some(Value::Mapping(map)) => Some(lower_sources(map, &mut problems)),
        Some(_) => {
            problems.push("'sources' must be a mapping".to_string());
            None
        }
    };

    let install = match root.get("install") {
        None => {
            problems.push("manifest must include 'install' section".to_string());
            None
        }
        Some(Value::Sequence(items)) => Some(lower_install(items, &mut problems)),
        Some(_) => {
            problems.push("'install' must be a list".to_string());
            None
        }
    };

    match (version, sources, install) {
        (Some(version), Some(sources), Some(install)) if problems.is_empty() => Ok(Manifest {
            version,
            sources,
            install,
        }),
        _ => Err(problems),
    }
}

fn lower_sources(map: &Mapping, problems: &mut Vec<String>) -> BTreeMap<String, Source> {
    let mut sources = BTreeMap::new();

    for (key, value) in map {
        let Some(name) = key.as_str() else {
            problems.push(format!("source name must be a string: {}", render(key)));
            continue;
        };

        let Some(fields) = value.as_mapping() else {
            problems.push(format!("source '{}' must be a mapping", name));
            continue;
        };

        let context = format!("source '{}'", name);
        let Some(kind) = required_str(fields, "type", &context, problems) else {
            continue;
        };
        let kind = SourceKind::parse(&kind);

        // Only local sources are read from disk; other types fail the entries that use them.
        let root = match kind {
            SourceKind::Local => required_str(fields, "root", &context, problems),
            SourceKind::Other(_) => optional_str(fields, "root", &context, problems),
        };
        let skills_root = optional_str(fields, "skills_root", &context, problems);

        if kind == SourceKind::Local && root.is_none() {
            continue;
        }

        sources.insert(
            name.to_string(),
            Source {
                kind,
                root: root.map(PathBuf::from).unwrap_or_default(),
                skills_root: skills_root.map(PathBuf::from).unwrap_or_default(),
            },
        );
    }

    sources
}

fn lower_install(items: &[Value], problems: &mut Vec<String>) -> Vec<InstallEntry> {
    let mut entries = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let context = format!("install entry {}", idx + 1);

        let Some(fields) = item.as_mapping() else {
            problems.push(format!("{} must be a mapping", context));
            continue;
        };

        // Empty strings count as absent; a missing `from`/`to` only fails its own entry.
        entries.push(InstallEntry {
            id: optional_str(fields, "id", &context, problems).filter(|s| !s.is_empty()),
            from: optional_str(fields, "from", &context, problems).filter(|s| !s.is_empty()),
            to: optional_str(fields, "to", &context, problems).filter(|s| !s.is_empty()),
        });
    }

    entries
}

fn required_str(
    fields: &Mapping,
    key: &str,
    context: &str,
    problems: &mut Vec<String>,
) -> Option<String> {
    if matches!(fields.get(key), None | Some(Value::Null)) {
        problems.push(format!("{} is missing '{}'", context, key));
        return None;
    }
    optional_str(fields, key, context, problems)
}

fn optional_str(
    fields: &Mapping,
    key: &str,
    context: &str,
    problems: &mut Vec<String>,
) -> Option<String> {
    match fields.get(key) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            problems.push(format!(
                "{}: '{}' must be a string, got {}",
                context,
                key,
                render(other)
            ));
            None
        }
    }
}

fn is_supported_version(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.as_u64() == Some(SUPPORTED_VERSION) || n.as_f64() == Some(SUPPORTED_VERSION as f64)
        }
        _ => false,
    }
}

fn render(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| "<unprintable>".to_string())
}
