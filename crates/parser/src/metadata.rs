//! Capsule metadata: manifest loading and directory-name inference

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ParserError, ParserResult};
use crate::types::{CapsuleAnalysis, CapsuleMetadata, Platform};

/// Manifest file names, checked in order
pub const MANIFEST_FILES: [&str; 3] = ["capsule.json", "capsule.yaml", "capsule.yml"];

const DEFAULT_VERSION: &str = "1.0.0";

/// Category keywords matched against the capsule id
const CATEGORY_KEYWORDS: [(&str, &str); 12] = [
    ("analytics", "analytics"),
    ("tracking", "analytics"),
    ("cache", "cache"),
    ("database", "database"),
    ("db", "database"),
    ("email", "email"),
    ("mail", "email"),
    ("logger", "logger"),
    ("log", "logger"),
    ("auth", "auth"),
    ("storage", "storage"),
    ("http", "network"),
];

const NODE_BUILTINS: [&str; 16] = [
    "fs",
    "path",
    "os",
    "child_process",
    "crypto",
    "http",
    "https",
    "net",
    "stream",
    "zlib",
    "cluster",
    "worker_threads",
    "readline",
    "dns",
    "tls",
    "util",
];

/// Metadata as written in a manifest; every field is optional
#[derive(Debug, Default, Deserialize)]
pub struct CapsuleManifest {
    pub id: Option<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// Subset of `package.json` used as a fallback manifest
#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    name: Option<String>,
    version: Option<String>,
    description: Option<String>,
    #[serde(default)]
    dependencies: HashMap<String, serde_json::Value>,
}

impl From<PackageJson> for CapsuleManifest {
    fn from(package: PackageJson) -> Self {
        let mut dependencies: Vec<String> = package.dependencies.into_keys().collect();
        dependencies.sort();
        Self {
            id: package
                .name
                .as_deref()
                .map(|n| n.rsplit('/').next().unwrap_or(n).to_string()),
            name: None,
            category: None,
            description: package.description,
            version: package.version,
            platforms: Vec::new(),
            dependencies,
        }
    }
}

/// Load the first manifest found in the capsule directory
pub fn load_manifest(dir: &Path) -> ParserResult<Option<(PathBuf, CapsuleManifest)>> {
    for file_name in MANIFEST_FILES {
        let path = dir.join(file_name);
        if path.is_file() {
            let content = read(&path)?;
            // YAML is a superset of JSON, one parser covers all three names
            let manifest: CapsuleManifest =
                serde_yaml::from_str(&content).map_err(|e| ParserError::Manifest {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            debug!("Loaded capsule manifest {:?}", path);
            return Ok(Some((path, manifest)));
        }
    }

    let package_path = dir.join("package.json");
    if package_path.is_file() {
        let content = read(&package_path)?;
        let package: PackageJson =
            serde_json::from_str(&content).map_err(|e| ParserError::Manifest {
                path: package_path.clone(),
                message: e.to_string(),
            })?;
        debug!("Using package.json as capsule manifest");
        return Ok(Some((package_path, package.into())));
    }

    Ok(None)
}

fn read(path: &Path) -> ParserResult<String> {
    std::fs::read_to_string(path).map_err(|source| ParserError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Capsule id derived from a directory name
pub fn capsule_id_from_dir(dir: &Path) -> String {
    let raw = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "capsule".to_string());
    to_kebab_case(&raw)
}

/// `EmailSender`, `email_sender` and `email sender` all become `email-sender`
pub fn to_kebab_case(input: &str) -> String {
    let mut out = String::new();
    let mut prev_lower = false;
    for c in input.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower && !out.ends_with('-') {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        } else {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            prev_lower = false;
        }
    }
    let trimmed = out.trim_matches('-').to_string();
    if trimmed.is_empty() {
        "capsule".to_string()
    } else {
        trimmed
    }
}

/// `email-sender` becomes `Email Sender`
pub fn title_case(id: &str) -> String {
    id.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Category from keywords in the id
pub fn infer_category(id: &str) -> String {
    let segments: Vec<&str> = id.split('-').collect();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| {
            segments.iter().any(|s| s == keyword) || (keyword.len() > 3 && id.contains(keyword))
        })
        .map(|(_, category)| category.to_string())
        .unwrap_or_else(|| "general".to_string())
}

/// Platforms from Node built-in imports and browser globals
pub fn infer_platforms(analysis: &CapsuleAnalysis, uses_browser_globals: bool) -> Vec<Platform> {
    let uses_node = analysis
        .imports
        .iter()
        .filter(|i| !i.is_relative())
        .any(|i| i.source.starts_with("node:") || NODE_BUILTINS.contains(&i.package_name().as_str()));

    let mut platforms = Vec::new();
    if uses_node {
        platforms.push(Platform::Node);
    }
    if uses_browser_globals {
        platforms.push(Platform::Web);
    }
    if platforms.is_empty() {
        platforms.push(Platform::Universal);
    }
    platforms
}

/// Capsule id: the manifest `id` kebab-cased, else the directory name
pub fn resolve_capsule_id(dir: &Path, manifest: Option<&CapsuleManifest>) -> String {
    manifest
        .and_then(|m| m.id.as_deref())
        .map(to_kebab_case)
        .unwrap_or_else(|| capsule_id_from_dir(dir))
}

/// Merge manifest values over inferred defaults
pub fn build_metadata(
    dir: &Path,
    manifest: Option<CapsuleManifest>,
    analysis: &CapsuleAnalysis,
    uses_browser_globals: bool,
) -> CapsuleMetadata {
    let manifest = manifest.unwrap_or_default();

    let id = resolve_capsule_id(dir, Some(&manifest));
    let name = manifest.name.unwrap_or_else(|| title_case(&id));
    let category = manifest.category.unwrap_or_else(|| infer_category(&id));
    let description = manifest
        .description
        .unwrap_or_else(|| format!("{name} capsule"));
    let version = manifest
        .version
        .unwrap_or_else(|| DEFAULT_VERSION.to_string());

    let mut platforms: Vec<Platform> = manifest
        .platforms
        .iter()
        .filter_map(|p| Platform::from_name(p))
        .collect();
    platforms.sort();
    platforms.dedup();
    if platforms.is_empty() {
        platforms = infer_platforms(analysis, uses_browser_globals);
    }

    let dependencies = if manifest.dependencies.is_empty() {
        analysis
            .external_packages()
            .into_iter()
            .filter(|p| !NODE_BUILTINS.contains(&p.as_str()))
            .collect()
    } else {
        manifest.dependencies
    };

    CapsuleMetadata {
        id,
        name,
        category,
        description,
        version,
        platforms,
        dependencies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImportInfo, SourceLocation};
    use tempfile::TempDir;

    fn import(source: &str) -> ImportInfo {
        ImportInfo {
            source: source.to_string(),
            default_import: None,
            namespace_import: None,
            named: Vec::new(),
            type_only: false,
            location: SourceLocation {
                file: PathBuf::from("index.ts"),
                line: 1,
                column: 1,
            },
            source_text: format!("import '{source}';"),
        }
    }

    #[test]
    fn test_kebab_and_title_case() {
        assert_eq!(to_kebab_case("EmailSender"), "email-sender");
        assert_eq!(to_kebab_case("email_sender"), "email-sender");
        assert_eq!(to_kebab_case("  Redis Cache!"), "redis-cache");
        assert_eq!(title_case("email-sender"), "Email Sender");
    }

    #[test]
    fn test_infer_category() {
        assert_eq!(infer_category("email-sender"), "email");
        assert_eq!(infer_category("redis-cache"), "cache");
        assert_eq!(infer_category("widget"), "general");
        assert_eq!(infer_category("app-logger"), "logger");
    }

    #[test]
    fn test_infer_platforms() {
        let mut analysis = CapsuleAnalysis::default();
        assert_eq!(infer_platforms(&analysis, false), vec![Platform::Universal]);

        analysis.imports.push(import("node:fs"));
        assert_eq!(infer_platforms(&analysis, false), vec![Platform::Node]);
        assert_eq!(
            infer_platforms(&analysis, true),
            vec![Platform::Node, Platform::Web]
        );
    }

    #[test]
    fn test_manifest_overrides_inference() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("my_logger");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(
            dir.join("capsule.json"),
            r#"{"id": "structured-logger", "version": "2.1.0", "platforms": ["node", "browser"]}"#,
        )
        .unwrap();

        let manifest = load_manifest(&dir).unwrap().map(|(_, m)| m);
        let metadata = build_metadata(&dir, manifest, &CapsuleAnalysis::default(), false);

        assert_eq!(metadata.id, "structured-logger");
        assert_eq!(metadata.name, "Structured Logger");
        assert_eq!(metadata.version, "2.1.0");
        assert_eq!(metadata.category, "logger");
        assert_eq!(metadata.platforms, vec![Platform::Node, Platform::Web]);
        assert!(metadata.is_multi_platform());
    }

    #[test]
    fn test_resolved_ids_normalize_directory_names() {
        let underscored = resolve_capsule_id(Path::new("/capsules/email_sender"), None);
        let kebab = resolve_capsule_id(Path::new("/capsules/email-sender"), None);
        assert_eq!(underscored, "email-sender");
        assert_eq!(underscored, kebab);

        let manifest = CapsuleManifest {
            id: Some("mailer".to_string()),
            ..CapsuleManifest::default()
        };
        assert_eq!(
            resolve_capsule_id(Path::new("/capsules/email_sender"), Some(&manifest)),
            "mailer"
        );
    }

    #[test]
    fn test_package_json_fallback() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("package.json"),
            r#"{"name": "@acme/cache", "version": "0.3.0", "dependencies": {"ioredis": "^5.0.0"}}"#,
        )
        .unwrap();

        let (path, manifest) = load_manifest(temp_dir.path()).unwrap().unwrap();
        assert!(path.ends_with("package.json"));
        assert_eq!(manifest.id.as_deref(), Some("cache"));
        assert_eq!(manifest.dependencies, vec!["ioredis".to_string()]);
    }

    #[test]
    fn test_invalid_manifest_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("capsule.yaml"), "platforms: {").unwrap();

        let err = load_manifest(temp_dir.path()).unwrap_err();
        assert_eq!(err.code(), "PARSE_MANIFEST");
    }

    #[test]
    fn test_dependencies_inferred_from_imports() {
        let mut analysis = CapsuleAnalysis::default();
        analysis.imports.push(import("axios"));
        analysis.imports.push(import("fs"));
        analysis.imports.push(import("./helpers"));
        analysis.imports.push(import("axios/lib/core"));

        let metadata = build_metadata(Path::new("/tmp/api-client"), None, &analysis, false);
        assert_eq!(metadata.dependencies, vec!["axios".to_string()]);
        assert_eq!(metadata.version, "1.0.0");
    }
}
