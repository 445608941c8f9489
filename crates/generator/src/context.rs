//! Template context: the immutable projection every template renders from

use capsule_parser::{
    CapsuleMetadata, ClassInfo, ComplexityMetrics, ConstantInfo, ErrorClassInfo, FunctionInfo,
    ImportInfo, InterfaceInfo, MigrationMode, ParsedCapsule, Platform, TypeInfo, VariableInfo,
};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeSet;

use crate::naming::{class_name, package_name};
use crate::templates::errors::{error_kinds, ErrorKind};
use crate::templates::FileKind;

/// Import sources that imply file-system access
pub const FILE_SYSTEM_MODULES: [&str; 5] = ["fs", "path", "fs-extra", "graceful-fs", "fs/promises"];

/// Import sources that imply network access
pub const NETWORK_MODULES: [&str; 10] = [
    "http",
    "https",
    "net",
    "axios",
    "node-fetch",
    "got",
    "ws",
    "undici",
    "cross-fetch",
    "superagent",
];

/// Import sources that imply a database client
pub const DATABASE_MODULES: [&str; 13] = [
    "pg",
    "mysql",
    "mysql2",
    "mongodb",
    "mongoose",
    "sqlite3",
    "better-sqlite3",
    "redis",
    "ioredis",
    "typeorm",
    "@prisma/client",
    "knex",
    "sequelize",
];

/// Capability flags inferred from import sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CapabilityFlags {
    pub has_file_system: bool,
    pub has_network: bool,
    pub has_database: bool,
}

impl CapabilityFlags {
    pub fn from_imports(imports: &[ImportInfo]) -> Self {
        let mut flags = Self::default();
        for import in imports.iter().filter(|i| !i.is_relative()) {
            let source = import.source.strip_prefix("node:").unwrap_or(&import.source);
            let package = import.package_name();

            flags.has_file_system |= listed(&FILE_SYSTEM_MODULES, source, &package);
            flags.has_network |= listed(&NETWORK_MODULES, source, &package);
            flags.has_database |= listed(&DATABASE_MODULES, source, &package);
        }
        flags
    }
}

fn listed(modules: &[&str], source: &str, package: &str) -> bool {
    modules.contains(&source) || modules.contains(&package)
}

/// Original declaration left out of the generated capsule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDeclaration {
    pub name: String,
    pub target: FileKind,
    pub reason: String,
}

/// Original declarations carried into the generated files
#[derive(Debug, Clone, Default)]
pub struct PreservedDeclarations {
    /// Type aliases and enums, emitted into `types.ts`
    pub types: Vec<TypeInfo>,
    pub interfaces: Vec<InterfaceInfo>,
    pub errors: Vec<ErrorClassInfo>,
    pub constants: Vec<ConstantInfo>,
    /// Emitted into `utils.ts`, or listed as porting notes in manual mode
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    /// Module-level `let`/`var` state; travels with the functions
    pub variables: Vec<VariableInfo>,
    pub skipped: Vec<SkippedDeclaration>,
}

impl PreservedDeclarations {
    pub fn skipped_for(&self, target: FileKind) -> impl Iterator<Item = &SkippedDeclaration> {
        self.skipped.iter().filter(move |s| s.target == target)
    }

    /// Names of every preserved declaration, in emission order
    pub fn names(&self) -> Vec<&str> {
        self.types
            .iter()
            .map(|t| t.name.as_str())
            .chain(self.interfaces.iter().map(|i| i.name.as_str()))
            .chain(self.errors.iter().map(|e| e.name.as_str()))
            .chain(self.constants.iter().map(|c| c.name.as_str()))
            .chain(self.variables.iter().map(|v| v.name.as_str()))
            .chain(self.functions.iter().map(|f| f.name.as_str()))
            .chain(self.classes.iter().map(|c| c.name.as_str()))
            .collect()
    }
}

/// Everything a template needs; built once per generation call
#[derive(Debug, Clone)]
pub struct TemplateContext {
    pub metadata: CapsuleMetadata,
    pub class_name: String,
    pub package_name: String,
    pub has_file_system: bool,
    pub has_network: bool,
    pub has_database: bool,
    pub is_multi_platform: bool,
    pub mode: MigrationMode,
    pub complexity: ComplexityMetrics,
    pub error_kinds: Vec<ErrorKind>,
    /// External imports of the original sources
    pub imports: Vec<ImportInfo>,
    pub preserved: PreservedDeclarations,
    pub manual_actions: Vec<String>,
    pub generated_at: String,
}

impl TemplateContext {
    pub fn build(parsed: &ParsedCapsule, mode: MigrationMode, generated_at: DateTime<Utc>) -> Self {
        let flags = CapabilityFlags::from_imports(&parsed.analysis.imports);
        let class_name = class_name(&parsed.metadata.id);
        let kinds = error_kinds(flags);
        let reserved = reserved_names(&class_name, &kinds);
        let preserved = preserve_declarations(parsed, &reserved);
        let manual_actions = manual_actions(mode, parsed, flags, &preserved);

        Self {
            metadata: parsed.metadata.clone(),
            package_name: package_name(&parsed.metadata.id),
            class_name,
            has_file_system: flags.has_file_system,
            has_network: flags.has_network,
            has_database: flags.has_database,
            is_multi_platform: parsed.metadata.is_multi_platform(),
            mode,
            complexity: parsed.complexity.clone(),
            error_kinds: kinds,
            imports: parsed
                .analysis
                .imports
                .iter()
                .filter(|i| !i.is_relative())
                .cloned()
                .collect(),
            preserved,
            manual_actions,
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Primary platform of a single-platform capsule
    pub fn primary_platform(&self) -> Platform {
        self.metadata
            .platforms
            .first()
            .copied()
            .unwrap_or(Platform::Universal)
    }

    pub fn service_name(&self) -> String {
        format!("{}Service", self.class_name)
    }

    pub fn base_error_name(&self) -> String {
        format!("{}Error", self.class_name)
    }

    pub fn config_name(&self) -> String {
        format!("{}Config", self.class_name)
    }
}

/// Names the templates define; preserved declarations may not reuse them
pub fn reserved_names(class_name: &str, kinds: &[ErrorKind]) -> BTreeSet<String> {
    let fixed = [
        // types.ts
        "Platform",
        "ServiceState",
        "OperationResult",
        "PlatformCapabilities",
        "CapsuleInfo",
        // errors.ts
        "ErrorCode",
        "ErrorContext",
        // constants.ts
        "CAPSULE_ID",
        "CAPSULE_NAME",
        "CAPSULE_VERSION",
        "CAPSULE_CATEGORY",
        "SUPPORTED_PLATFORMS",
        "DEFAULT_TIMEOUT_MS",
        "DEFAULT_RETRY_ATTEMPTS",
        "DEFAULT_RETRY_DELAY_MS",
        "DEFAULT_CONFIG",
        // utils.ts
        "sleep",
        "withTimeout",
        "retry",
        "isPlainObject",
        "deepMerge",
        "formatDuration",
        // adapters.ts
        "PLATFORM",
        "CAPABILITIES",
        "LogLevel",
        "PlatformAdapter",
        "NodeAdapter",
        "WebAdapter",
        "UniversalAdapter",
        "selectAdapter",
        "detectPlatform",
        "getCapabilities",
        "isPlatformSupported",
        // index.ts
        "CAPSULE_METADATA",
    ];

    let mut names: BTreeSet<String> = fixed.iter().map(|n| n.to_string()).collect();
    names.extend(kinds.iter().map(|k| k.class_name.to_string()));
    for pattern in [
        "{}Config",
        "{}Error",
        "is{}Error",
        "to{}Error",
        "{}Service",
        "create{}",
        "create{}AndInitialize",
    ] {
        names.insert(pattern.replace("{}", class_name));
    }
    names
}

fn preserve_declarations(parsed: &ParsedCapsule, reserved: &BTreeSet<String>) -> PreservedDeclarations {
    let analysis = &parsed.analysis;
    let mut preserved = PreservedDeclarations::default();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    let mut admit = |name: &str, target: FileKind, skipped: &mut Vec<SkippedDeclaration>| {
        let reason = if reserved.contains(name) {
            "name is reserved by the generated capsule"
        } else if !seen.insert(name.to_string()) {
            "duplicate declaration name"
        } else {
            return true;
        };
        skipped.push(SkippedDeclaration {
            name: name.to_string(),
            target,
            reason: reason.to_string(),
        });
        false
    };

    for item in &analysis.types {
        if admit(&item.name, FileKind::Types, &mut preserved.skipped) {
            preserved.types.push(item.clone());
        }
    }
    for item in &analysis.interfaces {
        if admit(&item.name, FileKind::Types, &mut preserved.skipped) {
            preserved.interfaces.push(item.clone());
        }
    }
    for item in &analysis.errors {
        if admit(&item.name, FileKind::Errors, &mut preserved.skipped) {
            preserved.errors.push(item.clone());
        }
    }
    for item in &analysis.constants {
        if admit(&item.name, FileKind::Constants, &mut preserved.skipped) {
            preserved.constants.push(item.clone());
        }
    }
    for item in &analysis.variables {
        if admit(&item.name, FileKind::Utils, &mut preserved.skipped) {
            preserved.variables.push(item.clone());
        }
    }
    for item in &analysis.functions {
        if admit(&item.name, FileKind::Utils, &mut preserved.skipped) {
            preserved.functions.push(item.clone());
        }
    }

    let error_names: BTreeSet<&str> = analysis.errors.iter().map(|e| e.name.as_str()).collect();
    for item in analysis
        .classes
        .iter()
        .filter(|c| !error_names.contains(c.name.as_str()))
    {
        if admit(&item.name, FileKind::Utils, &mut preserved.skipped) {
            preserved.classes.push(item.clone());
        }
    }

    preserved
}

/// Follow-ups a human has to take care of after generation
pub fn manual_actions(
    mode: MigrationMode,
    parsed: &ParsedCapsule,
    flags: CapabilityFlags,
    preserved: &PreservedDeclarations,
) -> Vec<String> {
    let mut actions = Vec::new();

    match mode {
        MigrationMode::Auto => {}
        MigrationMode::Semi => {
            if !preserved.functions.is_empty() || !preserved.classes.is_empty() {
                actions.push(format!(
                    "Review {} preserved function(s) and {} class(es) in utils.ts for platform-specific behavior",
                    preserved.functions.len(),
                    preserved.classes.len()
                ));
            }
            actions.push("Wire original business logic into the service execute() operation".to_string());
        }
        MigrationMode::Manual => {
            for function in &preserved.functions {
                actions.push(format!(
                    "Port function {} ({}:{})",
                    function.name,
                    function.location.file.display(),
                    function.location.line
                ));
            }
            for class in &preserved.classes {
                actions.push(format!(
                    "Port class {} ({}:{})",
                    class.name,
                    class.location.file.display(),
                    class.location.line
                ));
            }
            for variable in &preserved.variables {
                actions.push(format!(
                    "Port module state {} ({}:{})",
                    variable.name,
                    variable.location.file.display(),
                    variable.location.line
                ));
            }
            actions.push("Implement the service lifecycle against the original capsule behavior".to_string());
        }
    }

    if mode != MigrationMode::Auto {
        if flags.has_database {
            actions.push("Verify database connection handling and map driver errors to DatabaseError".to_string());
        }
        if flags.has_network {
            actions.push("Map network failures to NetworkError and TimeoutError".to_string());
        }
        if parsed.complexity.cyclomatic_complexity > capsule_parser::mode::SEMI_MAX_COMPLEXITY {
            actions.push(format!(
                "Split high-complexity logic (cyclomatic complexity {})",
                parsed.complexity.cyclomatic_complexity
            ));
        }
    }

    for skipped in &preserved.skipped {
        actions.push(format!(
            "Resolve skipped declaration {} ({})",
            skipped.name, skipped.reason
        ));
    }

    actions
}
