//! Complexity and quality scoring
//!
//! Cyclomatic complexity is approximated by counting decision points in the
//! syntax tree. The maintainability index and migration-hour estimate are
//! simple heuristics layered on top of lines of code and complexity.

use tree_sitter::Node;

use crate::types::{CapsuleAnalysis, QualityMetrics};

/// Cyclomatic complexity of one file: 1 plus every decision point
pub fn cyclomatic_complexity(root: &Node, source: &str) -> u32 {
    let mut complexity: u32 = 1;
    count_decision_points(root, source, &mut complexity);
    complexity
}

fn count_decision_points(node: &Node, source: &str, complexity: &mut u32) {
    match node.kind() {
        "if_statement" | "ternary_expression" => *complexity += 1,
        "for_statement" | "for_in_statement" | "while_statement" | "do_statement" => {
            *complexity += 1
        }
        // `default:` is a separate `switch_default` node and does not count
        "switch_case" => *complexity += 1,
        "catch_clause" => *complexity += 1,
        "binary_expression" => {
            if is_short_circuit(node, source) {
                *complexity += 1;
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        count_decision_points(&child, source, complexity);
    }
}

fn is_short_circuit(node: &Node, source: &str) -> bool {
    node.child_by_field_name("operator")
        .and_then(|op| op.utf8_text(source.as_bytes()).ok())
        .map(|op| op == "&&" || op == "||")
        .unwrap_or(false)
}

/// Physical line count of a file
pub fn count_lines(source: &str) -> usize {
    source.lines().count()
}

/// `max(0, (171 - 5.2 ln(LOC) - 0.23 CC) * 100 / 171)`
///
/// LOC is floored at 1 so an empty capsule does not take `ln(0)`.
pub fn maintainability_index(lines_of_code: usize, cyclomatic_complexity: u32) -> f64 {
    let loc = lines_of_code.max(1) as f64;
    let raw = 171.0 - 5.2 * loc.ln() - 0.23 * f64::from(cyclomatic_complexity);
    (raw * 100.0 / 171.0).max(0.0)
}

/// Step-function estimate of migration effort in hours, one decimal
pub fn estimate_migration_hours(lines_of_code: usize, cyclomatic_complexity: u32) -> f64 {
    let mut hours = 1.0;

    hours += match lines_of_code {
        0..=199 => 0.5,
        200..=499 => 1.0,
        500..=999 => 2.0,
        _ => 4.0,
    };

    hours += match cyclomatic_complexity {
        0..=9 => 0.5,
        10..=29 => 1.0,
        _ => 2.0,
    };

    (hours * 10.0_f64).round() / 10.0
}

/// Existence checks; tests are never detected because nothing is executed
pub fn quality_metrics(analysis: &CapsuleAnalysis) -> QualityMetrics {
    let has_documentation = analysis.types.iter().any(|t| t.docs.is_some())
        || analysis.interfaces.iter().any(|i| i.docs.is_some())
        || analysis.classes.iter().any(|c| c.docs.is_some())
        || analysis.functions.iter().any(|f| f.docs.is_some())
        || analysis.constants.iter().any(|c| c.docs.is_some());

    QualityMetrics {
        has_types: !analysis.types.is_empty() || !analysis.interfaces.is_empty(),
        has_error_hierarchy: !analysis.errors.is_empty(),
        has_tests: false,
        has_documentation,
    }
}
