//! Integration tests for diagnostics, positions, and configuration

use bindcheck_foundation::{
    AnalysisConfig, Category, Diagnostic, DiagnosticSink, Position, Span, ordinal,
};
use proptest::prelude::*;

// =============================================================================
// Positions
// =============================================================================

#[test]
fn position_display() {
    let pos = Span::at(12, 5).in_file("workflow.go");
    assert_eq!(pos.to_string(), "workflow.go:12:5");
}

#[test]
fn diagnostic_display_is_one_line() {
    let diag = Diagnostic::new(
        Position {
            file: "main.go".to_string(),
            line: 3,
            column: 9,
        },
        Category::ArgumentCount,
        "Too many arguments to `Greet` - expected 1, got 2",
    );
    let text = diag.to_string();
    assert_eq!(text, "main.go:3:9: Too many arguments to `Greet` - expected 1, got 2");
    assert!(!text.contains('\n'));
}

// =============================================================================
// Categories and Sinks
// =============================================================================

#[test]
fn only_trace_is_not_a_finding() {
    for category in [
        Category::ArgumentCount,
        Category::ArgumentType,
        Category::Serialization,
        Category::Unresolved,
        Category::Malformed,
    ] {
        assert!(category.is_finding(), "{category}");
    }
    assert!(!Category::Trace.is_finding());
}

#[test]
fn vec_sink_keeps_order() {
    let mut sink: Vec<Diagnostic> = Vec::new();
    for line in 1..=3 {
        sink.report(Diagnostic::new(
            Span::at(line, 1).in_file("a.go"),
            Category::Trace,
            format!("line {line}"),
        ));
    }
    let lines: Vec<u32> = sink.iter().map(|d| d.position.line).collect();
    assert_eq!(lines, vec![1, 2, 3]);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn strict_preset() {
    let config = AnalysisConfig::strict();
    assert!(config.report_unresolved);
    assert!(config.strict_pointer_match);
    assert!(!config.debug);
}

#[test]
fn builders_compose() {
    let config = AnalysisConfig::new()
        .with_debug(true)
        .with_report_unresolved(true);
    assert!(config.debug);
    assert!(config.report_unresolved);
    assert!(!config.strict_pointer_match);
}

// =============================================================================
// Ordinals
// =============================================================================

proptest! {
    #[test]
    fn ordinal_keeps_the_number(n in 1usize..10_000) {
        let text = ordinal(n);
        prop_assert!(text.starts_with(&n.to_string()));
        prop_assert_eq!(text.len(), n.to_string().len() + 2);
    }

    #[test]
    fn teens_always_take_th(hundreds in 0usize..100, teen in 11usize..=13) {
        let text = ordinal(hundreds * 100 + teen);
        prop_assert!(text.ends_with("th"));
    }
}
