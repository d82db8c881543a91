//! Properties of the binding checks, plus the reference scenarios.

use bindcheck_analysis::{Conventions, Reason, SerializabilityChecker};
use bindcheck_foundation::{AnalysisConfig, Category, Diagnostic};
use bindcheck_program::{
    BasicKind, DeclId, Field, Signature, Stmt, TypeId, UnitBuilder, Universe,
};
use proptest::prelude::*;

use crate::fixtures::{Sdk, WORKFLOW_MODULE, analyze, execute_activity};

const APP: &str = "example.com/app";

// =============================================================================
// Helpers
// =============================================================================

fn universe() -> (Universe, Sdk) {
    let mut universe = Universe::new();
    let sdk = Sdk::declare(&mut universe);
    (universe, sdk)
}

fn declare(universe: &mut Universe, sdk: &Sdk, params: &[TypeId], variadic: bool) -> DeclId {
    let mut signature = sdk.activity_signature(params);
    signature.variadic = variadic;
    universe.add_func(APP, "Target", signature)
}

/// `workflow.ExecuteActivity(ctx, Target, a0, a1, ...)` with `ai` typed `args[i]`.
fn check_call(
    universe: &Universe,
    target: DeclId,
    args: &[TypeId],
    config: AnalysisConfig,
) -> Vec<Diagnostic> {
    let mut b = UnitBuilder::new(universe, APP, "wf.go");
    b.import(WORKFLOW_MODULE);
    b.push_scope();
    for (i, ty) in args.iter().enumerate() {
        b.var(format!("a{i}"), *ty);
    }
    let callee = b.func_ref(target);
    let exprs = (0..args.len()).map(|i| b.ident(&format!("a{i}"))).collect();
    let call = execute_activity(&mut b, callee, exprs);
    b.function("Wf", None, vec![Stmt::Expr(call)]);
    let unit = b.finish();
    analyze(universe, &unit, &[], config).0
}

fn count(diagnostics: &[Diagnostic], category: Category) -> usize {
    diagnostics.iter().filter(|d| d.category == category).count()
}

fn basic_kind() -> impl Strategy<Value = BasicKind> {
    prop::sample::select(vec![
        BasicKind::Bool,
        BasicKind::Int,
        BasicKind::Int64,
        BasicKind::Float64,
        BasicKind::String,
    ])
}

// =============================================================================
// Count and Type Properties
// =============================================================================

proptest! {
    #[test]
    fn identical_arguments_produce_nothing(kinds in prop::collection::vec(basic_kind(), 1..6)) {
        let (mut u, sdk) = universe();
        let params: Vec<TypeId> = kinds.iter().map(|k| u.types.basic(*k)).collect();
        let target = declare(&mut u, &sdk, &params, false);
        let diagnostics = check_call(&u, target, &params, AnalysisConfig::strict());
        prop_assert!(diagnostics.is_empty(), "{:?}", diagnostics);
    }

    #[test]
    fn surplus_arguments_produce_one_count_finding(
        kinds in prop::collection::vec(basic_kind(), 1..5),
        extra in 1usize..4,
    ) {
        let (mut u, sdk) = universe();
        let params: Vec<TypeId> = kinds.iter().map(|k| u.types.basic(*k)).collect();
        let target = declare(&mut u, &sdk, &params, false);
        let mut args = params.clone();
        args.extend(std::iter::repeat_n(sdk.string, extra));

        let diagnostics = check_call(&u, target, &args, AnalysisConfig::new());
        prop_assert_eq!(diagnostics.len(), 1);
        prop_assert_eq!(count(&diagnostics, Category::ArgumentCount), 1);
        prop_assert!(diagnostics[0].message.starts_with("Too many arguments"));
    }

    #[test]
    fn missing_arguments_produce_one_count_finding(
        kinds in prop::collection::vec(basic_kind(), 1..5),
        missing in 1usize..5,
    ) {
        let missing = missing.min(kinds.len());
        let (mut u, sdk) = universe();
        let params: Vec<TypeId> = kinds.iter().map(|k| u.types.basic(*k)).collect();
        let target = declare(&mut u, &sdk, &params, false);
        let args = &params[..params.len() - missing];

        let diagnostics = check_call(&u, target, args, AnalysisConfig::new());
        prop_assert_eq!(diagnostics.len(), 1);
        prop_assert!(diagnostics[0].message.starts_with("Too few arguments"));
    }

    #[test]
    fn pointer_and_value_are_interchangeable_unless_strict(
        kind in basic_kind(),
        use_struct in any::<bool>(),
        pointer_param in any::<bool>(),
    ) {
        let (mut u, sdk) = universe();
        let value = if use_struct {
            let body = u.types.structure(vec![Field::new("Name", sdk.string)]);
            u.types.named_with(APP, "Payload", body)
        } else {
            u.types.basic(kind)
        };
        let pointer = u.types.pointer(value);
        let (param, arg) = if pointer_param { (pointer, value) } else { (value, pointer) };
        let target = declare(&mut u, &sdk, &[param], false);

        let relaxed = check_call(&u, target, &[arg], AnalysisConfig::new());
        prop_assert_eq!(count(&relaxed, Category::ArgumentType), 0);

        let strict = check_call(&u, target, &[arg], AnalysisConfig::new().with_strict_pointer_match(true));
        prop_assert_eq!(count(&strict, Category::ArgumentType), 1);
    }
}

// =============================================================================
// Serializability Properties
// =============================================================================

fn build_fields(u: &mut Universe, specs: &[(usize, bool, u8, u8)]) -> Vec<Field> {
    let string = u.types.basic(BasicKind::String);
    let int = u.types.basic(BasicKind::Int);
    let chan = u.types.chan(int);
    specs
        .iter()
        .map(|&(index, exported, tag, ty)| {
            let name = if exported { format!("F{index}") } else { format!("f{index}") };
            let ty = match ty {
                0 => string,
                1 => int,
                _ => chan,
            };
            let field = Field::new(name, ty);
            match tag {
                0 => field,
                1 => field.with_tag(r#"json:"-""#),
                _ => field.with_tag(format!(r#"json:"field{index}""#)),
            }
        })
        .collect()
}

fn field_specs() -> impl Strategy<Value = (Vec<(usize, bool, u8, u8)>, Vec<(usize, bool, u8, u8)>)> {
    prop::collection::vec((any::<bool>(), 0u8..3, 0u8..3), 1..7).prop_flat_map(|raw| {
        let specs: Vec<(usize, bool, u8, u8)> = raw
            .into_iter()
            .enumerate()
            .map(|(i, (exported, tag, ty))| (i, exported, tag, ty))
            .collect();
        (Just(specs.clone()), Just(specs).prop_shuffle())
    })
}

proptest! {
    #[test]
    fn verdict_ignores_field_order((original, shuffled) in field_specs()) {
        let mut u = Universe::new();
        let a = build_fields(&mut u, &original);
        let b = build_fields(&mut u, &shuffled);
        let a = u.types.structure(a);
        let b = u.types.structure(b);

        let conventions = Conventions::default();
        let checker = SerializabilityChecker::new(&u.types, &conventions);
        let first = checker.check(a);
        prop_assert_eq!(&first, &checker.check(a));
        prop_assert_eq!(first.is_serializable(), checker.check(b).is_serializable());
    }

    #[test]
    fn unexported_field_is_named(name in "[a-z][a-zA-Z0-9]{0,8}") {
        let mut u = Universe::new();
        let string = u.types.basic(BasicKind::String);
        let body = u.types.structure(vec![Field::new(name.clone(), string)]);

        let conventions = Conventions::default();
        let verdict = SerializabilityChecker::new(&u.types, &conventions).check(body);
        let violation = verdict.violation().expect("not serializable");
        prop_assert_eq!(&violation.path, &vec![name]);
        prop_assert_eq!(&violation.reason, &Reason::Unexported);
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_matching_call_is_clean() {
    let (mut u, sdk) = universe();
    let f = u.add_func(APP, "f", sdk.activity_signature(&[sdk.string]));

    let mut b = UnitBuilder::new(&u, APP, "wf.go");
    b.import(WORKFLOW_MODULE);
    let callee = b.func_ref(f);
    let world = b.string("World");
    let call = execute_activity(&mut b, callee, vec![world]);
    b.function("Wf", None, vec![Stmt::Expr(call)]);
    let unit = b.finish();

    let (diagnostics, _) = analyze(&u, &unit, &[], AnalysisConfig::new());
    assert!(diagnostics.is_empty());
}

#[test]
fn scenario_private_field_is_reported_once() {
    let (mut u, sdk) = universe();
    let body = u.types.structure(vec![Field::new("private", sdk.string)]);
    let with_private = u.types.named_with(APP, "StructWithPrivateField", body);
    let g = u.add_func(APP, "g", sdk.activity_signature(&[with_private]));

    let mut b = UnitBuilder::new(&u, APP, "wf.go");
    b.import(WORKFLOW_MODULE);
    let callee = b.func_ref(g);
    let ty = b.ident("StructWithPrivateField");
    let x = b.string("x");
    let element = b.keyed("private", x);
    let lit = b.composite(Some(ty), with_private, vec![element]);
    let call = execute_activity(&mut b, callee, vec![lit]);
    b.function("Wf", None, vec![Stmt::Expr(call)]);
    let unit = b.finish();

    let (diagnostics, _) = analyze(&u, &unit, &[], AnalysisConfig::new());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].category, Category::Serialization);
    assert!(diagnostics[0].message.contains("field `private`"));
    assert!(diagnostics[0].message.contains("not exported"));
}

#[test]
fn scenario_float_in_variadic_tail() {
    let (mut u, sdk) = universe();
    let strings = u.types.slice(sdk.string);
    let h = declare(&mut u, &sdk, &[sdk.string, strings], true);

    let mut b = UnitBuilder::new(&u, APP, "wf.go");
    b.import(WORKFLOW_MODULE);
    let callee = b.func_ref(h);
    let args = vec![b.string(","), b.string("a"), b.float("1.5")];
    let call = execute_activity(&mut b, callee, args);
    b.function("Wf", None, vec![Stmt::Expr(call)]);
    let unit = b.finish();

    let (diagnostics, _) = analyze(&u, &unit, &[], AnalysisConfig::new());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "Type of 3rd argument to `Target` does not match the type of the workflow/activity: \
         expected string, got float64"
    );
}

#[test]
fn scenario_unknown_name_depends_on_the_flag() {
    let (u, _) = universe();
    let mut b = UnitBuilder::new(&u, APP, "wf.go");
    b.import(WORKFLOW_MODULE);
    let callee = b.string("f");
    let call = execute_activity(&mut b, callee, Vec::new());
    b.function("Wf", None, vec![Stmt::Expr(call)]);
    let unit = b.finish();

    let (quiet, _) = analyze(&u, &unit, &[], AnalysisConfig::new());
    assert!(quiet.is_empty());

    let (loud, _) = analyze(
        &u,
        &unit,
        &[],
        AnalysisConfig::new().with_report_unresolved(true),
    );
    assert_eq!(loud.len(), 1);
    assert_eq!(loud[0].category, Category::Unresolved);
    assert!(loud[0].message.starts_with("Could not resolve"));
}

#[test]
fn signature_helper_matches_declared_shape() {
    let (_, sdk) = universe();
    let sig: Signature = sdk.activity_signature(&[sdk.int]);
    assert_eq!(sig.params, vec![sdk.context, sdk.int]);
    assert!(!sig.variadic);
}

#[test]
fn scenario_undescribed_argument_type_is_skipped() {
    let (mut u, sdk) = universe();
    let opaque = u.types.named("time", "Time");
    let target = declare(&mut u, &sdk, &[opaque], false);

    let diagnostics = check_call(&u, target, &[opaque], AnalysisConfig::new());
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}
