//! Worker registrations and what they put in the registry.

use std::sync::Arc;

use bindcheck_analysis::{RegistrationForm, Role};
use bindcheck_foundation::AnalysisConfig;
use bindcheck_program::{Declaration, Stmt, TypeId, Unit, UnitBuilder, Universe};

use crate::fixtures::{ACTIVITY_MODULE, Sdk, WORKFLOW_MODULE, analyze, execute_activity, messages, worker_call};

const APP: &str = "example.com/app";
const LIB: &str = "example.com/lib";

struct Program {
    universe: Universe,
    sdk: Sdk,
    activities: TypeId,
}

fn program() -> Program {
    let mut universe = Universe::new();
    let sdk = Sdk::declare(&mut universe);
    universe.add_func(APP, "Hello", sdk.activity_signature(&[sdk.string]));
    universe.add_func(APP, "Flow", sdk.workflow_signature(&[sdk.string]));
    universe.add_func(LIB, "Shared", sdk.activity_signature(&[sdk.string]));

    let empty = universe.types.structure(Vec::new());
    let activities = universe.types.named_with(APP, "Activities", empty);
    universe.types.pointer(activities);
    universe.add_method(activities, true, "Greet", sdk.activity_signature(&[sdk.string]));
    universe.add_method(activities, true, "Farewell", sdk.activity_signature(&[sdk.string]));
    universe.add_method(activities, true, "helper", sdk.activity_signature(&[sdk.string]));

    Program {
        universe,
        sdk,
        activities,
    }
}

/// A `main` function with `w` bound to a worker; `body` builds the statements.
fn unit_with(p: &Program, body: impl FnOnce(&mut UnitBuilder<'_>) -> Vec<Stmt>) -> Unit {
    let mut b = UnitBuilder::new(&p.universe, APP, "main.go");
    b.import(WORKFLOW_MODULE);
    b.import(ACTIVITY_MODULE);
    b.push_scope();
    b.var("w", p.sdk.worker);
    let stmts = body(&mut b);
    b.function("main", None, stmts);
    b.finish()
}

fn names<'a>(decls: impl IntoIterator<Item = &'a Arc<Declaration>>) -> Vec<&'a str> {
    decls.into_iter().map(|d| d.name.as_str()).collect()
}

#[test]
fn struct_pointer_registers_exported_methods() {
    let p = program();
    let unit = unit_with(&p, |b| {
        let lit = b.composite(None, p.activities, Vec::new());
        let target = b.addr(lit);
        vec![Stmt::Expr(worker_call(b, "w", "RegisterActivity", vec![target]))]
    });

    let (diagnostics, analysis) = analyze(&p.universe, &unit, &[], AnalysisConfig::new());
    assert!(diagnostics.is_empty());
    assert_eq!(names(analysis.registry.activities()), vec!["Greet", "Farewell"]);
    assert!(analysis.registry.workflows().is_empty());
    assert_eq!(analysis.registrations.len(), 2);
    assert!(
        analysis
            .registrations
            .iter()
            .all(|r| r.form == RegistrationForm::RegisterActivity && r.alias.is_none())
    );
}

#[test]
fn options_name_becomes_an_alias() {
    let p = program();
    let unit = unit_with(&p, |b| {
        let target = b.ident("Hello");
        let name = b.string("say-hello");
        let element = b.keyed("Name", name);
        let options = b.composite(None, p.sdk.activity_options, vec![element]);
        let register = worker_call(b, "w", "RegisterActivityWithOptions", vec![target, options]);

        let callee = b.string("say-hello");
        let arg = b.string("World");
        let call = execute_activity(b, callee, vec![arg]);
        let callee = b.string("say-hello");
        let arg = b.int(42);
        let wrong = execute_activity(b, callee, vec![arg]);
        vec![Stmt::Expr(register), Stmt::Expr(call), Stmt::Expr(wrong)]
    });

    let (diagnostics, analysis) = analyze(&p.universe, &unit, &[], AnalysisConfig::new());
    let alias = analysis.registry.alias("say-hello").expect("alias registered");
    assert_eq!(alias.module, APP);
    assert_eq!(names(analysis.registry.activities()), vec!["Hello", "say-hello"]);
    assert_eq!(analysis.registrations[0].alias.as_deref(), Some("say-hello"));

    assert_eq!(analysis.summary.resolved, 2);
    assert_eq!(
        messages(&diagnostics),
        vec![
            "Type of 1st argument to `say-hello` does not match the type of the workflow/activity: \
             expected string, got int"
        ]
    );
}

#[test]
fn options_on_a_struct_prefix_each_method() {
    let p = program();
    let unit = unit_with(&p, |b| {
        let lit = b.composite(None, p.activities, Vec::new());
        let target = b.addr(lit);
        let prefix = b.string("Acts.");
        let element = b.keyed("Name", prefix);
        let options = b.composite(None, p.sdk.activity_options, vec![element]);
        vec![Stmt::Expr(worker_call(
            b,
            "w",
            "RegisterActivityWithOptions",
            vec![target, options],
        ))]
    });

    let (_, analysis) = analyze(&p.universe, &unit, &[], AnalysisConfig::new());
    assert!(analysis.registry.alias("Acts.Greet").is_some());
    assert!(analysis.registry.alias("Acts.Farewell").is_some());
    assert!(analysis.registry.alias("Acts.helper").is_none());
    assert_eq!(analysis.registry.alias_count(), 2);
}

#[test]
fn options_of_the_wrong_type_give_no_alias() {
    let p = program();
    let unit = unit_with(&p, |b| {
        let target = b.ident("Flow");
        let name = b.string("flow-alias");
        let element = b.keyed("Name", name);
        // Activity options passed to a workflow registration.
        let options = b.composite(None, p.sdk.activity_options, vec![element]);
        vec![Stmt::Expr(worker_call(
            b,
            "w",
            "RegisterWorkflowWithOptions",
            vec![target, options],
        ))]
    });

    let (_, analysis) = analyze(&p.universe, &unit, &[], AnalysisConfig::new());
    assert_eq!(names(analysis.registry.workflows()), vec!["Flow"]);
    assert_eq!(analysis.registry.alias_count(), 0);
}

#[test]
fn workflow_options_alias_a_workflow() {
    let p = program();
    let unit = unit_with(&p, |b| {
        let target = b.ident("Flow");
        let name = b.string("flow-alias");
        let element = b.keyed("Name", name);
        let lit = b.composite(None, p.sdk.workflow_options, vec![element]);
        let options = b.addr(lit);
        vec![Stmt::Expr(worker_call(
            b,
            "w",
            "RegisterWorkflowWithOptions",
            vec![target, options],
        ))]
    });

    let (_, analysis) = analyze(&p.universe, &unit, &[], AnalysisConfig::new());
    let alias = analysis.registry.alias("flow-alias").expect("alias registered");
    assert_eq!(alias.name, "flow-alias");
    assert!(analysis.registry.lookup(Role::Workflow, "flow-alias").is_some());
    assert_eq!(analysis.registrations[0].role, Role::Workflow);
}

#[test]
fn repeated_registration_is_recorded_once() {
    let p = program();
    let unit = unit_with(&p, |b| {
        let first = b.ident("Hello");
        let second = b.ident("Hello");
        vec![
            Stmt::Expr(worker_call(b, "w", "RegisterActivity", vec![first])),
            Stmt::Expr(worker_call(b, "w", "RegisterActivity", vec![second])),
        ]
    });

    let (_, analysis) = analyze(&p.universe, &unit, &[], AnalysisConfig::new());
    assert_eq!(names(analysis.registry.activities()), vec!["Hello"]);
    assert_eq!(analysis.facts.len(), 1);
    assert_eq!(analysis.registrations.len(), 2);
}

#[test]
fn one_function_may_hold_both_roles() {
    let p = program();
    let unit = unit_with(&p, |b| {
        let first = b.ident("Hello");
        let second = b.ident("Hello");
        vec![
            Stmt::Expr(worker_call(b, "w", "RegisterActivity", vec![first])),
            Stmt::Expr(worker_call(b, "w", "RegisterWorkflow", vec![second])),
        ]
    });

    let (_, analysis) = analyze(&p.universe, &unit, &[], AnalysisConfig::new());
    let hello = &analysis.registry.activities()[0];
    let roles: Vec<Role> = analysis.facts.roles_of(hello.id).collect();
    assert_eq!(roles, vec![Role::Activity, Role::Workflow]);
}

#[test]
fn foreign_declaration_is_registered_without_a_fact() {
    let p = program();
    let shared = p
        .universe
        .decls()
        .find(|d| d.name == "Shared")
        .map(|d| d.id)
        .expect("declared");
    let unit = unit_with(&p, |b| {
        let target = b.func_ref(shared);
        vec![Stmt::Expr(worker_call(b, "w", "RegisterActivity", vec![target]))]
    });

    let (diagnostics, analysis) = analyze(&p.universe, &unit, &[], AnalysisConfig::new());
    assert!(diagnostics.is_empty());
    assert_eq!(names(analysis.registry.activities()), vec!["Shared"]);
    assert!(analysis.facts.is_empty());
    assert_eq!(analysis.registrations.len(), 1);
}

#[test]
fn calls_on_other_receivers_are_ignored() {
    let mut p = program();
    let iface = p.universe.types.interface(&["RegisterActivity"]);
    let impostor = p.universe.types.named_with(APP, "Registrar", iface);
    let unit = {
        let mut b = UnitBuilder::new(&p.universe, APP, "main.go");
        b.push_scope();
        b.var("r", impostor);
        let target = b.ident("Hello");
        let call = worker_call(&mut b, "r", "RegisterActivity", vec![target]);
        b.function("main", None, vec![Stmt::Expr(call)]);
        b.finish()
    };

    let (_, analysis) = analyze(&p.universe, &unit, &[], AnalysisConfig::new());
    assert!(analysis.registry.is_empty());
    assert!(analysis.registrations.is_empty());
}

#[test]
fn function_literal_is_not_registered() {
    let p = program();
    let unit = unit_with(&p, |b| {
        let lit = b.func_lit(Vec::new());
        vec![Stmt::Expr(worker_call(b, "w", "RegisterActivity", vec![lit]))]
    });

    let (diagnostics, analysis) = analyze(&p.universe, &unit, &[], AnalysisConfig::new());
    assert!(diagnostics.is_empty());
    assert!(analysis.registry.is_empty());
}
