//! Shared program fixtures: the Temporal SDK surface and analysis helpers.

use bindcheck_analysis::{Analyzer, Registry, UnitAnalysis};
use bindcheck_foundation::{AnalysisConfig, Diagnostic};
use bindcheck_program::{
    BasicKind, Expr, Field, Signature, TypeId, Unit, UnitBuilder, Universe,
};

pub const WORKFLOW_MODULE: &str = "go.temporal.io/sdk/workflow";
pub const ACTIVITY_MODULE: &str = "go.temporal.io/sdk/activity";

/// The SDK and builtin types tests refer to.
#[derive(Clone, Copy)]
pub struct Sdk {
    pub worker: TypeId,
    pub client: TypeId,
    pub context: TypeId,
    pub workflow_context: TypeId,
    pub activity_options: TypeId,
    pub workflow_options: TypeId,
    pub start_options: TypeId,
    pub string: TypeId,
    pub int: TypeId,
    pub float64: TypeId,
    pub error: TypeId,
}

impl Sdk {
    /// Declares the SDK types in `universe`.
    pub fn declare(universe: &mut Universe) -> Self {
        let t = &mut universe.types;
        let string = t.basic(BasicKind::String);
        let int = t.basic(BasicKind::Int);
        let float64 = t.basic(BasicKind::Float64);
        let error_iface = t.interface(&["Error"]);
        let error = t.named_with("", "error", error_iface);

        let worker_iface = t.interface(&["RegisterWorkflow", "RegisterActivity"]);
        let worker = t.named_with("go.temporal.io/sdk/worker", "Worker", worker_iface);
        let client_iface = t.interface(&["ExecuteWorkflow"]);
        let client = t.named_with("go.temporal.io/sdk/client", "Client", client_iface);
        let start_body = t.structure(vec![Field::new("ID", string)]);
        let start_options =
            t.named_with("go.temporal.io/sdk/client", "StartWorkflowOptions", start_body);

        let ctx_iface = t.interface(&["Deadline", "Done", "Err", "Value"]);
        let context = t.named_with("context", "Context", ctx_iface);
        let wf_ctx_iface = t.interface(&["Done", "Err", "Value"]);
        let workflow_context = t.named_with(WORKFLOW_MODULE, "Context", wf_ctx_iface);

        let options_body = t.structure(vec![Field::new("Name", string)]);
        let activity_options = t.named_with(ACTIVITY_MODULE, "RegisterOptions", options_body);
        t.pointer(activity_options);
        let workflow_options = t.named_with(WORKFLOW_MODULE, "RegisterOptions", options_body);
        t.pointer(workflow_options);

        Self {
            worker,
            client,
            context,
            workflow_context,
            activity_options,
            workflow_options,
            start_options,
            string,
            int,
            float64,
            error,
        }
    }

    /// `func(ctx, params...) (string, error)`
    pub fn activity_signature(&self, params: &[TypeId]) -> Signature {
        let mut all = vec![self.context];
        all.extend_from_slice(params);
        Signature {
            params: all,
            results: vec![self.string, self.error],
            variadic: false,
        }
    }

    /// `func(workflow.Context, params...) (string, error)`
    pub fn workflow_signature(&self, params: &[TypeId]) -> Signature {
        let mut all = vec![self.workflow_context];
        all.extend_from_slice(params);
        Signature {
            params: all,
            results: vec![self.string, self.error],
            variadic: false,
        }
    }
}

/// `workflow.<method>(ctx, callee, args...)`
pub fn module_call(b: &mut UnitBuilder<'_>, method: &str, callee: Expr, args: Vec<Expr>) -> Expr {
    let wf = b.ident("workflow");
    let sel = b.selector(wf, method);
    let ctx = b.ident("ctx");
    let mut all = vec![ctx, callee];
    all.extend(args);
    b.call(sel, all)
}

/// `workflow.ExecuteActivity(ctx, callee, args...)`
pub fn execute_activity(b: &mut UnitBuilder<'_>, callee: Expr, args: Vec<Expr>) -> Expr {
    module_call(b, "ExecuteActivity", callee, args)
}

/// `<worker>.<method>(args...)`
pub fn worker_call(b: &mut UnitBuilder<'_>, worker: &str, method: &str, args: Vec<Expr>) -> Expr {
    let w = b.ident(worker);
    let sel = b.selector(w, method);
    b.call(sel, args)
}

/// Analyzes one unit and returns its diagnostics alongside the result.
pub fn analyze(
    universe: &Universe,
    unit: &Unit,
    dependencies: &[&Registry],
    config: AnalysisConfig,
) -> (Vec<Diagnostic>, UnitAnalysis) {
    let mut diagnostics = Vec::new();
    let analysis = Analyzer::new(config).analyze(universe, unit, dependencies, &mut diagnostics);
    (diagnostics, analysis)
}

/// Messages of every non-trace diagnostic.
pub fn messages(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics
        .iter()
        .filter(|d| d.category.is_finding())
        .map(|d| d.message.clone())
        .collect()
}
