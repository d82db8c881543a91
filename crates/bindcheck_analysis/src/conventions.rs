//! Roles, call forms, and the names that identify them.
//!
//! Registration and invocation forms are closed enums; everything that can
//! vary between SDK versions (type names, module paths, codec method names)
//! lives in [`Conventions`].

use std::fmt;

// =============================================================================
// Roles
// =============================================================================

/// The role a callable is registered under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    /// A workflow: orchestration code started through a client or a parent workflow.
    Workflow,
    /// An activity: a unit of work scheduled from a workflow.
    Activity,
}

impl Role {
    /// Returns the lower-case role name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workflow => "workflow",
            Self::Activity => "activity",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Registration Forms
// =============================================================================

/// The worker methods that register a callable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RegistrationForm {
    /// `worker.RegisterWorkflow(fn)`
    RegisterWorkflow,
    /// `worker.RegisterWorkflowWithOptions(fn, options)`
    RegisterWorkflowWithOptions,
    /// `worker.RegisterActivity(fn)`
    RegisterActivity,
    /// `worker.RegisterActivityWithOptions(fn, options)`
    RegisterActivityWithOptions,
}

impl RegistrationForm {
    /// Every registration form.
    pub const ALL: [Self; 4] = [
        Self::RegisterWorkflow,
        Self::RegisterWorkflowWithOptions,
        Self::RegisterActivity,
        Self::RegisterActivityWithOptions,
    ];

    /// Returns the method name that selects this form.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::RegisterWorkflow => "RegisterWorkflow",
            Self::RegisterWorkflowWithOptions => "RegisterWorkflowWithOptions",
            Self::RegisterActivity => "RegisterActivity",
            Self::RegisterActivityWithOptions => "RegisterActivityWithOptions",
        }
    }

    /// Returns the role this form registers under.
    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::RegisterWorkflow | Self::RegisterWorkflowWithOptions => Role::Workflow,
            Self::RegisterActivity | Self::RegisterActivityWithOptions => Role::Activity,
        }
    }

    /// Returns true if the form takes an options value as its second argument.
    #[must_use]
    pub const fn has_options(self) -> bool {
        matches!(
            self,
            Self::RegisterWorkflowWithOptions | Self::RegisterActivityWithOptions
        )
    }

    /// Looks up the form for a method name.
    #[must_use]
    pub fn from_selector(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.selector() == name)
    }
}

impl fmt::Display for RegistrationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

// =============================================================================
// Invocation Forms
// =============================================================================

/// What an invocation is called on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Receiver {
    /// A value of the client type.
    Client,
    /// The imported workflow module.
    WorkflowModule,
}

/// The calls that invoke a registered callable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InvocationForm {
    /// `client.ExecuteWorkflow(ctx, options, callee, args...)`
    ExecuteWorkflow,
    /// `workflow.ExecuteActivity(ctx, callee, args...)`
    ExecuteActivity,
    /// `workflow.ExecuteLocalActivity(ctx, callee, args...)`
    ExecuteLocalActivity,
    /// `workflow.ExecuteChildWorkflow(ctx, callee, args...)`
    ExecuteChildWorkflow,
}

impl InvocationForm {
    /// Every invocation form.
    pub const ALL: [Self; 4] = [
        Self::ExecuteWorkflow,
        Self::ExecuteActivity,
        Self::ExecuteLocalActivity,
        Self::ExecuteChildWorkflow,
    ];

    /// Returns the method name that selects this form.
    #[must_use]
    pub const fn selector(self) -> &'static str {
        match self {
            Self::ExecuteWorkflow => "ExecuteWorkflow",
            Self::ExecuteActivity => "ExecuteActivity",
            Self::ExecuteLocalActivity => "ExecuteLocalActivity",
            Self::ExecuteChildWorkflow => "ExecuteChildWorkflow",
        }
    }

    /// Returns the role of the callables this form invokes.
    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::ExecuteWorkflow | Self::ExecuteChildWorkflow => Role::Workflow,
            Self::ExecuteActivity | Self::ExecuteLocalActivity => Role::Activity,
        }
    }

    /// Returns what the form is called on.
    #[must_use]
    pub const fn receiver(self) -> Receiver {
        match self {
            Self::ExecuteWorkflow => Receiver::Client,
            Self::ExecuteActivity | Self::ExecuteLocalActivity | Self::ExecuteChildWorkflow => {
                Receiver::WorkflowModule
            }
        }
    }

    /// Index of the callee among the call's arguments.
    ///
    /// Client calls take a context and start options before the callee;
    /// module calls take only the context.
    #[must_use]
    pub const fn callee_index(self) -> usize {
        match self.receiver() {
            Receiver::Client => 2,
            Receiver::WorkflowModule => 1,
        }
    }

    /// Index of the first argument forwarded to the callee.
    #[must_use]
    pub const fn first_arg_index(self) -> usize {
        self.callee_index() + 1
    }

    /// The fewest arguments a well-formed call can have.
    #[must_use]
    pub const fn min_args(self) -> usize {
        self.callee_index() + 1
    }

    /// Looks up the form for a method name.
    #[must_use]
    pub fn from_selector(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.selector() == name)
    }
}

impl fmt::Display for InvocationForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.selector())
    }
}

// =============================================================================
// Conventions
// =============================================================================

/// Names that identify workers, clients, options, and self-encoding types.
///
/// Type names are qualified (`module/path.Name`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conventions {
    /// The worker type registrations are called on.
    pub worker_type: String,
    /// The client type workflows are started through.
    pub client_type: String,
    /// Path of the module whose functions schedule activities and child workflows.
    pub workflow_module: String,
    /// Options type accepted by `RegisterWorkflowWithOptions`.
    pub workflow_options_type: String,
    /// Options type accepted by `RegisterActivityWithOptions`.
    pub activity_options_type: String,
    /// Options field holding the registration name.
    pub alias_field: String,
    /// Methods that make a type encode itself.
    pub codec_methods: Vec<String>,
    /// Methods that mark a type as a protocol message.
    pub message_markers: Vec<String>,
    /// Struct tag key consulted for field encoding.
    pub skip_tag_key: String,
    /// Tag value that drops a field from the encoding.
    pub skip_tag_value: String,
}

impl Default for Conventions {
    fn default() -> Self {
        Self::temporal()
    }
}

impl Conventions {
    /// The Temporal Go SDK names.
    #[must_use]
    pub fn temporal() -> Self {
        Self {
            worker_type: "go.temporal.io/sdk/worker.Worker".to_string(),
            client_type: "go.temporal.io/sdk/client.Client".to_string(),
            workflow_module: "go.temporal.io/sdk/workflow".to_string(),
            workflow_options_type: "go.temporal.io/sdk/workflow.RegisterOptions".to_string(),
            activity_options_type: "go.temporal.io/sdk/activity.RegisterOptions".to_string(),
            alias_field: "Name".to_string(),
            codec_methods: vec!["MarshalJSON".to_string()],
            message_markers: vec!["ProtoReflect".to_string()],
            skip_tag_key: "json".to_string(),
            skip_tag_value: "-".to_string(),
        }
    }

    /// Builder method to set the worker type.
    #[must_use]
    pub fn with_worker_type(mut self, name: impl Into<String>) -> Self {
        self.worker_type = name.into();
        self
    }

    /// Builder method to set the client type.
    #[must_use]
    pub fn with_client_type(mut self, name: impl Into<String>) -> Self {
        self.client_type = name.into();
        self
    }

    /// Builder method to set the workflow module path.
    #[must_use]
    pub fn with_workflow_module(mut self, path: impl Into<String>) -> Self {
        self.workflow_module = path.into();
        self
    }

    /// Builder method to add a codec method name.
    #[must_use]
    pub fn with_codec_method(mut self, name: impl Into<String>) -> Self {
        self.codec_methods.push(name.into());
        self
    }

    /// Returns the options type accepted by a registration form.
    #[must_use]
    pub fn options_type(&self, form: RegistrationForm) -> Option<&str> {
        match form {
            RegistrationForm::RegisterWorkflowWithOptions => Some(&self.workflow_options_type),
            RegistrationForm::RegisterActivityWithOptions => Some(&self.activity_options_type),
            RegistrationForm::RegisterWorkflow | RegistrationForm::RegisterActivity => None,
        }
    }

    /// Returns true if a method with this name makes its type self-encoding.
    #[must_use]
    pub fn is_codec_method(&self, name: &str) -> bool {
        self.codec_methods
            .iter()
            .chain(&self.message_markers)
            .any(|m| m == name)
    }
}
