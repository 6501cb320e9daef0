//! Command tree supplied by the host: leaves pair parameter lists with dispatch handlers,
//! groups nest subcommands under shared group-level parameters.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::spec::ParameterSpec;

/// Parameter value rejected by the underlying parser or command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Human-readable message.
    pub message: String,
    /// Offending parameter name, when the parser attributes the failure.
    pub parameter: Option<String>,
}

impl ValidationError {
    /// Creates a validation error with no attributed parameter.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            parameter: None,
        }
    }

    /// Creates a validation error attributed to one parameter.
    pub fn for_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            parameter: Some(parameter.into()),
        }
    }
}

/// Same-thread completion callback for deferred dispatch results.
pub type DispatchDone = Rc<dyn Fn(Result<(), ValidationError>)>;

/// One dispatch request: the synthesized token vector plus the completion callback a
/// deferring handler must eventually invoke on the same thread.
pub struct RunRequest {
    /// Full token vector for this invocation.
    pub tokens: Vec<String>,
    /// Completion callback; required only when the handler returns
    /// [`DispatchOutcome::Pending`].
    pub done: DispatchDone,
}

/// How a dispatch handler concluded.
pub enum DispatchOutcome {
    /// The handler ran synchronously and this is its result.
    Ready(Result<(), ValidationError>),
    /// The handler will complete later through [`RunRequest::done`].
    Pending,
}

/// Dispatch handler attached to one leaf command.
pub type RunHandler = Rc<dyn Fn(RunRequest) -> DispatchOutcome>;

/// Leaf command: an ordered parameter list plus its dispatch handler.
#[derive(Clone)]
pub struct CommandLeaf {
    /// Command name, the first token of its invocations.
    pub name: String,
    /// Parameters in declaration order.
    pub params: Vec<ParameterSpec>,
    /// Dispatch handler receiving the synthesized token vector.
    pub run: RunHandler,
}

/// Group command: shared group-level parameters plus ordered subcommands.
#[derive(Clone)]
pub struct CommandGroup {
    /// Group name, prefixed to every subcommand invocation.
    pub name: String,
    /// Group-level parameters, e.g. global flags.
    pub params: Vec<ParameterSpec>,
    /// Subcommands in declaration order.
    pub children: Vec<CommandNode>,
}

/// One node of the host-supplied command tree. Read-only once constructed.
#[derive(Clone)]
pub enum CommandNode {
    /// Directly runnable command.
    Leaf(CommandLeaf),
    /// Subcommand group rendered as parallel tab panels.
    Group(CommandGroup),
}

impl CommandNode {
    /// Name of this node.
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf(leaf) => &leaf.name,
            Self::Group(group) => &group.name,
        }
    }
}

/// Submission state of one command form controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SubmitPhase {
    /// Widgets editable, no dispatch in flight.
    #[default]
    Idle,
    /// A dispatch is in flight; further submits are ignored until it resolves.
    Submitting,
}

/// Event emitted onto a controller's reactive event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FormEvent {
    /// A submit synthesized tokens and handed them to the dispatch handler.
    Started {
        /// Monotonic submission counter for this controller.
        submission: u64,
        /// Synthesized token vector.
        tokens: Vec<String>,
    },
    /// The dispatch handler completed without a validation failure.
    Succeeded {
        /// Submission this completion belongs to.
        submission: u64,
    },
    /// The dispatch handler reported a validation failure.
    Failed {
        /// Submission this completion belongs to.
        submission: u64,
        /// Reported failure.
        error: ValidationError,
    },
    /// A completion arrived for a submission that is no longer current.
    CompletionDiscarded {
        /// Stale submission number.
        submission: u64,
    },
}
