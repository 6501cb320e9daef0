//! Shared contracts between command-tree providers, the form engine, and widget toolkits.
//!
//! This crate is intentionally toolkit-agnostic. It defines parameter specifications, the
//! command tree, dispatch handler types, and the widget-toolkit trait seam without depending
//! on any concrete rendering stack. Live callables (command handlers, custom widget
//! factories, change listeners) are `Rc<dyn Fn>` aliases paired with the plain-data
//! specifications; everything without a callable inside derives serde.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod spec;
mod toolkit;
mod tree;

pub use spec::{Arity, ParamDefault, ParamKind, ParameterSpec, PathConstraints};
pub use toolkit::{
    ChangeListener, CheckboxHandle, CheckboxOptions, ChoiceHandle, ChoiceOptions, ControlHandle,
    CustomWidgetFactory, FormSurface, ParameterRowOptions, PathEntryOptions, ReadBack,
    SliderHandle, SliderOptions, SlotCommitListener, SlotListHandle, SlotListOptions,
    SlotRowView, SlotSelectionListener, StepperHandle, StepperOptions, TextEntryHandle,
    TextEntryOptions, TextValidator, WidgetBinding, WidgetBuildRequest, WidgetToolkit,
};
pub use tree::{
    CommandGroup, CommandLeaf, CommandNode, DispatchDone, DispatchOutcome, FormEvent,
    RunHandler, RunRequest, SubmitPhase, ValidationError,
};
