//! Widget-toolkit trait seam: the primitive controls a host toolkit must supply, plus the
//! live widget bindings the form engine hands back.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::spec::{ParameterSpec, PathConstraints};
use crate::tree::ValidationError;

/// Advisory keystroke validator attached to text entries. Receives the candidate text after
/// a keystroke and returns whether the control should accept it.
pub type TextValidator = Rc<dyn Fn(&str) -> bool>;

/// Change-notification callback attachable to any control.
pub type ChangeListener = Rc<dyn Fn()>;

/// Listener invoked when one slot's text is committed by the user.
pub type SlotCommitListener = Rc<dyn Fn(usize, &str)>;

/// Listener invoked with the currently selected row indices of a slot list.
pub type SlotSelectionListener = Rc<dyn Fn(&[usize])>;

/// Construction options for a text entry control.
#[derive(Clone, Default)]
pub struct TextEntryOptions {
    /// Ghost text shown while the entry is empty.
    pub placeholder: String,
    /// Initial contents, applied without validator involvement.
    pub initial: Option<String>,
    /// Whether input echoes as password dots.
    pub masked: bool,
    /// Optional keystroke validator.
    pub validator: Option<TextValidator>,
    /// Optional change listener.
    pub on_change: Option<ChangeListener>,
}

/// Construction options for a path entry with a file/directory picker affordance.
#[derive(Clone, Default)]
pub struct PathEntryOptions {
    /// Underlying text-entry options.
    pub text: TextEntryOptions,
    /// Picker constraints.
    pub constraints: PathConstraints,
}

/// Construction options for a checkbox.
#[derive(Clone, Default)]
pub struct CheckboxOptions {
    /// Checkbox caption.
    pub label: String,
    /// Initial checked state.
    pub checked: bool,
    /// Tooltip text.
    pub help: String,
    /// Optional change listener.
    pub on_change: Option<ChangeListener>,
}

/// Construction options for a bounded horizontal slider.
#[derive(Clone)]
pub struct SliderOptions {
    /// Inclusive lower bound.
    pub min: i64,
    /// Inclusive upper bound.
    pub max: i64,
    /// Initial value, already clamped by the caller.
    pub initial: i64,
    /// Optional change listener.
    pub on_change: Option<ChangeListener>,
}

/// Construction options for a bounded numeric stepper.
#[derive(Clone)]
pub struct StepperOptions {
    /// Inclusive lower bound.
    pub min: u32,
    /// Inclusive upper bound.
    pub max: u32,
    /// Initial value.
    pub initial: u32,
    /// Optional change listener.
    pub on_change: Option<ChangeListener>,
}

/// Construction options for a single-selection control.
#[derive(Clone, Default)]
pub struct ChoiceOptions {
    /// Permitted values, in display order.
    pub options: Vec<String>,
    /// Initially selected value.
    pub selected: String,
    /// Optional change listener.
    pub on_change: Option<ChangeListener>,
}

/// Render state for one row of a slot list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRowView {
    /// Current slot text; empty for unset slots.
    pub text: String,
    /// Ghost text shown while the slot is unset, the slot type's display name.
    pub ghost: String,
    /// Whether the row renders in the muted placeholder style.
    pub muted: bool,
}

/// Construction options for an ordered slot list view.
#[derive(Clone, Default)]
pub struct SlotListOptions {
    /// Initial row render states.
    pub rows: Vec<SlotRowView>,
    /// Whether the user may insert and remove rows (variadic editors only).
    pub mutable_rows: bool,
    /// Invoked when a row's text is committed.
    pub on_commit: Option<SlotCommitListener>,
    /// Invoked when the user requests a row insertion after each selected row.
    pub on_insert: Option<SlotSelectionListener>,
    /// Invoked when the user requests removal of each selected row.
    pub on_remove: Option<SlotSelectionListener>,
}

/// Common surface of every live control handle.
pub trait ControlHandle {
    /// Stable token naming the control kind, for recording and debugging hooks.
    fn kind_token(&self) -> &'static str;
}

/// Live text entry control.
pub trait TextEntryHandle: ControlHandle {
    /// Current entry contents.
    fn text(&self) -> String;
    /// Replaces the entry contents programmatically.
    fn set_text(&self, text: &str);
}

/// Live checkbox control.
pub trait CheckboxHandle: ControlHandle {
    /// Current checked state.
    fn checked(&self) -> bool;
    /// Sets the checked state programmatically.
    fn set_checked(&self, checked: bool);
}

/// Live bounded slider control.
pub trait SliderHandle: ControlHandle {
    /// Current slider value.
    fn value(&self) -> i64;
    /// Sets the slider value, clamped to its bounds.
    fn set_value(&self, value: i64);
}

/// Live bounded stepper control.
pub trait StepperHandle: ControlHandle {
    /// Current stepper value.
    fn value(&self) -> u32;
    /// Sets the stepper value, clamped to its bounds.
    fn set_value(&self, value: u32);
}

/// Live single-selection control.
pub trait ChoiceHandle: ControlHandle {
    /// Currently selected value.
    fn selected(&self) -> String;
    /// Selects `option` if it is one of the permitted values; otherwise a no-op.
    fn set_selected(&self, option: &str);
}

/// Live ordered slot list control.
pub trait SlotListHandle: ControlHandle {
    /// Replaces the rendered rows.
    fn set_rows(&self, rows: Vec<SlotRowView>);
}

/// Factory surface a concrete widget toolkit must implement.
pub trait WidgetToolkit {
    /// Creates a text entry control.
    fn text_entry(&self, options: TextEntryOptions) -> Rc<dyn TextEntryHandle>;
    /// Creates a path entry with picker affordance.
    fn path_entry(&self, options: PathEntryOptions) -> Rc<dyn TextEntryHandle>;
    /// Creates a checkbox control.
    fn checkbox(&self, options: CheckboxOptions) -> Rc<dyn CheckboxHandle>;
    /// Creates a bounded slider control.
    fn slider(&self, options: SliderOptions) -> Rc<dyn SliderHandle>;
    /// Creates a bounded stepper control.
    fn stepper(&self, options: StepperOptions) -> Rc<dyn StepperHandle>;
    /// Creates a single-selection control.
    fn choice(&self, options: ChoiceOptions) -> Rc<dyn ChoiceHandle>;
    /// Creates an ordered slot list view.
    fn slot_list(&self, options: SlotListOptions) -> Rc<dyn SlotListHandle>;
}

/// Layout options for one labeled parameter row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ParameterRowOptions {
    /// Row label, the parameter name.
    pub label: String,
    /// Tooltip text.
    pub help: String,
    /// Whether the row is marked as required.
    pub required: bool,
}

/// Layout container supplied by the host for one command's form.
pub trait FormSurface {
    /// Appends one labeled parameter row holding `control`.
    fn add_parameter_row(&self, options: ParameterRowOptions, control: Rc<dyn ControlHandle>);
    /// Appends the run button for this form.
    fn add_run_button(&self, label: &str, on_run: Rc<dyn Fn()>);
    /// Surfaces a dispatch validation failure without tearing the form down.
    fn show_failure(&self, error: &ValidationError);
    /// Creates a parallel tab panel for one subcommand and returns its surface.
    fn add_tab_panel(&self, title: &str) -> Rc<dyn FormSurface>;
}

/// Closure producing a binding's current value as command-line tokens.
pub type ReadBack = Rc<dyn Fn() -> Vec<String>>;

/// Live pairing of a parameter specification with its on-screen editor.
#[derive(Clone)]
pub struct WidgetBinding {
    read_back: ReadBack,
    controls: Vec<Rc<dyn ControlHandle>>,
}

impl WidgetBinding {
    /// Creates a binding from its read-back closure and the handles keeping the editor
    /// alive. The first handle, when present, is the control placed on the parameter row.
    pub fn new(read_back: ReadBack, controls: Vec<Rc<dyn ControlHandle>>) -> Self {
        Self {
            read_back,
            controls,
        }
    }

    /// Current value as command-line tokens.
    pub fn read_back(&self) -> Vec<String> {
        (self.read_back)()
    }

    /// Live control handles owned by this binding.
    pub fn controls(&self) -> &[Rc<dyn ControlHandle>] {
        &self.controls
    }
}

/// Construction context handed to widget factories.
pub struct WidgetBuildRequest<'a> {
    /// Parameter being bound.
    pub spec: &'a ParameterSpec,
    /// Host toolkit creating the primitive controls.
    pub toolkit: &'a Rc<dyn WidgetToolkit>,
    /// Surface the parameter's row will be placed on.
    pub surface: &'a Rc<dyn FormSurface>,
}

/// Opaque caller-supplied widget factory carried by custom-kinded parameters. Owns widget
/// construction and read-back entirely.
pub type CustomWidgetFactory = Rc<dyn Fn(WidgetBuildRequest<'_>) -> WidgetBinding>;
