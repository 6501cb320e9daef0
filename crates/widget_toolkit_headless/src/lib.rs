//! In-memory widget toolkit and form surface for exercising form engines without a GUI.
//!
//! Every control records its construction options and exposes test affordances alongside
//! the handle traits: entries can be typed into character by character (honoring their
//! validator the way a real entry would), slot lists can have their add/delete buttons
//! pressed, and surfaces remember the rows, run buttons, tabs, and failures placed on
//! them.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use command_form_contract::{
    ChangeListener, CheckboxHandle, CheckboxOptions, ChoiceHandle, ChoiceOptions,
    ControlHandle, FormSurface, ParameterRowOptions, PathConstraints, PathEntryOptions,
    SliderHandle, SliderOptions, SlotCommitListener, SlotListHandle, SlotListOptions,
    SlotRowView, SlotSelectionListener, StepperHandle, StepperOptions, TextEntryHandle,
    TextEntryOptions, TextValidator, ValidationError, WidgetToolkit,
};

fn notify(listener: &Option<ChangeListener>) {
    if let Some(listener) = listener {
        listener();
    }
}

/// Recorded text entry control.
pub struct HeadlessTextEntry {
    placeholder: String,
    masked: bool,
    text: RefCell<String>,
    validator: Option<TextValidator>,
    on_change: Option<ChangeListener>,
}

impl HeadlessTextEntry {
    fn create(options: TextEntryOptions) -> Rc<Self> {
        Rc::new(Self {
            placeholder: options.placeholder,
            masked: options.masked,
            text: RefCell::new(options.initial.unwrap_or_default()),
            validator: options.validator,
            on_change: options.on_change,
        })
    }

    /// Appends `input` one character at a time, dropping characters the validator refuses,
    /// the way a real entry filters keystrokes.
    pub fn type_text(&self, input: &str) {
        for ch in input.chars() {
            let mut candidate = self.text.borrow().clone();
            candidate.push(ch);
            let accepted = self
                .validator
                .as_ref()
                .map_or(true, |accept| accept(&candidate));
            if accepted {
                *self.text.borrow_mut() = candidate;
                notify(&self.on_change);
            }
        }
    }

    /// Ghost text configured at construction.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Whether input echoes as password dots.
    pub fn masked(&self) -> bool {
        self.masked
    }
}

impl ControlHandle for HeadlessTextEntry {
    fn kind_token(&self) -> &'static str {
        "text-entry"
    }
}

impl TextEntryHandle for HeadlessTextEntry {
    fn text(&self) -> String {
        self.text.borrow().clone()
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
        notify(&self.on_change);
    }
}

/// Recorded path entry control with a simulated picker.
pub struct HeadlessPathEntry {
    entry: Rc<HeadlessTextEntry>,
    constraints: PathConstraints,
}

impl HeadlessPathEntry {
    fn create(options: PathEntryOptions) -> Rc<Self> {
        Rc::new(Self {
            entry: HeadlessTextEntry::create(options.text),
            constraints: options.constraints,
        })
    }

    /// Simulates choosing `path` through the picker affordance.
    pub fn pick(&self, path: &str) {
        self.entry.set_text(path);
    }

    /// Picker constraints configured at construction.
    pub fn constraints(&self) -> PathConstraints {
        self.constraints
    }
}

impl ControlHandle for HeadlessPathEntry {
    fn kind_token(&self) -> &'static str {
        "path-entry"
    }
}

impl TextEntryHandle for HeadlessPathEntry {
    fn text(&self) -> String {
        self.entry.text()
    }

    fn set_text(&self, text: &str) {
        self.entry.set_text(text);
    }
}

/// Recorded checkbox control.
pub struct HeadlessCheckbox {
    label: String,
    help: String,
    checked: Cell<bool>,
    on_change: Option<ChangeListener>,
}

impl HeadlessCheckbox {
    fn create(options: CheckboxOptions) -> Rc<Self> {
        Rc::new(Self {
            label: options.label,
            help: options.help,
            checked: Cell::new(options.checked),
            on_change: options.on_change,
        })
    }

    /// Checkbox caption.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Tooltip text.
    pub fn help(&self) -> &str {
        &self.help
    }

    /// Flips the checked state, as a click would.
    pub fn toggle(&self) {
        self.set_checked(!self.checked.get());
    }
}

impl ControlHandle for HeadlessCheckbox {
    fn kind_token(&self) -> &'static str {
        "checkbox"
    }
}

impl CheckboxHandle for HeadlessCheckbox {
    fn checked(&self) -> bool {
        self.checked.get()
    }

    fn set_checked(&self, checked: bool) {
        self.checked.set(checked);
        notify(&self.on_change);
    }
}

/// Recorded bounded slider control.
pub struct HeadlessSlider {
    min: i64,
    max: i64,
    value: Cell<i64>,
    on_change: Option<ChangeListener>,
}

impl HeadlessSlider {
    fn create(options: SliderOptions) -> Rc<Self> {
        Rc::new(Self {
            min: options.min,
            max: options.max,
            value: Cell::new(options.initial.clamp(options.min, options.max)),
            on_change: options.on_change,
        })
    }

    /// Inclusive bounds configured at construction.
    pub fn bounds(&self) -> (i64, i64) {
        (self.min, self.max)
    }
}

impl ControlHandle for HeadlessSlider {
    fn kind_token(&self) -> &'static str {
        "slider"
    }
}

impl SliderHandle for HeadlessSlider {
    fn value(&self) -> i64 {
        self.value.get()
    }

    fn set_value(&self, value: i64) {
        self.value.set(value.clamp(self.min, self.max));
        notify(&self.on_change);
    }
}

/// Recorded bounded stepper control.
pub struct HeadlessStepper {
    min: u32,
    max: u32,
    value: Cell<u32>,
    on_change: Option<ChangeListener>,
}

impl HeadlessStepper {
    fn create(options: StepperOptions) -> Rc<Self> {
        Rc::new(Self {
            min: options.min,
            max: options.max,
            value: Cell::new(options.initial.clamp(options.min, options.max)),
            on_change: options.on_change,
        })
    }

    /// Inclusive bounds configured at construction.
    pub fn bounds(&self) -> (u32, u32) {
        (self.min, self.max)
    }
}

impl ControlHandle for HeadlessStepper {
    fn kind_token(&self) -> &'static str {
        "stepper"
    }
}

impl StepperHandle for HeadlessStepper {
    fn value(&self) -> u32 {
        self.value.get()
    }

    fn set_value(&self, value: u32) {
        self.value.set(value.clamp(self.min, self.max));
        notify(&self.on_change);
    }
}

/// Recorded single-selection control.
pub struct HeadlessChoice {
    options: Vec<String>,
    selected: RefCell<String>,
    on_change: Option<ChangeListener>,
}

impl HeadlessChoice {
    fn create(options: ChoiceOptions) -> Rc<Self> {
        Rc::new(Self {
            options: options.options,
            selected: RefCell::new(options.selected),
            on_change: options.on_change,
        })
    }

    /// Permitted values, in display order.
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

impl ControlHandle for HeadlessChoice {
    fn kind_token(&self) -> &'static str {
        "choice"
    }
}

impl ChoiceHandle for HeadlessChoice {
    fn selected(&self) -> String {
        self.selected.borrow().clone()
    }

    fn set_selected(&self, option: &str) {
        if self.options.iter().any(|candidate| candidate == option) {
            *self.selected.borrow_mut() = option.to_string();
            notify(&self.on_change);
        }
    }
}

/// Recorded ordered slot list control.
pub struct HeadlessSlotList {
    rows: RefCell<Vec<SlotRowView>>,
    mutable_rows: bool,
    on_commit: Option<SlotCommitListener>,
    on_insert: Option<SlotSelectionListener>,
    on_remove: Option<SlotSelectionListener>,
}

impl HeadlessSlotList {
    fn create(options: SlotListOptions) -> Rc<Self> {
        Rc::new(Self {
            rows: RefCell::new(options.rows),
            mutable_rows: options.mutable_rows,
            on_commit: options.on_commit,
            on_insert: options.on_insert,
            on_remove: options.on_remove,
        })
    }

    /// Currently rendered rows.
    pub fn rows(&self) -> Vec<SlotRowView> {
        self.rows.borrow().clone()
    }

    /// Whether add/delete buttons are present.
    pub fn mutable_rows(&self) -> bool {
        self.mutable_rows
    }

    /// Simulates committing `text` into the row at `index`.
    pub fn edit_row(&self, index: usize, text: &str) {
        if let Some(listener) = &self.on_commit {
            listener(index, text);
        }
    }

    /// Simulates pressing the add button with `selection` highlighted.
    pub fn press_add(&self, selection: &[usize]) {
        if let Some(listener) = &self.on_insert {
            listener(selection);
        }
    }

    /// Simulates pressing the delete button with `selection` highlighted.
    pub fn press_delete(&self, selection: &[usize]) {
        if let Some(listener) = &self.on_remove {
            listener(selection);
        }
    }
}

impl ControlHandle for HeadlessSlotList {
    fn kind_token(&self) -> &'static str {
        "slot-list"
    }
}

impl SlotListHandle for HeadlessSlotList {
    fn set_rows(&self, rows: Vec<SlotRowView>) {
        *self.rows.borrow_mut() = rows;
    }
}

/// Recording toolkit handing out the headless controls above.
#[derive(Default)]
pub struct HeadlessToolkit {
    text_entries: RefCell<Vec<Rc<HeadlessTextEntry>>>,
    path_entries: RefCell<Vec<Rc<HeadlessPathEntry>>>,
    checkboxes: RefCell<Vec<Rc<HeadlessCheckbox>>>,
    sliders: RefCell<Vec<Rc<HeadlessSlider>>>,
    steppers: RefCell<Vec<Rc<HeadlessStepper>>>,
    choices: RefCell<Vec<Rc<HeadlessChoice>>>,
    slot_lists: RefCell<Vec<Rc<HeadlessSlotList>>>,
}

impl HeadlessToolkit {
    /// Text entries created so far, in creation order.
    pub fn text_entries(&self) -> Vec<Rc<HeadlessTextEntry>> {
        self.text_entries.borrow().clone()
    }

    /// Path entries created so far, in creation order.
    pub fn path_entries(&self) -> Vec<Rc<HeadlessPathEntry>> {
        self.path_entries.borrow().clone()
    }

    /// Checkboxes created so far, in creation order.
    pub fn checkboxes(&self) -> Vec<Rc<HeadlessCheckbox>> {
        self.checkboxes.borrow().clone()
    }

    /// Sliders created so far, in creation order.
    pub fn sliders(&self) -> Vec<Rc<HeadlessSlider>> {
        self.sliders.borrow().clone()
    }

    /// Steppers created so far, in creation order.
    pub fn steppers(&self) -> Vec<Rc<HeadlessStepper>> {
        self.steppers.borrow().clone()
    }

    /// Choice controls created so far, in creation order.
    pub fn choices(&self) -> Vec<Rc<HeadlessChoice>> {
        self.choices.borrow().clone()
    }

    /// Slot lists created so far, in creation order.
    pub fn slot_lists(&self) -> Vec<Rc<HeadlessSlotList>> {
        self.slot_lists.borrow().clone()
    }
}

impl WidgetToolkit for HeadlessToolkit {
    fn text_entry(&self, options: TextEntryOptions) -> Rc<dyn TextEntryHandle> {
        let entry = HeadlessTextEntry::create(options);
        self.text_entries.borrow_mut().push(Rc::clone(&entry));
        entry
    }

    fn path_entry(&self, options: PathEntryOptions) -> Rc<dyn TextEntryHandle> {
        let entry = HeadlessPathEntry::create(options);
        self.path_entries.borrow_mut().push(Rc::clone(&entry));
        entry
    }

    fn checkbox(&self, options: CheckboxOptions) -> Rc<dyn CheckboxHandle> {
        let checkbox = HeadlessCheckbox::create(options);
        self.checkboxes.borrow_mut().push(Rc::clone(&checkbox));
        checkbox
    }

    fn slider(&self, options: SliderOptions) -> Rc<dyn SliderHandle> {
        let slider = HeadlessSlider::create(options);
        self.sliders.borrow_mut().push(Rc::clone(&slider));
        slider
    }

    fn stepper(&self, options: StepperOptions) -> Rc<dyn StepperHandle> {
        let stepper = HeadlessStepper::create(options);
        self.steppers.borrow_mut().push(Rc::clone(&stepper));
        stepper
    }

    fn choice(&self, options: ChoiceOptions) -> Rc<dyn ChoiceHandle> {
        let choice = HeadlessChoice::create(options);
        self.choices.borrow_mut().push(Rc::clone(&choice));
        choice
    }

    fn slot_list(&self, options: SlotListOptions) -> Rc<dyn SlotListHandle> {
        let list = HeadlessSlotList::create(options);
        self.slot_lists.borrow_mut().push(Rc::clone(&list));
        list
    }
}

/// One parameter row recorded by [`HeadlessSurface::add_parameter_row`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRow {
    /// Row label.
    pub label: String,
    /// Tooltip text.
    pub help: String,
    /// Whether the row is marked required.
    pub required: bool,
    /// Kind token of the control placed on the row.
    pub control_kind: &'static str,
}

/// Recording form surface.
#[derive(Default)]
pub struct HeadlessSurface {
    rows: RefCell<Vec<RecordedRow>>,
    run_buttons: RefCell<Vec<(String, Rc<dyn Fn()>)>>,
    failures: RefCell<Vec<ValidationError>>,
    tabs: RefCell<Vec<(String, Rc<HeadlessSurface>)>>,
}

impl HeadlessSurface {
    /// Parameter rows placed directly on this surface, in placement order.
    pub fn rows(&self) -> Vec<RecordedRow> {
        self.rows.borrow().clone()
    }

    /// Labels of the run buttons placed on this surface.
    pub fn run_button_labels(&self) -> Vec<String> {
        self.run_buttons
            .borrow()
            .iter()
            .map(|(label, _)| label.clone())
            .collect()
    }

    /// Simulates clicking the run button at `index`.
    ///
    /// # Panics
    ///
    /// Panics if no run button exists at `index`.
    pub fn press_run(&self, index: usize) {
        let on_run = Rc::clone(&self.run_buttons.borrow()[index].1);
        on_run();
    }

    /// Failures surfaced on this surface, in arrival order.
    pub fn failures(&self) -> Vec<ValidationError> {
        self.failures.borrow().clone()
    }

    /// Titles of the tab panels created on this surface, in creation order.
    pub fn tab_titles(&self) -> Vec<String> {
        self.tabs
            .borrow()
            .iter()
            .map(|(title, _)| title.clone())
            .collect()
    }

    /// The tab panel titled `title`, if one was created.
    pub fn tab(&self, title: &str) -> Option<Rc<HeadlessSurface>> {
        self.tabs
            .borrow()
            .iter()
            .find(|(candidate, _)| candidate == title)
            .map(|(_, surface)| Rc::clone(surface))
    }
}

impl FormSurface for HeadlessSurface {
    fn add_parameter_row(&self, options: ParameterRowOptions, control: Rc<dyn ControlHandle>) {
        self.rows.borrow_mut().push(RecordedRow {
            label: options.label,
            help: options.help,
            required: options.required,
            control_kind: control.kind_token(),
        });
    }

    fn add_run_button(&self, label: &str, on_run: Rc<dyn Fn()>) {
        self.run_buttons
            .borrow_mut()
            .push((label.to_string(), on_run));
    }

    fn show_failure(&self, error: &ValidationError) {
        self.failures.borrow_mut().push(error.clone());
    }

    fn add_tab_panel(&self, title: &str) -> Rc<dyn FormSurface> {
        let panel = Rc::new(HeadlessSurface::default());
        self.tabs
            .borrow_mut()
            .push((title.to_string(), Rc::clone(&panel)));
        panel
    }
}
