//! Capability-based dispatch from a parameter's kind to a widget factory.
//!
//! The registry replaces the original cascade of concrete type checks with an explicit
//! tag-keyed factory table. Custom-kinded parameters bypass the table entirely; their
//! attached factory owns construction and read-back. A kind whose tag has no registered
//! factory aborts form construction with [`FormBuildError::UnsupportedType`].

use std::{collections::BTreeMap, rc::Rc};

use command_form_contract::{
    Arity, CheckboxHandle, CheckboxOptions, ChoiceHandle, ChoiceOptions, ControlHandle,
    ParamDefault, ParamKind, ParameterSpec, PathEntryOptions, SliderHandle, SliderOptions,
    StepperHandle, StepperOptions, TextEntryHandle, TextEntryOptions, WidgetBinding,
    WidgetBuildRequest, WidgetToolkit,
};

use crate::editors::{validator_for, ListEditor};
use crate::error::FormBuildError;

/// Counter steppers clamp to this inclusive range.
pub const COUNTER_MAX: u32 = 99;

/// Discriminant used to key the factory table. Custom kinds never reach the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum KindTag {
    /// Free-form text.
    Text,
    /// Validated integer text.
    Integer,
    /// Validated float text.
    Float,
    /// Bounded integer slider.
    IntRange,
    /// Single selection out of fixed options.
    Choice,
    /// Path entry with picker.
    Path,
    /// Boolean checkbox.
    BoolFlag,
    /// Repetition stepper.
    Counter,
}

impl KindTag {
    /// Tag of a kind; `None` for custom kinds.
    pub fn of(kind: &ParamKind) -> Option<Self> {
        match kind {
            ParamKind::Text => Some(Self::Text),
            ParamKind::Integer => Some(Self::Integer),
            ParamKind::Float => Some(Self::Float),
            ParamKind::IntRange { .. } => Some(Self::IntRange),
            ParamKind::Choice { .. } => Some(Self::Choice),
            ParamKind::Path(_) => Some(Self::Path),
            ParamKind::BoolFlag => Some(Self::BoolFlag),
            ParamKind::Counter => Some(Self::Counter),
            ParamKind::Custom(_) => None,
        }
    }
}

/// Registered widget factory resolving one parameter into a live binding.
pub type WidgetFactory =
    Rc<dyn Fn(WidgetBuildRequest<'_>) -> Result<WidgetBinding, FormBuildError>>;

/// Kind-tag → widget-factory table.
#[derive(Clone, Default)]
pub struct TypeWidgetRegistry {
    factories: BTreeMap<KindTag, WidgetFactory>,
}

impl TypeWidgetRegistry {
    /// Creates a registry with no factories registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry covering every built-in kind.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for tag in [
            KindTag::Text,
            KindTag::Integer,
            KindTag::Float,
            KindTag::IntRange,
            KindTag::Choice,
            KindTag::Path,
            KindTag::BoolFlag,
            KindTag::Counter,
        ] {
            registry.register(tag, Rc::new(move |request| build_widget(request, tag)));
        }
        registry
    }

    /// Registers (or replaces) the factory for one kind tag.
    pub fn register(&mut self, tag: KindTag, factory: WidgetFactory) {
        self.factories.insert(tag, factory);
    }

    /// Whether `spec` can be resolved without constructing anything: custom kinds always
    /// can; otherwise the kind tag must be registered and the spec shape must be sound.
    pub fn ensure_supported(&self, spec: &ParameterSpec) -> Result<(), FormBuildError> {
        if matches!(spec.kind, ParamKind::Custom(_)) {
            return Ok(());
        }
        let tag = KindTag::of(&spec.kind).ok_or_else(|| unsupported(spec))?;
        if !self.factories.contains_key(&tag) {
            return Err(unsupported(spec));
        }
        check_shape(spec)
    }

    /// Resolves `spec` into a live widget binding.
    pub fn resolve(
        &self,
        request: WidgetBuildRequest<'_>,
    ) -> Result<WidgetBinding, FormBuildError> {
        if let ParamKind::Custom(factory) = &request.spec.kind {
            return Ok(factory(request));
        }
        let tag = KindTag::of(&request.spec.kind).ok_or_else(|| unsupported(request.spec))?;
        let factory = self
            .factories
            .get(&tag)
            .ok_or_else(|| unsupported(request.spec))?;
        factory(request)
    }
}

fn unsupported(spec: &ParameterSpec) -> FormBuildError {
    FormBuildError::UnsupportedType {
        parameter: spec.name.clone(),
        kind: spec.kind.display_name().to_string(),
    }
}

fn invalid(spec: &ParameterSpec, reason: impl Into<String>) -> FormBuildError {
    FormBuildError::InvalidSpec {
        parameter: spec.name.clone(),
        reason: reason.into(),
    }
}

fn check_shape(spec: &ParameterSpec) -> Result<(), FormBuildError> {
    match spec.arity {
        Arity::FixedTuple { len } => {
            if !spec.slot_kinds.is_empty() && spec.slot_kinds.len() != len {
                return Err(invalid(
                    spec,
                    format!(
                        "tuple of {len} slots carries {} per-slot kinds",
                        spec.slot_kinds.len()
                    ),
                ));
            }
        }
        Arity::Variadic => {
            if !spec.slot_kinds.is_empty() {
                return Err(invalid(spec, "variadic parameters use one kind for all slots"));
            }
        }
        Arity::Single => {}
    }
    if let ParamKind::Choice { options } = &spec.kind {
        if options.is_empty() {
            return Err(invalid(spec, "choice parameter has no options"));
        }
    }
    if let ParamKind::IntRange { min, max } = spec.kind {
        if min > max {
            return Err(invalid(spec, format!("empty integer range {min}..={max}")));
        }
    }
    if !spec.positional && spec.tokens.is_empty() {
        return Err(invalid(spec, "option parameter without a flag token"));
    }
    Ok(())
}

/// Shared builder behind every default factory. Multi-slot arities and positional
/// parameters funnel into the list/text paths; option singles dispatch per kind.
fn build_widget(
    request: WidgetBuildRequest<'_>,
    tag: KindTag,
) -> Result<WidgetBinding, FormBuildError> {
    check_shape(request.spec)?;
    let spec = request.spec;
    match spec.arity {
        Arity::FixedTuple { len } if len > 1 => return bind_list(request),
        Arity::Variadic => return bind_list(request),
        _ => {}
    }
    if spec.positional {
        return Ok(bind_single_text(request));
    }
    match tag {
        KindTag::BoolFlag => Ok(bind_checkbox(request)),
        KindTag::Counter => Ok(bind_stepper(request)),
        KindTag::Choice => bind_choice(request),
        KindTag::Path => Ok(bind_path(request)),
        KindTag::IntRange => bind_slider(request),
        KindTag::Text | KindTag::Integer | KindTag::Float => Ok(bind_single_text(request)),
    }
}

fn default_text(spec: &ParameterSpec) -> Option<String> {
    match &spec.default {
        Some(ParamDefault::Text { value }) => Some(value.clone()),
        Some(ParamDefault::Int { value }) => Some(value.to_string()),
        _ => None,
    }
}

fn default_int(spec: &ParameterSpec) -> Option<i64> {
    match &spec.default {
        Some(ParamDefault::Int { value }) => Some(*value),
        _ => None,
    }
}

/// Emits `[primary, ...values]` for options, `[...values]` for positionals.
fn prefixed(spec: &ParameterSpec, values: Vec<String>) -> Vec<String> {
    let mut tokens = Vec::with_capacity(values.len() + 1);
    if !spec.positional {
        if let Some(primary) = spec.primary_token() {
            tokens.push(primary.to_string());
        }
    }
    tokens.extend(values);
    tokens
}

fn bind_list(request: WidgetBuildRequest<'_>) -> Result<WidgetBinding, FormBuildError> {
    let spec = request.spec;
    let editor = ListEditor::build(spec, request.toolkit);
    let read_back = {
        let editor = Rc::clone(&editor);
        let spec = spec.clone();
        Rc::new(move || prefixed(&spec, editor.read_all()))
    };
    let controls: Vec<Rc<dyn ControlHandle>> = vec![editor.handle()];
    Ok(WidgetBinding::new(read_back, controls))
}

fn bind_single_text(request: WidgetBuildRequest<'_>) -> WidgetBinding {
    let spec = request.spec;
    let entry = request.toolkit.text_entry(TextEntryOptions {
        placeholder: spec.kind.display_name().to_string(),
        initial: default_text(spec),
        masked: spec.mask_input,
        validator: validator_for(&spec.kind),
        on_change: None,
    });
    let read_back = {
        let entry = Rc::clone(&entry);
        let spec = spec.clone();
        Rc::new(move || prefixed(&spec, vec![entry.text()]))
    };
    let controls: Vec<Rc<dyn ControlHandle>> = vec![entry];
    WidgetBinding::new(read_back, controls)
}

fn bind_path(request: WidgetBuildRequest<'_>) -> WidgetBinding {
    let spec = request.spec;
    let constraints = match spec.kind {
        ParamKind::Path(constraints) => constraints,
        _ => Default::default(),
    };
    let entry = request.toolkit.path_entry(PathEntryOptions {
        text: TextEntryOptions {
            placeholder: spec.kind.display_name().to_string(),
            initial: default_text(spec),
            masked: false,
            validator: None,
            on_change: None,
        },
        constraints,
    });
    let read_back = {
        let entry = Rc::clone(&entry);
        let spec = spec.clone();
        Rc::new(move || prefixed(&spec, vec![entry.text()]))
    };
    let controls: Vec<Rc<dyn ControlHandle>> = vec![entry];
    WidgetBinding::new(read_back, controls)
}

fn bind_checkbox(request: WidgetBuildRequest<'_>) -> WidgetBinding {
    let spec = request.spec;
    let checked = matches!(spec.default, Some(ParamDefault::Flag { checked: true }));
    let checkbox = request.toolkit.checkbox(CheckboxOptions {
        label: spec.name.clone(),
        checked,
        help: spec.help.clone(),
        on_change: None,
    });
    let read_back = {
        let checkbox = Rc::clone(&checkbox);
        let spec = spec.clone();
        Rc::new(move || {
            if checkbox.checked() {
                spec.primary_token()
                    .map(|token| vec![token.to_string()])
                    .unwrap_or_default()
            } else {
                spec.secondary_tokens().to_vec()
            }
        })
    };
    let controls: Vec<Rc<dyn ControlHandle>> = vec![checkbox];
    WidgetBinding::new(read_back, controls)
}

fn bind_stepper(request: WidgetBuildRequest<'_>) -> WidgetBinding {
    let spec = request.spec;
    let initial = default_int(spec)
        .map(|value| value.clamp(0, i64::from(COUNTER_MAX)) as u32)
        .unwrap_or(0);
    let stepper = request.toolkit.stepper(StepperOptions {
        min: 0,
        max: COUNTER_MAX,
        initial,
        on_change: None,
    });
    let read_back = {
        let stepper = Rc::clone(&stepper);
        let spec = spec.clone();
        Rc::new(move || match spec.primary_token() {
            Some(primary) => vec![primary.to_string(); stepper.value() as usize],
            None => Vec::new(),
        })
    };
    let controls: Vec<Rc<dyn ControlHandle>> = vec![stepper];
    WidgetBinding::new(read_back, controls)
}

fn bind_choice(request: WidgetBuildRequest<'_>) -> Result<WidgetBinding, FormBuildError> {
    let spec = request.spec;
    let options = match &spec.kind {
        ParamKind::Choice { options } => options.clone(),
        _ => Vec::new(),
    };
    let first = options
        .first()
        .cloned()
        .ok_or_else(|| invalid(spec, "choice parameter has no options"))?;
    let selected = default_text(spec)
        .filter(|value| options.contains(value))
        .unwrap_or(first);
    let choice = request.toolkit.choice(ChoiceOptions {
        options,
        selected,
        on_change: None,
    });
    let read_back = {
        let choice = Rc::clone(&choice);
        let spec = spec.clone();
        Rc::new(move || prefixed(&spec, vec![choice.selected()]))
    };
    let controls: Vec<Rc<dyn ControlHandle>> = vec![choice];
    Ok(WidgetBinding::new(read_back, controls))
}

fn bind_slider(request: WidgetBuildRequest<'_>) -> Result<WidgetBinding, FormBuildError> {
    let spec = request.spec;
    let (min, max) = match spec.kind {
        ParamKind::IntRange { min, max } => (min, max),
        _ => return Err(invalid(spec, "slider bound to a non-range kind")),
    };
    let initial = match default_int(spec) {
        Some(value) => value.clamp(min, max),
        None => (min + max) / 2,
    };
    let slider = request.toolkit.slider(SliderOptions {
        min,
        max,
        initial,
        on_change: None,
    });
    let read_back = {
        let slider = Rc::clone(&slider);
        let spec = spec.clone();
        Rc::new(move || prefixed(&spec, vec![slider.value().to_string()]))
    };
    let controls: Vec<Rc<dyn ControlHandle>> = vec![slider];
    Ok(WidgetBinding::new(read_back, controls))
}
