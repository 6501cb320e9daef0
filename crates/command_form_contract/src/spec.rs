//! Parameter specifications: the declarative description of one command input.

use serde::{Deserialize, Serialize};

use crate::toolkit::CustomWidgetFactory;

/// How many value slots a parameter consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Arity {
    /// Exactly one value slot.
    Single,
    /// A fixed number of value slots.
    FixedTuple {
        /// Slot count.
        len: usize,
    },
    /// An open-ended, user-growable list of value slots.
    Variadic,
}

/// Filesystem constraints carried by path-kinded parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathConstraints {
    /// Whether the chosen path must already exist.
    pub exists: bool,
    /// Whether plain files are selectable.
    pub file_allowed: bool,
    /// Whether directories are selectable.
    pub dir_allowed: bool,
}

impl Default for PathConstraints {
    fn default() -> Self {
        Self {
            exists: false,
            file_allowed: true,
            dir_allowed: true,
        }
    }
}

/// Typed default value attached to a parameter, matching its kind and arity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ParamDefault {
    /// Default text for single-slot editors.
    Text {
        /// Initial editor contents.
        value: String,
    },
    /// Per-slot default texts for tuple and variadic editors.
    Texts {
        /// Initial slot contents, in slot order.
        values: Vec<String>,
    },
    /// Default checked state for boolean flags.
    Flag {
        /// Initial checkbox state.
        checked: bool,
    },
    /// Default integer for sliders and steppers.
    Int {
        /// Initial numeric value.
        value: i64,
    },
}

/// Tagged parameter type driving widget selection.
///
/// Every variant except [`ParamKind::Custom`] is plain data; `Custom` carries an opaque
/// widget factory decided at specification-construction time, the single escape hatch for
/// caller-supplied types.
#[derive(Clone)]
pub enum ParamKind {
    /// Free-form text.
    Text,
    /// Whole number, edited as validated text.
    Integer,
    /// Floating-point number, edited as validated text.
    Float,
    /// Whole number restricted to an inclusive range, edited with a slider.
    IntRange {
        /// Inclusive lower bound.
        min: i64,
        /// Inclusive upper bound.
        max: i64,
    },
    /// One value out of a fixed option list.
    Choice {
        /// Permitted values, in display order.
        options: Vec<String>,
    },
    /// Filesystem path with picker affordance.
    Path(PathConstraints),
    /// Boolean flag rendered as a checkbox.
    BoolFlag,
    /// Repetition counter rendered as a bounded stepper.
    Counter,
    /// Caller-supplied widget factory owning construction and read-back entirely.
    Custom(CustomWidgetFactory),
}

impl ParamKind {
    /// Display name used as ghost text in empty editors.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::IntRange { .. } => "integer range",
            Self::Choice { .. } => "choice",
            Self::Path(_) => "path",
            Self::BoolFlag => "boolean",
            Self::Counter => "counter",
            Self::Custom(_) => "custom",
        }
    }
}

impl std::fmt::Debug for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => f.write_str("Text"),
            Self::Integer => f.write_str("Integer"),
            Self::Float => f.write_str("Float"),
            Self::IntRange { min, max } => f
                .debug_struct("IntRange")
                .field("min", min)
                .field("max", max)
                .finish(),
            Self::Choice { options } => {
                f.debug_struct("Choice").field("options", options).finish()
            }
            Self::Path(constraints) => f.debug_tuple("Path").field(constraints).finish(),
            Self::BoolFlag => f.write_str("BoolFlag"),
            Self::Counter => f.write_str("Counter"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Immutable description of one command parameter.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Parameter name shown on the form label.
    pub name: String,
    /// Flag tokens: the primary token first, then secondary/negative tokens for boolean
    /// pairs. Empty for positional parameters, which emit no flag token.
    pub tokens: Vec<String>,
    /// Slot count policy.
    pub arity: Arity,
    /// Parameter type; applied to every slot unless [`ParameterSpec::slot_kinds`] is set.
    pub kind: ParamKind,
    /// Per-slot kinds for heterogeneous fixed tuples. Empty means every slot uses
    /// [`ParameterSpec::kind`]. When non-empty its length must equal the tuple length, and
    /// variadic parameters must leave it empty.
    pub slot_kinds: Vec<ParamKind>,
    /// Optional default matching kind and arity.
    pub default: Option<ParamDefault>,
    /// Whether the underlying parser requires a value.
    pub required: bool,
    /// Whether text entry should be password-masked.
    pub mask_input: bool,
    /// Help text shown as the row tooltip.
    pub help: String,
    /// Positional parameters emit value tokens without any flag prefix.
    pub positional: bool,
}

impl ParameterSpec {
    /// Creates an option parameter with one flag token.
    pub fn option(name: impl Into<String>, token: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            tokens: vec![token.into()],
            arity: Arity::Single,
            kind,
            slot_kinds: Vec::new(),
            default: None,
            required: false,
            mask_input: false,
            help: String::new(),
            positional: false,
        }
    }

    /// Creates a positional argument parameter.
    pub fn positional(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            tokens: Vec::new(),
            arity: Arity::Single,
            kind,
            slot_kinds: Vec::new(),
            default: None,
            required: false,
            mask_input: false,
            help: String::new(),
            positional: true,
        }
    }

    /// Primary flag token, if any.
    pub fn primary_token(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Secondary/negative tokens emitted by unchecked boolean pairs.
    pub fn secondary_tokens(&self) -> &[String] {
        if self.tokens.is_empty() {
            &[]
        } else {
            &self.tokens[1..]
        }
    }

    /// Resolves the kind applied to one slot index.
    pub fn slot_kind(&self, index: usize) -> &ParamKind {
        self.slot_kinds.get(index).unwrap_or(&self.kind)
    }
}
