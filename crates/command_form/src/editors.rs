//! Text validators and the list editor wiring between a [`ValueListModel`] and the
//! toolkit's slot list control.

use std::{cell::RefCell, rc::Rc};

use command_form_contract::{
    Arity, ParamDefault, ParamKind, ParameterSpec, SlotCommitListener, SlotListHandle,
    SlotListOptions, SlotRowView, SlotSelectionListener, TextValidator, WidgetToolkit,
};

use crate::list_model::{SlotState, ValueListModel};

/// Keystroke validator accepting integer text, including the intermediate states an entry
/// passes through while typing (`""`, `"-"`).
pub fn integer_validator() -> TextValidator {
    Rc::new(|text| is_integer_prefix(text))
}

/// Keystroke validator accepting floating-point text, including intermediate states.
pub fn float_validator() -> TextValidator {
    Rc::new(|text| is_float_prefix(text))
}

/// Selects the advisory validator for a slot kind, if the kind constrains text at all.
pub fn validator_for(kind: &ParamKind) -> Option<TextValidator> {
    match kind {
        ParamKind::Integer | ParamKind::IntRange { .. } | ParamKind::Counter => {
            Some(integer_validator())
        }
        ParamKind::Float => Some(float_validator()),
        _ => None,
    }
}

fn is_integer_prefix(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    digits.chars().all(|ch| ch.is_ascii_digit())
}

fn is_float_prefix(text: &str) -> bool {
    let rest = text.strip_prefix('-').unwrap_or(text);
    let mut seen_dot = false;
    let mut exponent = None::<&str>;
    let mut mantissa_end = rest.len();
    for (offset, ch) in rest.char_indices() {
        match ch {
            'e' | 'E' => {
                exponent = Some(&rest[offset + 1..]);
                mantissa_end = offset;
                break;
            }
            '.' if !seen_dot => seen_dot = true,
            ch if ch.is_ascii_digit() => {}
            _ => return false,
        }
    }
    if !rest[..mantissa_end]
        .chars()
        .all(|ch| ch.is_ascii_digit() || ch == '.')
    {
        return false;
    }
    match exponent {
        None => true,
        Some(exp) => {
            let exp = exp.strip_prefix('-').or_else(|| exp.strip_prefix('+')).unwrap_or(exp);
            exp.chars().all(|ch| ch.is_ascii_digit())
        }
    }
}

/// Ghost text source for slot rows: one display name for uniform editors, per-slot names
/// for heterogeneous tuples.
#[derive(Debug, Clone)]
enum GhostNames {
    Uniform(String),
    PerSlot(Vec<String>),
}

impl GhostNames {
    fn for_spec(spec: &ParameterSpec) -> Self {
        if spec.slot_kinds.is_empty() {
            Self::Uniform(spec.kind.display_name().to_string())
        } else {
            Self::PerSlot(
                spec.slot_kinds
                    .iter()
                    .map(|kind| kind.display_name().to_string())
                    .collect(),
            )
        }
    }

    fn at(&self, index: usize) -> &str {
        match self {
            Self::Uniform(name) => name,
            Self::PerSlot(names) => names
                .get(index)
                .map(String::as_str)
                .unwrap_or(""),
        }
    }
}

/// Binds a [`ValueListModel`] to one toolkit slot list control, re-rendering rows after
/// every model mutation and exposing ordered read-back.
pub struct ListEditor {
    model: Rc<RefCell<ValueListModel>>,
    handle: Rc<dyn SlotListHandle>,
}

impl ListEditor {
    /// Builds the editor for `spec`, creating the slot list control through `toolkit`.
    pub fn build(spec: &ParameterSpec, toolkit: &Rc<dyn WidgetToolkit>) -> Rc<Self> {
        let mut initial = match spec.arity {
            Arity::FixedTuple { len } => ValueListModel::fixed(len),
            _ => ValueListModel::variadic(),
        };
        if let Some(values) = default_texts(spec) {
            initial.prefill(&values);
        }
        let mutable_rows = initial.mutable_rows();

        let ghosts = GhostNames::for_spec(spec);
        let model = Rc::new(RefCell::new(initial));
        let handle_slot: Rc<RefCell<Option<Rc<dyn SlotListHandle>>>> =
            Rc::new(RefCell::new(None));

        let rerender: Rc<dyn Fn()> = {
            let model = Rc::clone(&model);
            let handle_slot = Rc::clone(&handle_slot);
            let ghosts = ghosts.clone();
            Rc::new(move || {
                if let Some(handle) = handle_slot.borrow().as_ref() {
                    handle.set_rows(render_rows(&model.borrow(), &ghosts));
                }
            })
        };

        let on_commit: SlotCommitListener = {
            let model = Rc::clone(&model);
            let rerender = Rc::clone(&rerender);
            Rc::new(move |index, text| {
                let _ = model.borrow_mut().commit_text(index, text);
                rerender();
            })
        };
        let on_insert: SlotSelectionListener = {
            let model = Rc::clone(&model);
            let rerender = Rc::clone(&rerender);
            Rc::new(move |selection| {
                model.borrow_mut().insert_after_each(selection);
                rerender();
            })
        };
        let on_remove: SlotSelectionListener = {
            let model = Rc::clone(&model);
            let rerender = Rc::clone(&rerender);
            Rc::new(move |selection| {
                model.borrow_mut().remove_each(selection);
                rerender();
            })
        };

        let handle = toolkit.slot_list(SlotListOptions {
            rows: render_rows(&model.borrow(), &ghosts),
            mutable_rows,
            on_commit: Some(on_commit),
            on_insert: mutable_rows.then_some(on_insert),
            on_remove: mutable_rows.then_some(on_remove),
        });
        *handle_slot.borrow_mut() = Some(Rc::clone(&handle));

        Rc::new(Self { model, handle })
    }

    /// Current slot texts in model order.
    pub fn read_all(&self) -> Vec<String> {
        self.model.borrow().read_all()
    }

    /// The slot list control placed on the parameter row.
    pub fn handle(&self) -> Rc<dyn SlotListHandle> {
        Rc::clone(&self.handle)
    }
}

fn default_texts(spec: &ParameterSpec) -> Option<Vec<String>> {
    match &spec.default {
        Some(ParamDefault::Texts { values }) => Some(values.clone()),
        Some(ParamDefault::Text { value }) => Some(vec![value.clone()]),
        _ => None,
    }
}

fn render_rows(model: &ValueListModel, ghosts: &GhostNames) -> Vec<SlotRowView> {
    (0..model.len())
        .map(|index| {
            let state = model.state(index).cloned().unwrap_or(SlotState::Unset);
            SlotRowView {
                text: state.text().to_string(),
                ghost: ghosts.at(index).to_string(),
                muted: state.is_unset(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_validator_accepts_intermediate_states() {
        let accept = integer_validator();
        for text in ["", "-", "0", "-42", "123456"] {
            assert!(accept(text), "should accept {text:?}");
        }
        for text in ["a", "1.5", "--2", "1-", "1a"] {
            assert!(!accept(text), "should reject {text:?}");
        }
    }

    #[test]
    fn float_validator_accepts_partial_numbers() {
        let accept = float_validator();
        for text in ["", "-", "3", "3.", "3.14", "-0.5", ".25", "1e", "1e-6", "2E+10"] {
            assert!(accept(text), "should accept {text:?}");
        }
        for text in ["x", "1.2.3", "1e5e5", "-.1-", "nan"] {
            assert!(!accept(text), "should reject {text:?}");
        }
    }

    #[test]
    fn validator_selection_follows_kind() {
        assert!(validator_for(&ParamKind::Integer).is_some());
        assert!(validator_for(&ParamKind::Float).is_some());
        assert!(validator_for(&ParamKind::Text).is_none());
        assert!(validator_for(&ParamKind::BoolFlag).is_none());
    }

    #[test]
    fn ghost_names_resolve_per_slot_for_tuples() {
        let mut spec = ParameterSpec::option("pair", "--pair", ParamKind::Text);
        spec.slot_kinds = vec![ParamKind::Integer, ParamKind::Text];
        let ghosts = GhostNames::for_spec(&spec);
        assert_eq!(ghosts.at(0), "integer");
        assert_eq!(ghosts.at(1), "text");
        assert_eq!(ghosts.at(9), "");
    }
}
