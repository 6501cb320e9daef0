//! Form construction: walks the command tree, binds every parameter, and wires one
//! submission controller per leaf.
//!
//! The whole tree is checked against the registry before any widget is created, so an
//! unsupported or malformed parameter anywhere in the tree aborts construction with the
//! surface still untouched.

use std::rc::Rc;

use command_form_contract::{CommandNode, FormSurface, ParameterSpec, WidgetToolkit};

use crate::binder::bind_parameter;
use crate::controller::CommandFormController;
use crate::error::FormBuildError;
use crate::registry::TypeWidgetRegistry;
use crate::synthesize::FormSection;

/// Live form over one command tree. Dropping the handle detaches every controller, so
/// dispatch completions arriving afterwards are discarded instead of touching dead state.
pub struct FormHandle {
    controllers: Vec<(Vec<String>, Rc<CommandFormController>)>,
}

impl FormHandle {
    /// Controller for the leaf at `path`, command names from the root down.
    pub fn controller(&self, path: &[&str]) -> Option<Rc<CommandFormController>> {
        self.controllers
            .iter()
            .find(|(candidate, _)| {
                candidate.iter().map(String::as_str).eq(path.iter().copied())
            })
            .map(|(_, controller)| Rc::clone(controller))
    }

    /// Every leaf controller, in tree order.
    pub fn controllers(&self) -> impl Iterator<Item = &Rc<CommandFormController>> {
        self.controllers.iter().map(|(_, controller)| controller)
    }
}

impl Drop for FormHandle {
    fn drop(&mut self) {
        for (_, controller) in &self.controllers {
            controller.deactivate();
        }
    }
}

/// Builds the form for `tree` on `surface` with the default registry.
pub fn present_form(
    tree: &CommandNode,
    toolkit: &Rc<dyn WidgetToolkit>,
    surface: &Rc<dyn FormSurface>,
) -> Result<FormHandle, FormBuildError> {
    build_form(tree, toolkit, surface, &TypeWidgetRegistry::with_defaults())
}

/// Builds the form for `tree` with a caller-extended registry.
pub fn build_form(
    tree: &CommandNode,
    toolkit: &Rc<dyn WidgetToolkit>,
    surface: &Rc<dyn FormSurface>,
    registry: &TypeWidgetRegistry,
) -> Result<FormHandle, FormBuildError> {
    validate_node(registry, tree)?;
    let mut handle = FormHandle {
        controllers: Vec::new(),
    };
    build_node(registry, tree, toolkit, surface, &[], &mut handle)?;
    Ok(handle)
}

fn validate_node(registry: &TypeWidgetRegistry, node: &CommandNode) -> Result<(), FormBuildError> {
    match node {
        CommandNode::Leaf(leaf) => leaf
            .params
            .iter()
            .try_for_each(|spec| registry.ensure_supported(spec)),
        CommandNode::Group(group) => {
            group
                .params
                .iter()
                .try_for_each(|spec| registry.ensure_supported(spec))?;
            group
                .children
                .iter()
                .try_for_each(|child| validate_node(registry, child))
        }
    }
}

fn bind_section(
    registry: &TypeWidgetRegistry,
    name: &str,
    params: &[ParameterSpec],
    toolkit: &Rc<dyn WidgetToolkit>,
    surface: &Rc<dyn FormSurface>,
) -> Result<FormSection, FormBuildError> {
    let bindings = params
        .iter()
        .map(|spec| bind_parameter(registry, spec, toolkit, surface))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FormSection {
        name: name.to_string(),
        bindings,
    })
}

fn build_node(
    registry: &TypeWidgetRegistry,
    node: &CommandNode,
    toolkit: &Rc<dyn WidgetToolkit>,
    surface: &Rc<dyn FormSurface>,
    prefix: &[Rc<FormSection>],
    handle: &mut FormHandle,
) -> Result<(), FormBuildError> {
    match node {
        CommandNode::Leaf(leaf) => {
            let section = bind_section(registry, &leaf.name, &leaf.params, toolkit, surface)?;
            let mut path: Vec<String> =
                prefix.iter().map(|section| section.name.clone()).collect();
            path.push(leaf.name.clone());
            let controller = CommandFormController::new(
                prefix.to_vec(),
                Rc::new(section),
                Rc::clone(&leaf.run),
                Rc::clone(surface),
            );
            surface.add_run_button(&leaf.name, {
                let controller = Rc::clone(&controller);
                Rc::new(move || controller.submit())
            });
            handle.controllers.push((path, controller));
        }
        CommandNode::Group(group) => {
            let section = Rc::new(bind_section(
                registry,
                &group.name,
                &group.params,
                toolkit,
                surface,
            )?);
            let mut nested = prefix.to_vec();
            nested.push(section);
            for child in &group.children {
                let child_surface = surface.add_tab_panel(child.name());
                build_node(registry, child, toolkit, &child_surface, &nested, handle)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use command_form_contract::{
        Arity, CheckboxHandle, CommandGroup, CommandLeaf, DispatchOutcome, ParamDefault,
        ParamKind, ParameterSpec, PathConstraints, RunHandler, RunRequest, SliderHandle,
        StepperHandle, WidgetBinding,
    };
    use pretty_assertions::assert_eq;
    use widget_toolkit_headless::{HeadlessSurface, HeadlessToolkit};

    use super::*;

    fn recording_handler(seen: &Rc<RefCell<Vec<Vec<String>>>>) -> RunHandler {
        let seen = Rc::clone(seen);
        Rc::new(move |request: RunRequest| {
            seen.borrow_mut().push(request.tokens);
            DispatchOutcome::Ready(Ok(()))
        })
    }

    fn harness() -> (Rc<HeadlessToolkit>, Rc<dyn WidgetToolkit>, Rc<HeadlessSurface>, Rc<dyn FormSurface>) {
        let toolkit = Rc::new(HeadlessToolkit::default());
        let surface = Rc::new(HeadlessSurface::default());
        (
            Rc::clone(&toolkit),
            toolkit.clone() as Rc<dyn WidgetToolkit>,
            Rc::clone(&surface),
            surface.clone() as Rc<dyn FormSurface>,
        )
    }

    #[test]
    fn leaf_form_synthesizes_tokens_in_declaration_order() {
        let _ = leptos::create_runtime();
        let (toolkit, dyn_toolkit, surface, dyn_surface) = harness();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let mut shout = ParameterSpec::option("shout", "--shout", ParamKind::BoolFlag);
        shout.default = Some(ParamDefault::Flag { checked: true });
        let mode = ParameterSpec::option(
            "mode",
            "--mode",
            ParamKind::Choice {
                options: vec!["x".into(), "y".into()],
            },
        );
        let src = ParameterSpec::positional("src", ParamKind::Text);
        let dst = ParameterSpec::positional("dst", ParamKind::Text);
        let tree = CommandNode::Leaf(CommandLeaf {
            name: "copy".into(),
            params: vec![shout, mode, src, dst],
            run: recording_handler(&seen),
        });

        let handle = present_form(&tree, &dyn_toolkit, &dyn_surface).expect("form");
        toolkit.text_entries()[0].type_text("p");
        toolkit.text_entries()[1].type_text("q");

        surface.press_run(0);
        assert_eq!(
            seen.borrow().as_slice(),
            &[vec![
                "copy".to_string(),
                "--shout".into(),
                "--mode".into(),
                "x".into(),
                "p".into(),
                "q".into(),
            ]]
        );

        let controller = handle.controller(&["copy"]).expect("controller");
        assert_eq!(controller.preview_tokens()[0], "copy");
        assert_eq!(surface.rows().len(), 4);
        assert_eq!(surface.run_button_labels(), vec!["copy"]);
    }

    #[test]
    fn boolean_pair_emits_the_negative_token_when_unchecked() {
        let _ = leptos::create_runtime();
        let (toolkit, dyn_toolkit, _surface, dyn_surface) = harness();

        let mut shout = ParameterSpec::option("shout", "--shout", ParamKind::BoolFlag);
        shout.tokens.push("--no-shout".into());
        let tree = CommandNode::Leaf(CommandLeaf {
            name: "greet".into(),
            params: vec![shout],
            run: Rc::new(|_| DispatchOutcome::Ready(Ok(()))),
        });

        let handle = present_form(&tree, &dyn_toolkit, &dyn_surface).expect("form");
        let controller = handle.controller(&["greet"]).expect("controller");

        assert_eq!(controller.preview_tokens(), vec!["greet", "--no-shout"]);
        toolkit.checkboxes()[0].set_checked(true);
        assert_eq!(controller.preview_tokens(), vec!["greet", "--shout"]);
    }

    #[test]
    fn counter_repeats_its_flag_token() {
        let _ = leptos::create_runtime();
        let (toolkit, dyn_toolkit, _surface, dyn_surface) = harness();

        let verbose = ParameterSpec::option("verbose", "-v", ParamKind::Counter);
        let tree = CommandNode::Leaf(CommandLeaf {
            name: "log".into(),
            params: vec![verbose],
            run: Rc::new(|_| DispatchOutcome::Ready(Ok(()))),
        });

        let handle = present_form(&tree, &dyn_toolkit, &dyn_surface).expect("form");
        let controller = handle.controller(&["log"]).expect("controller");

        assert_eq!(controller.preview_tokens(), vec!["log"]);
        toolkit.steppers()[0].set_value(3);
        assert_eq!(controller.preview_tokens(), vec!["log", "-v", "-v", "-v"]);
        toolkit.steppers()[0].set_value(200);
        assert_eq!(controller.preview_tokens().len(), 1 + 99);
    }

    #[test]
    fn range_slider_and_path_entry_round_trip() {
        let _ = leptos::create_runtime();
        let (toolkit, dyn_toolkit, _surface, dyn_surface) = harness();

        let level = ParameterSpec::option(
            "level",
            "--level",
            ParamKind::IntRange { min: 0, max: 10 },
        );
        let out = ParameterSpec::option(
            "out",
            "--out",
            ParamKind::Path(PathConstraints::default()),
        );
        let tree = CommandNode::Leaf(CommandLeaf {
            name: "render".into(),
            params: vec![level, out],
            run: Rc::new(|_| DispatchOutcome::Ready(Ok(()))),
        });

        let handle = present_form(&tree, &dyn_toolkit, &dyn_surface).expect("form");
        let controller = handle.controller(&["render"]).expect("controller");

        // No default: the slider starts at the midpoint.
        assert_eq!(
            controller.preview_tokens(),
            vec!["render", "--level", "5", "--out", ""]
        );
        toolkit.sliders()[0].set_value(8);
        toolkit.path_entries()[0].pick("/tmp/out.png");
        assert_eq!(
            controller.preview_tokens(),
            vec!["render", "--level", "8", "--out", "/tmp/out.png"]
        );
    }

    #[test]
    fn variadic_option_grows_rows_and_prefixes_its_flag_once() {
        let _ = leptos::create_runtime();
        let (toolkit, dyn_toolkit, _surface, dyn_surface) = harness();

        let mut tag = ParameterSpec::option("tag", "--tag", ParamKind::Text);
        tag.arity = Arity::Variadic;
        let tree = CommandNode::Leaf(CommandLeaf {
            name: "push".into(),
            params: vec![tag],
            run: Rc::new(|_| DispatchOutcome::Ready(Ok(()))),
        });

        let handle = present_form(&tree, &dyn_toolkit, &dyn_surface).expect("form");
        let controller = handle.controller(&["push"]).expect("controller");
        let list = toolkit.slot_lists()[0].clone();

        list.edit_row(0, "a");
        list.press_add(&[0]);
        list.edit_row(1, "b");
        assert_eq!(controller.preview_tokens(), vec!["push", "--tag", "a", "b"]);
        assert_eq!(list.rows().len(), 2);
        assert!(!list.rows()[0].muted);
    }

    #[test]
    fn group_renders_tab_panels_and_flattens_ancestor_segments() {
        let _ = leptos::create_runtime();
        let (toolkit, dyn_toolkit, surface, dyn_surface) = harness();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let verbose = ParameterSpec::option("verbose", "-v", ParamKind::Counter);
        let url = ParameterSpec::positional("url", ParamKind::Text);
        let name = ParameterSpec::positional("name", ParamKind::Text);
        let tree = CommandNode::Group(CommandGroup {
            name: "remote".into(),
            params: vec![verbose],
            children: vec![
                CommandNode::Leaf(CommandLeaf {
                    name: "add".into(),
                    params: vec![url],
                    run: recording_handler(&seen),
                }),
                CommandNode::Leaf(CommandLeaf {
                    name: "remove".into(),
                    params: vec![name],
                    run: Rc::new(|_| DispatchOutcome::Ready(Ok(()))),
                }),
            ],
        });

        let handle = present_form(&tree, &dyn_toolkit, &dyn_surface).expect("form");
        assert_eq!(surface.tab_titles(), vec!["add", "remove"]);
        // Group-level parameter rows live on the group surface, not inside the tabs.
        assert_eq!(surface.rows().len(), 1);

        toolkit.steppers()[0].set_value(2);
        let add_tab = surface.tab("add").expect("tab");
        toolkit.text_entries()[0].type_text("https://x");
        add_tab.press_run(0);

        assert_eq!(
            seen.borrow().as_slice(),
            &[vec![
                "remote".to_string(),
                "-v".into(),
                "-v".into(),
                "add".into(),
                "https://x".into(),
            ]]
        );
        assert!(handle.controller(&["remote", "remove"]).is_some());
        assert!(handle.controller(&["remove"]).is_none());
    }

    #[test]
    fn unsupported_kind_aborts_with_no_partial_form() {
        let _ = leptos::create_runtime();
        let (toolkit, dyn_toolkit, surface, dyn_surface) = harness();

        let fine = ParameterSpec::positional("name", ParamKind::Text);
        let broken = ParameterSpec::option(
            "mode",
            "--mode",
            ParamKind::Choice { options: Vec::new() },
        );
        let tree = CommandNode::Group(CommandGroup {
            name: "top".into(),
            params: Vec::new(),
            children: vec![
                CommandNode::Leaf(CommandLeaf {
                    name: "first".into(),
                    params: vec![fine],
                    run: Rc::new(|_| DispatchOutcome::Ready(Ok(()))),
                }),
                CommandNode::Leaf(CommandLeaf {
                    name: "second".into(),
                    params: vec![broken],
                    run: Rc::new(|_| DispatchOutcome::Ready(Ok(()))),
                }),
            ],
        });

        let error = present_form(&tree, &dyn_toolkit, &dyn_surface)
            .err()
            .expect("build must fail");
        assert!(matches!(error, FormBuildError::InvalidSpec { ref parameter, .. } if parameter == "mode"));
        assert_eq!(surface.rows().len(), 0);
        assert_eq!(surface.tab_titles(), Vec::<String>::new());
        assert_eq!(toolkit.text_entries().len(), 0);
    }

    #[test]
    fn empty_registry_rejects_builtin_kinds() {
        let _ = leptos::create_runtime();
        let (_toolkit, dyn_toolkit, _surface, dyn_surface) = harness();

        let tree = CommandNode::Leaf(CommandLeaf {
            name: "noop".into(),
            params: vec![ParameterSpec::positional("name", ParamKind::Text)],
            run: Rc::new(|_| DispatchOutcome::Ready(Ok(()))),
        });

        let error = build_form(
            &tree,
            &dyn_toolkit,
            &dyn_surface,
            &TypeWidgetRegistry::empty(),
        )
        .err()
        .expect("build must fail");
        assert_eq!(
            error.to_string(),
            "parameter `name` has kind `text` with no registered widget factory"
        );
    }

    #[test]
    fn custom_kind_bypasses_the_registry() {
        let _ = leptos::create_runtime();
        let (_toolkit, dyn_toolkit, _surface, dyn_surface) = harness();

        let custom = ParameterSpec::option(
            "auth",
            "--auth",
            ParamKind::Custom(Rc::new(|_request| {
                WidgetBinding::new(
                    Rc::new(|| vec!["--auth".into(), "token".into()]),
                    Vec::new(),
                )
            })),
        );
        let tree = CommandNode::Leaf(CommandLeaf {
            name: "login".into(),
            params: vec![custom],
            run: Rc::new(|_| DispatchOutcome::Ready(Ok(()))),
        });

        // Even an empty registry accepts custom kinds.
        let handle = build_form(
            &tree,
            &dyn_toolkit,
            &dyn_surface,
            &TypeWidgetRegistry::empty(),
        )
        .expect("form");
        let controller = handle.controller(&["login"]).expect("controller");
        assert_eq!(
            controller.preview_tokens(),
            vec!["login", "--auth", "token"]
        );
    }

    #[test]
    fn dropping_the_handle_discards_later_completions() {
        let _ = leptos::create_runtime();
        let (_toolkit, dyn_toolkit, surface, dyn_surface) = harness();

        let captured = Rc::new(RefCell::new(None));
        let handler: RunHandler = {
            let captured = Rc::clone(&captured);
            Rc::new(move |request: RunRequest| {
                *captured.borrow_mut() = Some(request.done);
                DispatchOutcome::Pending
            })
        };
        let tree = CommandNode::Leaf(CommandLeaf {
            name: "slow".into(),
            params: Vec::new(),
            run: handler,
        });

        let handle = present_form(&tree, &dyn_toolkit, &dyn_surface).expect("form");
        surface.press_run(0);
        drop(handle);

        let done = captured.borrow_mut().take().expect("captured completion");
        done(Err(command_form_contract::ValidationError::new("late")));
        assert_eq!(surface.failures(), Vec::new());
    }

    #[test]
    fn fixed_tuple_renders_locked_rows_with_per_slot_ghosts() {
        let _ = leptos::create_runtime();
        let (toolkit, dyn_toolkit, _surface, dyn_surface) = harness();

        let mut pair = ParameterSpec::option("pair", "--pair", ParamKind::Text);
        pair.arity = Arity::FixedTuple { len: 2 };
        pair.slot_kinds = vec![ParamKind::Integer, ParamKind::Text];
        let tree = CommandNode::Leaf(CommandLeaf {
            name: "place".into(),
            params: vec![pair],
            run: Rc::new(|_| DispatchOutcome::Ready(Ok(()))),
        });

        let handle = present_form(&tree, &dyn_toolkit, &dyn_surface).expect("form");
        let controller = handle.controller(&["place"]).expect("controller");
        let list = toolkit.slot_lists()[0].clone();

        assert!(!list.mutable_rows());
        assert_eq!(list.rows().len(), 2);
        assert_eq!(list.rows()[0].ghost, "integer");
        assert_eq!(list.rows()[1].ghost, "text");

        // Fixed editors carry no add/delete wiring; gestures change nothing.
        list.press_add(&[0]);
        list.press_delete(&[0]);
        assert_eq!(list.rows().len(), 2);

        list.edit_row(0, "8");
        list.edit_row(1, "east");
        assert_eq!(
            controller.preview_tokens(),
            vec!["place", "--pair", "8", "east"]
        );
    }

    #[test]
    fn masked_entries_and_slider_defaults_follow_the_parameter_fields() {
        let _ = leptos::create_runtime();
        let (toolkit, dyn_toolkit, _surface, dyn_surface) = harness();

        let mut secret = ParameterSpec::option("secret", "--secret", ParamKind::Text);
        secret.mask_input = true;
        secret.default = Some(ParamDefault::Text {
            value: "hunter2".into(),
        });
        let mut level = ParameterSpec::option(
            "level",
            "--level",
            ParamKind::IntRange { min: 0, max: 10 },
        );
        level.default = Some(ParamDefault::Int { value: 42 });
        let tree = CommandNode::Leaf(CommandLeaf {
            name: "login".into(),
            params: vec![secret, level],
            run: Rc::new(|_| DispatchOutcome::Ready(Ok(()))),
        });

        let handle = present_form(&tree, &dyn_toolkit, &dyn_surface).expect("form");
        let controller = handle.controller(&["login"]).expect("controller");

        assert!(toolkit.text_entries()[0].masked());
        // Out-of-range default clamps to the slider bounds.
        assert_eq!(
            controller.preview_tokens(),
            vec!["login", "--secret", "hunter2", "--level", "10"]
        );
    }
}
