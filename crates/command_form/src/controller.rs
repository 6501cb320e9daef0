//! Submission lifecycle for one leaf command's form.
//!
//! The controller owns no widgets; it reads them through the bound sections at submit
//! time. Submission state, the last dispatch failure, and the event log are exposed as
//! reactive signals so hosts can render them without polling.

use std::cell::Cell;
use std::rc::Rc;

use command_form_contract::{
    DispatchDone, DispatchOutcome, FormEvent, FormSurface, RunHandler, RunRequest,
    SubmitPhase, ValidationError,
};
use leptos::{
    create_rw_signal, ReadSignal, RwSignal, SignalGetUntracked, SignalSet, SignalUpdate,
};

use crate::synthesize::{synthesize, FormSection};

/// Drives submissions for one leaf command.
pub struct CommandFormController {
    prefix: Vec<Rc<FormSection>>,
    section: Rc<FormSection>,
    run: RunHandler,
    surface: Rc<dyn FormSurface>,
    phase: RwSignal<SubmitPhase>,
    last_failure: RwSignal<Option<ValidationError>>,
    events: RwSignal<Vec<FormEvent>>,
    submission: Cell<u64>,
    alive: Cell<bool>,
}

impl CommandFormController {
    /// Creates a controller over already-bound sections. `prefix` holds the ancestor group
    /// segments from the root down; `section` is the leaf's own segment.
    pub fn new(
        prefix: Vec<Rc<FormSection>>,
        section: Rc<FormSection>,
        run: RunHandler,
        surface: Rc<dyn FormSurface>,
    ) -> Rc<Self> {
        Rc::new(Self {
            prefix,
            section,
            run,
            surface,
            phase: create_rw_signal(SubmitPhase::Idle),
            last_failure: create_rw_signal(None),
            events: create_rw_signal(Vec::new()),
            submission: Cell::new(0),
            alive: Cell::new(true),
        })
    }

    /// Reactive submission phase.
    pub fn phase(&self) -> ReadSignal<SubmitPhase> {
        self.phase.read_only()
    }

    /// Reactive view of the most recent dispatch failure, cleared by the next success.
    pub fn last_failure(&self) -> ReadSignal<Option<ValidationError>> {
        self.last_failure.read_only()
    }

    /// Reactive append-only event log.
    pub fn events(&self) -> ReadSignal<Vec<FormEvent>> {
        self.events.read_only()
    }

    /// Token vector the form would submit right now. Pure read; widget state is untouched.
    pub fn preview_tokens(&self) -> Vec<String> {
        synthesize(&self.prefix, &self.section)
    }

    /// Synthesizes the current token vector and hands it to the dispatch handler. Ignored
    /// while a previous submission is still in flight.
    pub fn submit(self: &Rc<Self>) {
        if self.phase.get_untracked() == SubmitPhase::Submitting {
            return;
        }
        let submission = self.submission.get().saturating_add(1);
        self.submission.set(submission);
        let tokens = self.preview_tokens();
        self.phase.set(SubmitPhase::Submitting);
        self.events.update(|log| {
            log.push(FormEvent::Started {
                submission,
                tokens: tokens.clone(),
            })
        });

        let done: DispatchDone = {
            let controller = Rc::downgrade(self);
            Rc::new(move |result| {
                if let Some(controller) = controller.upgrade() {
                    controller.finish(submission, result);
                }
            })
        };
        match (self.run)(RunRequest { tokens, done }) {
            DispatchOutcome::Ready(result) => self.finish(submission, result),
            DispatchOutcome::Pending => {}
        }
    }

    /// Applies one dispatch completion. Completions for stale submissions, duplicate
    /// completions, and completions after [`CommandFormController::deactivate`] are logged
    /// and otherwise dropped.
    pub fn finish(&self, submission: u64, result: Result<(), ValidationError>) {
        let stale = !self.alive.get()
            || submission != self.submission.get()
            || self.phase.get_untracked() == SubmitPhase::Idle;
        if stale {
            self.events
                .update(|log| log.push(FormEvent::CompletionDiscarded { submission }));
            return;
        }
        self.phase.set(SubmitPhase::Idle);
        match result {
            Ok(()) => {
                self.last_failure.set(None);
                self.events
                    .update(|log| log.push(FormEvent::Succeeded { submission }));
            }
            Err(error) => {
                self.surface.show_failure(&error);
                self.last_failure.set(Some(error.clone()));
                self.events
                    .update(|log| log.push(FormEvent::Failed { submission, error }));
            }
        }
    }

    /// Detaches the controller from its surface; later completions are discarded.
    pub fn deactivate(&self) {
        self.alive.set(false);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use command_form_contract::{ParamKind, ParameterSpec, WidgetBinding};
    use pretty_assertions::assert_eq;
    use widget_toolkit_headless::HeadlessSurface;

    use crate::binder::BoundParameter;

    use super::*;

    fn leaf_section(tokens: &[&str]) -> Rc<FormSection> {
        let tokens: Vec<String> = tokens.iter().map(|token| token.to_string()).collect();
        Rc::new(FormSection {
            name: "send".into(),
            bindings: vec![BoundParameter {
                spec: ParameterSpec::option("mode", "--mode", ParamKind::Text),
                binding: WidgetBinding::new(Rc::new(move || tokens.clone()), Vec::new()),
            }],
        })
    }

    fn ready_ok_handler() -> RunHandler {
        Rc::new(|_request| DispatchOutcome::Ready(Ok(())))
    }

    fn deferring_handler(captured: &Rc<RefCell<Option<DispatchDone>>>) -> RunHandler {
        let captured = Rc::clone(captured);
        Rc::new(move |request: RunRequest| {
            *captured.borrow_mut() = Some(request.done);
            DispatchOutcome::Pending
        })
    }

    fn controller_over(
        handler: RunHandler,
    ) -> (Rc<CommandFormController>, Rc<HeadlessSurface>) {
        let surface = Rc::new(HeadlessSurface::default());
        let controller = CommandFormController::new(
            Vec::new(),
            leaf_section(&["--mode", "fast"]),
            handler,
            surface.clone() as Rc<dyn FormSurface>,
        );
        (controller, surface)
    }

    #[test]
    fn synchronous_success_returns_to_idle() {
        let _ = leptos::create_runtime();
        let (controller, _surface) = controller_over(ready_ok_handler());

        controller.submit();

        assert_eq!(controller.phase().get_untracked(), SubmitPhase::Idle);
        assert_eq!(
            controller.events().get_untracked(),
            vec![
                FormEvent::Started {
                    submission: 1,
                    tokens: vec!["send".into(), "--mode".into(), "fast".into()],
                },
                FormEvent::Succeeded { submission: 1 },
            ]
        );
    }

    #[test]
    fn failure_is_surfaced_and_kept_until_the_next_success() {
        let _ = leptos::create_runtime();
        let error = ValidationError::for_parameter("mode", "unknown mode");
        let results = Rc::new(RefCell::new(vec![Ok(()), Err(error.clone())]));
        let handler: RunHandler = {
            let results = Rc::clone(&results);
            Rc::new(move |_request| DispatchOutcome::Ready(results.borrow_mut().pop().expect("scripted result")))
        };
        let (controller, surface) = controller_over(handler);

        controller.submit();
        assert_eq!(controller.phase().get_untracked(), SubmitPhase::Idle);
        assert_eq!(controller.last_failure().get_untracked(), Some(error.clone()));
        assert_eq!(surface.failures(), vec![error]);

        controller.submit();
        assert_eq!(controller.last_failure().get_untracked(), None);
    }

    #[test]
    fn pending_submission_ignores_repeat_submits_until_done() {
        let _ = leptos::create_runtime();
        let captured = Rc::new(RefCell::new(None));
        let (controller, _surface) = controller_over(deferring_handler(&captured));

        controller.submit();
        controller.submit();
        controller.submit();
        assert_eq!(controller.phase().get_untracked(), SubmitPhase::Submitting);
        let started = controller
            .events()
            .get_untracked()
            .iter()
            .filter(|event| matches!(event, FormEvent::Started { .. }))
            .count();
        assert_eq!(started, 1);

        let done = captured.borrow_mut().take().expect("captured completion");
        done(Ok(()));
        assert_eq!(controller.phase().get_untracked(), SubmitPhase::Idle);

        controller.submit();
        assert!(matches!(
            controller.events().get_untracked().last(),
            Some(FormEvent::Started { submission: 2, .. })
        ));
    }

    #[test]
    fn completion_after_deactivation_is_discarded() {
        let _ = leptos::create_runtime();
        let captured = Rc::new(RefCell::new(None));
        let (controller, surface) = controller_over(deferring_handler(&captured));

        controller.submit();
        controller.deactivate();

        let done = captured.borrow_mut().take().expect("captured completion");
        done(Err(ValidationError::new("too late")));

        assert_eq!(
            controller.events().get_untracked().last(),
            Some(&FormEvent::CompletionDiscarded { submission: 1 })
        );
        assert_eq!(surface.failures(), Vec::new());
        assert_eq!(controller.last_failure().get_untracked(), None);
    }

    #[test]
    fn duplicate_completion_is_discarded() {
        let _ = leptos::create_runtime();
        let captured = Rc::new(RefCell::new(None));
        let handler: RunHandler = {
            let captured = Rc::clone(&captured);
            Rc::new(move |request: RunRequest| {
                *captured.borrow_mut() = Some(Rc::clone(&request.done));
                DispatchOutcome::Ready(Ok(()))
            })
        };
        let (controller, _surface) = controller_over(handler);

        controller.submit();
        let done = captured.borrow_mut().take().expect("captured completion");
        done(Ok(()));

        assert_eq!(
            controller.events().get_untracked(),
            vec![
                FormEvent::Started {
                    submission: 1,
                    tokens: vec!["send".into(), "--mode".into(), "fast".into()],
                },
                FormEvent::Succeeded { submission: 1 },
                FormEvent::CompletionDiscarded { submission: 1 },
            ]
        );
    }
}
