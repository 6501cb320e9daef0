//! Pairs one parameter specification with its live editor and places the labeled row.

use std::rc::Rc;

use command_form_contract::{
    FormSurface, ParameterRowOptions, ParameterSpec, WidgetBinding, WidgetBuildRequest,
    WidgetToolkit,
};

use crate::error::FormBuildError;
use crate::registry::TypeWidgetRegistry;

/// One parameter bound to its on-screen editor.
#[derive(Clone)]
pub struct BoundParameter {
    /// Specification the binding was built from.
    pub spec: ParameterSpec,
    /// Live widgets plus token read-back.
    pub binding: WidgetBinding,
}

impl BoundParameter {
    /// Current value as command-line tokens.
    pub fn read_back(&self) -> Vec<String> {
        self.binding.read_back()
    }
}

/// Resolves `spec` through `registry` and appends its labeled row to `surface`. Bindings
/// without controls (possible for custom factories that lay themselves out) skip the row.
pub fn bind_parameter(
    registry: &TypeWidgetRegistry,
    spec: &ParameterSpec,
    toolkit: &Rc<dyn WidgetToolkit>,
    surface: &Rc<dyn FormSurface>,
) -> Result<BoundParameter, FormBuildError> {
    let binding = registry.resolve(WidgetBuildRequest {
        spec,
        toolkit,
        surface,
    })?;
    if let Some(control) = binding.controls().first() {
        surface.add_parameter_row(
            ParameterRowOptions {
                label: spec.name.clone(),
                help: spec.help.clone(),
                required: spec.required,
            },
            Rc::clone(control),
        );
    }
    Ok(BoundParameter {
        spec: spec.clone(),
        binding,
    })
}
