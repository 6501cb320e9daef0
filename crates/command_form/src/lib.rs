//! Form engine turning a declarative command tree into live widget forms and back into
//! command-line token vectors.
//!
//! The engine is toolkit-agnostic: hosts supply a
//! [`WidgetToolkit`](command_form_contract::WidgetToolkit) and a
//! [`FormSurface`](command_form_contract::FormSurface), and [`present_form`] binds every
//! parameter of the tree to widgets through the [`TypeWidgetRegistry`]. Each leaf gets a
//! [`CommandFormController`] that synthesizes the token vector and drives dispatch.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod binder;
mod controller;
mod dispatch;
mod editors;
mod error;
mod form;
mod list_model;
mod registry;
mod synthesize;

pub use binder::{bind_parameter, BoundParameter};
pub use controller::CommandFormController;
pub use dispatch::run_handler_from_future;
pub use editors::{float_validator, integer_validator, validator_for, ListEditor};
pub use error::FormBuildError;
pub use form::{build_form, present_form, FormHandle};
pub use list_model::{SlotId, SlotState, ValueListModel};
pub use registry::{KindTag, TypeWidgetRegistry, WidgetFactory, COUNTER_MAX};
pub use synthesize::{synthesize, FormSection};
