//! Token-vector synthesis from bound form sections.
//!
//! Synthesis is a pure read: it never mutates widget state and can run at any time, not
//! only at submit. Order is fixed by construction, ancestor group segments from the root
//! down, then the leaf segment, each segment contributing its name followed by its
//! parameters' tokens in declaration order.

use std::rc::Rc;

use crate::binder::BoundParameter;

/// One command segment: a command or group name plus its bound parameters.
pub struct FormSection {
    /// Segment name, emitted before the parameter tokens.
    pub name: String,
    /// Bound parameters in declaration order.
    pub bindings: Vec<BoundParameter>,
}

impl FormSection {
    /// Tokens contributed by this segment: its name, then each binding's read-back.
    pub fn read_tokens(&self) -> Vec<String> {
        let mut tokens = vec![self.name.clone()];
        for bound in &self.bindings {
            tokens.extend(bound.read_back());
        }
        tokens
    }
}

/// Synthesizes the full token vector for one leaf: every ancestor segment first, root
/// outward, then the leaf's own segment.
pub fn synthesize(prefix: &[Rc<FormSection>], leaf: &FormSection) -> Vec<String> {
    let mut tokens = Vec::new();
    for section in prefix {
        tokens.extend(section.read_tokens());
    }
    tokens.extend(leaf.read_tokens());
    tokens
}
