//! Summaries of registered message definitions.

use std::rc::Rc;

use hl7_model::{Hl7Version, Message, ModelClassFactory, Result, TypeRegistry};

/// Top-level shape of one registered message definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSummary {
    pub name: String,
    pub version: Hl7Version,
    pub slots: Vec<String>,
    pub required: usize,
    pub repeating: usize,
}

/// Summarises every message registered for `version`, or for all versions.
pub fn list_messages(
    registry: &Rc<TypeRegistry>,
    version: Option<Hl7Version>,
) -> Result<Vec<MessageSummary>> {
    let versions = match version {
        Some(version) => vec![version],
        None => registry.versions(),
    };
    let factory: Rc<dyn ModelClassFactory> = Rc::clone(registry) as Rc<dyn ModelClassFactory>;
    let mut summaries = Vec::new();
    for version in versions {
        for structure_type in registry.messages(version) {
            let message = Message::new(structure_type, version, Rc::clone(&factory))?;
            let root = message.root().borrow();
            let mut required = 0;
            let mut repeating = 0;
            for item in root.items() {
                required += usize::from(item.is_required());
                repeating += usize::from(item.is_repeating());
            }
            summaries.push(MessageSummary {
                name: message.name(),
                version,
                slots: root.names().into_iter().map(str::to_string).collect(),
                required,
                repeating,
            });
        }
    }
    Ok(summaries)
}
