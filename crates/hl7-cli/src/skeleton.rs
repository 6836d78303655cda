//! Builds a message skeleton: every required slot materialised.

use std::rc::Rc;

use hl7_model::{
    FieldValue, GenericPrimitive, GroupRef, Hl7Version, Message, ModelClassFactory, ModelContext,
    ModelError, ModelOptions, Result, Structure, StructureType, Varies,
};
use tracing::{debug, info};

const FIELD_SEPARATOR: &str = "|";
const ENCODING_CHARACTERS: &str = "^~\\&";

#[derive(Debug, Clone)]
pub struct SkeletonOptions {
    pub version: Hl7Version,
    /// Non-standard segments appended after the declared slots.
    pub append: Vec<String>,
    /// Repetitions created for required repeating slots (at least one).
    pub repeat: usize,
    /// Reject unknown segment names and fields past the declared count.
    pub strict: bool,
}

impl Default for SkeletonOptions {
    fn default() -> Self {
        Self {
            version: Hl7Version::V2_5,
            append: Vec::new(),
            repeat: 1,
            strict: false,
        }
    }
}

/// Builds `message_name`, falling back to a generic message when the factory
/// has no definition for it.
pub fn build_skeleton(
    message_name: &str,
    factory: Rc<dyn ModelClassFactory>,
    options: &SkeletonOptions,
) -> Result<Message> {
    let model_options = if options.strict {
        ModelOptions::strict()
    } else {
        ModelOptions::default()
    };
    let structure_type = match factory.message_type(message_name, options.version) {
        Some(structure_type) => structure_type,
        None => {
            info!(message = message_name, version = %options.version, "no definition, using a generic message");
            StructureType::generic_group(message_name)
        }
    };
    let context = ModelContext::new(factory)
        .with_version(options.version)
        .with_options(model_options);
    let message = Message::from_context(&structure_type, context)?;

    if message.is_generic() {
        message.root().borrow_mut().insert_unknown("MSH", 0)?;
    }
    materialise_required(message.root(), options.repeat.max(1))?;
    fill_header(&message, options.version)?;

    for name in &options.append {
        let slot = message.append_unknown(name)?;
        message.get(&slot, 0)?;
    }
    Ok(message)
}

fn materialise_required(group: &GroupRef, repeat: usize) -> Result<()> {
    let slots: Vec<(String, bool, bool)> = group
        .borrow()
        .items()
        .iter()
        .map(|item| {
            (
                item.name().to_string(),
                item.is_required(),
                item.is_repeating(),
            )
        })
        .collect();
    for (name, required, repeating) in slots {
        // The header is built even where the grammar leaves it optional.
        if !required && name != "MSH" {
            continue;
        }
        let count = if repeating { repeat } else { 1 };
        for rep in 0..count {
            let instance = group.borrow_mut().get(&name, rep)?;
            debug!(slot = %name, rep, "materialised");
            if let Structure::Group(child) = instance {
                materialise_required(&child, repeat)?;
            }
        }
    }
    Ok(())
}

fn fill_header(message: &Message, version: Hl7Version) -> Result<()> {
    let Some(msh) = message.get("MSH", 0)?.as_segment().cloned() else {
        return Err(ModelError::WrongKind {
            name: "MSH".to_string(),
            expected: hl7_model::StructureKind::Segment,
        });
    };
    let message_type = message.name().replacen('_', "^", 1);
    let mut msh = msh.borrow_mut();
    set_text(msh.field_rep(1, 0)?, FIELD_SEPARATOR)?;
    set_text(msh.field_rep(2, 0)?, ENCODING_CHARACTERS)?;
    set_text(msh.field_rep(9, 0)?, &message_type)?;
    set_text(msh.field_rep(12, 0)?, version.as_str())?;
    Ok(())
}

fn set_text(value: &mut dyn FieldValue, text: &str) -> Result<()> {
    if let Some(primitive) = value.downcast_mut::<GenericPrimitive>() {
        primitive.set_value(text);
        return Ok(());
    }
    if let Some(varies) = value.downcast_mut::<Varies>() {
        varies.set_value(text);
        return Ok(());
    }
    Err(ModelError::Definition(format!(
        "{} values can't hold text",
        value.type_name()
    )))
}
