//! Thing definitions: flag words and immutable templates.
mod flags;
mod template;

pub use flags::{ThingFlagSet, ThingFlags, ThingFlags2};
pub use template::{
    StateSlot, StateSlots, TemplateId, TemplateTable, ThingSounds, ThingTemplate,
    ThingTemplateBuilder,
};
