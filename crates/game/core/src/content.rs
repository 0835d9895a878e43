//! Loaded, immutable game content.

use crate::state::{State, StateError, StateNum, StateTable};
use crate::thing::{TemplateId, TemplateTable, ThingTemplate};

/// State table plus template table. Read-only after load and shared by live
/// simulation and static analysis.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub states: StateTable,
    pub templates: TemplateTable,
}

impl Content {
    pub fn new(states: StateTable, templates: TemplateTable) -> Self {
        Self { states, templates }
    }

    pub fn state(&self, num: StateNum) -> Result<&State, StateError> {
        self.states.state(num)
    }

    pub fn template(&self, id: TemplateId) -> Result<&ThingTemplate, StateError> {
        self.templates.get(id).ok_or(StateError::UnknownTemplate(id))
    }

    /// Looks a template up by name.
    pub fn find_template(&self, name: &str) -> Option<(TemplateId, &ThingTemplate)> {
        let id = self.templates.find(name)?;
        self.templates.get(id).map(|template| (id, template))
    }
}
