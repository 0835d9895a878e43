//! Parallel decoration classification over a world or a template table.
//!
//! Each worker thread reuses one [`ReachQuery`] for all the things it
//! classifies; the content tables are shared read-only.

use std::collections::BTreeSet;

use rayon::prelude::*;
use thing_core::{Content, DecorationClassifier, ReachQuery, TemplateId, ThingKey, World};

/// Classification of one live thing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanHit {
    pub key: ThingKey,
    pub serial: u32,
    pub permanent: bool,
}

pub struct DecorationScan<'a> {
    content: &'a Content,
}

impl<'a> DecorationScan<'a> {
    pub fn new(content: &'a Content) -> Self {
        Self { content }
    }

    /// Classifies every live thing, in serial order.
    pub fn scan_world(&self, world: &World) -> Vec<ScanHit> {
        let things: Vec<_> = world.iter().collect();
        let classifier = DecorationClassifier::new(self.content);
        let mut hits: Vec<ScanHit> = things
            .par_iter()
            .map_init(ReachQuery::new, |query, (key, thing)| ScanHit {
                key: *key,
                serial: thing.serial,
                permanent: classifier.classify_thing(query, thing),
            })
            .collect();
        hits.sort_by_key(|hit| hit.serial);
        tracing::debug!(
            target: "runtime::scan",
            things = hits.len(),
            permanent = hits.iter().filter(|hit| hit.permanent).count(),
            "world scanned"
        );
        hits
    }

    /// Serials of the live things that are permanent solid decorations.
    pub fn permanent_serials(&self, world: &World) -> BTreeSet<u32> {
        self.scan_world(world)
            .into_iter()
            .filter(|hit| hit.permanent)
            .map(|hit| hit.serial)
            .collect()
    }

    /// Templates whose fresh instances are permanent solid decorations.
    pub fn permanent_templates(&self) -> Vec<TemplateId> {
        let templates: Vec<_> = self.content.templates.iter().collect();
        let classifier = DecorationClassifier::new(self.content);
        let mut ids: Vec<TemplateId> = templates
            .par_iter()
            .filter(|(_, template)| classifier.is_permanent_solid_template(template))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}
