use nalgebra::Point3;

use crate::astro::readout::PhysicsReadout;
use crate::model::{Body, BodyID};

/// A copy of a body taken when it was selected, for the detail panel. It is
/// not updated as the body moves on; selecting again takes a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedBody {
    pub id: BodyID,
    pub name: String,
    pub color: Point3<f32>,
    pub icon: Option<String>,
    pub semimajor_axis: f64,
    pub eccentricity: f64,
    pub base_size: f64,
    pub readout: PhysicsReadout,
}

impl SelectedBody {
    fn of(body: &Body) -> Self {
        Self {
            id: body.id,
            name: body.info.name.clone(),
            color: body.info.color,
            icon: body.info.icon.clone(),
            semimajor_axis: body.orbit().semimajor_axis(),
            eccentricity: body.orbit().eccentricity(),
            base_size: body.base_size(),
            readout: PhysicsReadout::of(body),
        }
    }
}

/// Holds at most one selection. Selecting again just replaces it.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    selected: Option<SelectedBody>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, body: &Body) -> &SelectedBody {
        log::debug!("selected {} ({:?})", body.info.name, body.id);
        self.selected.insert(SelectedBody::of(body))
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<&SelectedBody> {
        self.selected.as_ref()
    }

    pub fn selected_id(&self) -> Option<BodyID> {
        self.selected.as_ref().map(|s| s.id)
    }

    /// Drops the selection if its body is no longer in `bodies`.
    pub fn forget_missing(&mut self, bodies: &[Body]) {
        let id = match self.selected_id() {
            Some(id) => id,
            None => return,
        };
        if !bodies.iter().any(|b| b.id == id) {
            log::debug!("selected body {:?} went away", id);
            self.selected = None;
        }
    }
}
