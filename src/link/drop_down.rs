use tracing::trace;

use crate::config::BakeConfig;
use crate::math::{Point3, Vector3};
use crate::world::SpatialQuery;

use super::generator::LinkGenerator;
use super::LinkCandidate;

/// Links that step off a ledge and fall onto walkable surface below.
///
/// Each sample is pushed `drop_distance` past the edge. The pushed point
/// must be clear of solids at agent radius and a downward ray from it
/// must hit within `max_drop_height`. The hit must then snap onto the
/// walkable surface within agent radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropDownGenerator {
    pub agent_radius: f64,
    pub max_drop_height: f64,
    pub drop_distance: f64,
    pub sample_step: f64,
}

impl DropDownGenerator {
    #[must_use]
    pub fn from_config(config: &BakeConfig) -> Self {
        Self {
            agent_radius: config.agent_radius,
            max_drop_height: config.max_drop_height,
            drop_distance: config.drop_distance,
            sample_step: config.sample_step(),
        }
    }

    fn landing<Q: SpatialQuery + ?Sized>(&self, query: &Q, target: &Point3) -> Option<Point3> {
        if query.check_solid_overlap(target, self.agent_radius) {
            trace!(?target, "drop target is obstructed");
            return None;
        }
        let Some(hit) = query.raycast_down(target, self.max_drop_height) else {
            trace!(?target, "nothing below drop target");
            return None;
        };
        let landing = query.sample_walkable_surface(&hit, self.agent_radius);
        if landing.is_none() {
            trace!(?hit, "drop hit is not walkable");
        }
        landing
    }
}

impl LinkGenerator for DropDownGenerator {
    fn generate_link_candidates<Q: SpatialQuery + ?Sized>(
        &self,
        query: &Q,
        normal: &Vector3,
        samples: &[Point3],
    ) -> Vec<LinkCandidate> {
        let offset = normal * self.drop_distance;
        samples
            .iter()
            .filter_map(|sample| {
                let end = self.landing(query, &(sample + offset))?;
                Some(LinkCandidate {
                    start: *sample,
                    end,
                    width: self.sample_step,
                })
            })
            .collect()
    }
}
