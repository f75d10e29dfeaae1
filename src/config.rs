use crate::error::{ConfigError, Result};
use crate::mesh::DedupMode;

/// Parameters for one bake.
///
/// Distances are in world units. `merge_epsilon` is compared against
/// squared distances; `cluster_epsilon` is a plain distance.
#[derive(Debug, Clone, PartialEq)]
pub struct BakeConfig {
    /// Radius of the traversing agent. Samples are two radii apart.
    pub agent_radius: f64,
    /// Voxel size the walkable surface was built with.
    pub cell_size: f64,
    /// Longest drop a link may bridge.
    pub max_drop_height: f64,
    /// How far past the edge drop targets are placed.
    pub drop_distance: f64,
    /// Squared-distance tolerance for direction and step comparisons.
    pub merge_epsilon: f64,
    /// Collapse distance for clustered vertex deduplication.
    pub cluster_epsilon: f64,
    /// Neighbours examined per vertex in clustered deduplication.
    pub cluster_neighbors: usize,
    /// Use clustered instead of exact vertex deduplication.
    pub clustered_dedup: bool,
    /// Merge adjacent candidates into wider spans.
    pub merge_spans: bool,
    /// Drop vertices buried under solid geometry before extracting edges.
    pub filter_obstructed_vertices: bool,
    /// Clearance sphere radius for the obstructed-vertex filter.
    pub clearance_radius: f64,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self::new(0.5, 1.0 / 6.0)
    }
}

impl BakeConfig {
    /// Creates a configuration for an agent, deriving `drop_distance` as
    /// two radii plus four cells.
    #[must_use]
    pub fn new(agent_radius: f64, cell_size: f64) -> Self {
        Self {
            agent_radius,
            cell_size,
            max_drop_height: 4.0,
            drop_distance: agent_radius * 2.0 + cell_size * 4.0,
            merge_epsilon: 1e-4,
            cluster_epsilon: 0.01,
            cluster_neighbors: 10,
            clustered_dedup: false,
            merge_spans: true,
            filter_obstructed_vertices: true,
            clearance_radius: 0.01,
        }
    }

    #[must_use]
    pub fn with_max_drop_height(mut self, height: f64) -> Self {
        self.max_drop_height = height;
        self
    }

    #[must_use]
    pub fn with_drop_distance(mut self, distance: f64) -> Self {
        self.drop_distance = distance;
        self
    }

    #[must_use]
    pub fn with_merge_epsilon(mut self, epsilon: f64) -> Self {
        self.merge_epsilon = epsilon;
        self
    }

    /// Switches to clustered deduplication.
    #[must_use]
    pub fn with_clustered_dedup(mut self, epsilon: f64, neighbors: usize) -> Self {
        self.clustered_dedup = true;
        self.cluster_epsilon = epsilon;
        self.cluster_neighbors = neighbors;
        self
    }

    #[must_use]
    pub fn with_merge_spans(mut self, merge: bool) -> Self {
        self.merge_spans = merge;
        self
    }

    #[must_use]
    pub fn with_vertex_filter(mut self, enabled: bool) -> Self {
        self.filter_obstructed_vertices = enabled;
        self
    }

    /// Checks that every length is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NonPositive` for a non-positive (or NaN)
    /// length and `ConfigError::Invalid` for a zero neighbour count in
    /// clustered mode.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("agent_radius", self.agent_radius),
            ("cell_size", self.cell_size),
            ("max_drop_height", self.max_drop_height),
            ("merge_epsilon", self.merge_epsilon),
            ("cluster_epsilon", self.cluster_epsilon),
            ("clearance_radius", self.clearance_radius),
        ];
        for (parameter, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { parameter, value }.into());
            }
        }
        if self.drop_distance.is_nan() || self.drop_distance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "drop_distance must not be negative, got {}",
                self.drop_distance
            ))
            .into());
        }
        if self.clustered_dedup && self.cluster_neighbors == 0 {
            return Err(ConfigError::Invalid(
                "cluster_neighbors must be at least 1".to_owned(),
            )
            .into());
        }
        Ok(())
    }

    /// Spacing between samples along an edge.
    #[must_use]
    pub fn sample_step(&self) -> f64 {
        self.agent_radius * 2.0
    }

    /// Search radius for the edge midpoint and checkpoint lookups.
    #[must_use]
    pub fn check_radius(&self) -> f64 {
        self.cell_size.max(self.agent_radius * 0.4 - self.cell_size)
    }

    /// Outward nudge applied to the edge midpoint before snapping.
    #[must_use]
    pub fn edge_nudge(&self) -> f64 {
        self.cell_size * 0.1
    }

    #[must_use]
    pub fn dedup_mode(&self) -> DedupMode {
        if self.clustered_dedup {
            DedupMode::Clustered {
                epsilon: self.cluster_epsilon,
                neighbors: self.cluster_neighbors,
            }
        } else {
            DedupMode::Exact
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LinkBakeError;
    use approx::assert_relative_eq;

    #[test]
    fn derived_quantities() {
        let config = BakeConfig::new(0.5, 0.1);
        assert_relative_eq!(config.sample_step(), 1.0);
        assert_relative_eq!(config.drop_distance, 1.4, epsilon = 1e-12);
        assert_relative_eq!(config.check_radius(), 0.1, epsilon = 1e-12);
        assert_relative_eq!(config.edge_nudge(), 0.01, epsilon = 1e-12);
        assert_eq!(config.dedup_mode(), DedupMode::Exact);
    }

    #[test]
    fn large_agent_widens_check_radius() {
        let config = BakeConfig::new(2.0, 0.1);
        assert_relative_eq!(config.check_radius(), 0.7, epsilon = 1e-12);
    }

    #[test]
    fn clustered_mode_carries_parameters() {
        let config = BakeConfig::default().with_clustered_dedup(0.05, 8);
        assert_eq!(
            config.dedup_mode(),
            DedupMode::Clustered {
                epsilon: 0.05,
                neighbors: 8
            }
        );
    }

    #[test]
    fn validate_rejects_bad_lengths() {
        assert!(BakeConfig::default().validate().is_ok());

        let err = BakeConfig::new(0.0, 0.1).validate();
        assert!(matches!(
            err,
            Err(LinkBakeError::Config(ConfigError::NonPositive {
                parameter: "agent_radius",
                ..
            }))
        ));

        let err = BakeConfig::new(0.5, f64::NAN).validate();
        assert!(matches!(
            err,
            Err(LinkBakeError::Config(ConfigError::NonPositive {
                parameter: "cell_size",
                ..
            }))
        ));

        let err = BakeConfig::default().with_clustered_dedup(0.01, 0).validate();
        assert!(matches!(err, Err(LinkBakeError::Config(ConfigError::Invalid(_)))));
    }
}
