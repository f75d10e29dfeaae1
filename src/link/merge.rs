use crate::math::{horizontal, midpoint, Point3, Rotation, Vector3, TOLERANCE};

use super::{LinkCandidate, LinkSpan, PlacementFrame};

/// Merges an ordered run of candidates from one edge into spans.
///
/// The expected advance between neighbours is `step` along the direction
/// from the first to the last candidate's start. A candidate joins the
/// current run when its end sits one expected advance past the run's
/// right bound (squared error below `epsilon_sq`), growing the run's
/// width by `step`; otherwise the run is closed and a new one begins.
#[must_use]
pub fn merge_candidates(candidates: &[LinkCandidate], step: f64, epsilon_sq: f64) -> Vec<LinkSpan> {
    let (Some(first), Some(last)) = (candidates.first(), candidates.last()) else {
        return Vec::new();
    };

    let direction = (last.start - first.start)
        .try_normalize(TOLERANCE)
        .unwrap_or_else(Vector3::zeros);
    let advance = direction * step;

    let mut spans = Vec::new();
    let mut left = *first;
    let mut right = *first;

    for candidate in &candidates[1..] {
        let actual = candidate.end - right.end;
        if (actual - advance).norm_squared() < epsilon_sq {
            left.width += step;
            right = *candidate;
        } else {
            spans.push(close_run(&left, &right));
            left = *candidate;
            right = *candidate;
        }
    }
    spans.push(close_run(&left, &right));
    spans
}

/// Builds the span covering `left..=right`.
///
/// The frame sits at the midpoint of the two starts. Its rotation takes
/// the horizontal projection of the left-to-right displacement onto the
/// displacement itself, so a sloped edge tilts the frame while a level
/// one leaves it unrotated. Start and end are stored relative to the
/// origin; the rotation only orients the span.
fn close_run(left: &LinkCandidate, right: &LinkCandidate) -> LinkSpan {
    let start_mid = midpoint(&left.start, &right.start);
    let end_mid = midpoint(&left.end, &right.end);

    let across = right.start - left.start;
    let rotation = Rotation::rotation_between(&horizontal(&across), &across)
        .unwrap_or_else(Rotation::identity);

    LinkSpan {
        start: Point3::origin(),
        end: Point3::from(end_mid - start_mid),
        width: left.width,
        frame: PlacementFrame {
            origin: start_mid,
            rotation,
        },
    }
}
