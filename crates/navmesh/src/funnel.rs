//! String pulling through a portal corridor
//!
//! Implements the "simple stupid funnel algorithm": the funnel is a pair of
//! rays from the current apex through the tightest left and right portal
//! points seen so far. A portal point that narrows the funnel replaces its
//! side. A point that crosses the opposite side makes that side's point a
//! corner of the path; the apex moves there and the scan restarts right after
//! the portal the new apex came from.

use glam::Vec3;
use navmesh_common::{dist_point_segment_sqr_2d, tri_area_2d, v_equal_2d};

use crate::portal::Portal;

/// Squared XZ distance under which the start point counts as lying on the first portal
const START_ON_PORTAL_SQR: f32 = 0.001 * 0.001;

/// Appends `point` unless it repeats the last waypoint
fn push_waypoint(waypoints: &mut Vec<Vec3>, point: Vec3, apex_epsilon: f32) {
    if let Some(&last) = waypoints.last() {
        if v_equal_2d(last, point, apex_epsilon) {
            return;
        }
    }
    waypoints.push(point);
}

/// Pulls a taut path from `start` to `end` through `portals`.
///
/// The result always begins with `start` and ends with `end`. Corners closer
/// than `apex_epsilon` (squared XZ distance) to the previous waypoint are
/// dropped.
pub(crate) fn string_pull(start: Vec3, end: Vec3, portals: &[Portal], apex_epsilon: f32) -> Vec<Vec3> {
    // Start and end act as zero-width portals
    let mut points = Vec::with_capacity(portals.len() + 2);
    points.push((start, start));
    points.extend(portals.iter().map(|p| (p.left, p.right)));
    points.push((end, end));

    let v_equal = |a: Vec3, b: Vec3| v_equal_2d(a, b, apex_epsilon);

    let mut waypoints = vec![start];
    let mut apex = start;
    let mut left = start;
    let mut right = start;
    let mut left_index = 0;
    let mut right_index = 0;

    // The apex index only moves forward, so each portal is revisited at most once per corner
    let max_steps = points.len() * points.len();
    let mut steps = 0;
    let mut i = 1;

    while i < points.len() {
        steps += 1;
        if steps > max_steps {
            log::warn!("Funnel gave up after {max_steps} steps over {} portals", portals.len());
            break;
        }

        let (portal_left, portal_right) = points[i];

        // A start on the first portal leaves the funnel with zero width, skip it
        if i == 1
            && !portals.is_empty()
            && dist_point_segment_sqr_2d(apex, portal_left, portal_right) < START_ON_PORTAL_SQR
        {
            i += 1;
            continue;
        }

        // Right side
        if tri_area_2d(apex, right, portal_right) <= 0.0 {
            if v_equal(apex, right) || tri_area_2d(apex, left, portal_right) > 0.0 {
                right = portal_right;
                right_index = i;
            } else {
                // Right crossed over left: left becomes a corner
                push_waypoint(&mut waypoints, left, apex_epsilon);
                apex = left;
                let apex_index = left_index;
                right = apex;
                right_index = apex_index;
                i = apex_index + 1;
                continue;
            }
        }

        // Left side
        if tri_area_2d(apex, left, portal_left) >= 0.0 {
            if v_equal(apex, left) || tri_area_2d(apex, right, portal_left) < 0.0 {
                left = portal_left;
                left_index = i;
            } else {
                // Left crossed over right: right becomes a corner
                push_waypoint(&mut waypoints, right, apex_epsilon);
                apex = right;
                let apex_index = right_index;
                left = apex;
                left_index = apex_index;
                i = apex_index + 1;
                continue;
            }
        }

        i += 1;
    }

    // The end point is exact even when the funnel already emitted its XZ position
    let count = waypoints.len();
    if count > 1 && v_equal(waypoints[count - 1], end) {
        waypoints[count - 1] = end;
    } else {
        waypoints.push(end);
    }

    waypoints
}
