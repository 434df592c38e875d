use glam::Vec3;

use super::super::{BuildContext, Bvh, BvhBuilder, BvhPrimitives};
use crate::{Axis, BoundingBox};

/// Number of bins to use when looking for the optimal splitting plane¹.
///
/// With a pinch of salt: more is better, with the trade-off on performance.
///
/// ¹ see: binned SAH
const BINS: usize = 16;

/// Builds BVH using binned SAH.
///
/// Thanks to:
/// https://jacco.ompf2.com/2022/04/13/how-to-build-a-bvh-part-1-basics/.
#[derive(Clone, Copy, Debug, Default)]
pub struct SahBuilder;

impl BvhBuilder for SahBuilder {
    fn build(&self, primitives: &BvhPrimitives, leaf_capacity: usize) -> Bvh {
        let tri_order = (0..primitives.len() as u32).collect();

        BuildContext::new(primitives, leaf_capacity, tri_order).run(
            |primitives, bounds, ids| {
                let plane = find_splitting_plane(primitives, bounds, ids)?;

                Some(partition(primitives, ids, plane))
            },
        )
    }
}

#[derive(Clone, Copy, Debug)]
struct SplittingPlane {
    binning: Binning,

    /// Index of the last bin that goes into the left child.
    split_at: usize,
    split_cost: f32,
}

/// Maps centroids into bins spread evenly along a single axis.
#[derive(Clone, Copy, Debug)]
struct Binning {
    split_by: Axis,
    min: f32,
    scale: f32,
}

impl Binning {
    fn bin_of(&self, center: Vec3) -> usize {
        let bin = (center[self.split_by] - self.min) * self.scale;

        (bin as usize).min(BINS - 1)
    }
}

#[derive(Clone, Copy, Default, Debug)]
struct Bin {
    bounds: BoundingBox,
    count: u32,
}

/// Returns `None` if there's no plane that would put something on both
/// sides, which includes the case where all centroids coincide.
fn find_splitting_plane(
    primitives: &BvhPrimitives,
    bounds: BoundingBox,
    ids: &[u32],
) -> Option<SplittingPlane> {
    let centroid_bb = primitives.centers_of(ids);
    let extent = centroid_bb.extent();
    let split_by = Axis::dominant(extent);

    if extent[split_by] <= 0.0 {
        return None;
    }

    let binning = Binning {
        split_by,
        min: centroid_bb.min()[split_by],
        scale: (BINS as f32) / extent[split_by],
    };

    let mut bins = [Bin::default(); BINS];

    for &id in ids {
        let primitive = &primitives[id];
        let bin = &mut bins[binning.bin_of(primitive.center)];

        bin.bounds += primitive.bounds;
        bin.count += 1;
    }

    // ---

    let mut left_areas = [0.0; BINS - 1];
    let mut right_areas = [0.0; BINS - 1];
    let mut left_counts = [0; BINS - 1];
    let mut right_counts = [0; BINS - 1];
    let mut left_bb = BoundingBox::default();
    let mut right_bb = BoundingBox::default();
    let mut left_count = 0;
    let mut right_count = 0;

    for i in 0..(BINS - 1) {
        left_count += bins[i].count;
        left_counts[i] = left_count;

        left_bb += bins[i].bounds;
        left_areas[i] = left_bb.half_area();

        right_count += bins[BINS - 1 - i].count;
        right_counts[BINS - 2 - i] = right_count;

        right_bb += bins[BINS - 1 - i].bounds;
        right_areas[BINS - 2 - i] = right_bb.half_area();
    }

    // ---

    // Flat-along-everything nodes (e.g. collinear slivers) have no area to
    // normalize by; any positive constant preserves the ordering of costs
    let parent_area = bounds.half_area();
    let inv_parent_area = if parent_area > 0.0 {
        1.0 / parent_area
    } else {
        1.0
    };

    let mut best: Option<SplittingPlane> = None;

    for i in 0..(BINS - 1) {
        if left_counts[i] == 0 || right_counts[i] == 0 {
            continue;
        }

        let split_cost = left_areas[i] * inv_parent_area
            * (left_counts[i] as f32)
            + right_areas[i] * inv_parent_area * (right_counts[i] as f32);

        let is_current_bin_better =
            best.map_or(true, |best| split_cost < best.split_cost);

        if is_current_bin_better {
            best = Some(SplittingPlane {
                binning,
                split_at: i,
                split_cost,
            });
        }
    }

    best
}

/// Moves triangles on the left side of `plane` to the front of `ids` and
/// returns how many of them there are.
fn partition(
    primitives: &BvhPrimitives,
    ids: &mut [u32],
    plane: SplittingPlane,
) -> usize {
    let mut i = 0;
    let mut j = ids.len();

    while i < j {
        let center = primitives[ids[i]].center;

        if plane.binning.bin_of(center) <= plane.split_at {
            i += 1;
        } else {
            j -= 1;
            ids.swap(i, j);
        }
    }

    i
}
