//! Broad-phase spatial index over record bounding boxes.

use rstar::{RTree, RTreeObject, AABB};

use super::record::{EntityId, GeometryRecord};
use crate::geometry::AxisAlignedBox;

/// One record's box as stored in the R-tree.
#[derive(Debug, Clone, Copy)]
struct IndexedBox {
    envelope: AABB<[f64; 3]>,
    id: EntityId,
}

impl RTreeObject for IndexedBox {
    type Envelope = AABB<[f64; 3]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

fn to_aabb(b: &AxisAlignedBox) -> AABB<[f64; 3]> {
    AABB::from_corners(b.min.to_array(), b.max.to_array())
}

/// Bulk-loaded R*-tree answering box intersection queries.
///
/// Intersection is inclusive, so boxes that only touch are reported. With
/// both operands expanded by the distance tolerance this never misses a
/// pair whose geometry lies within that tolerance.
pub struct SpatialIndex {
    tree: RTree<IndexedBox>,
}

impl SpatialIndex {
    /// Build the index from all records in one pass.
    #[must_use]
    pub fn build(records: &[GeometryRecord]) -> Self {
        let items = records
            .iter()
            .map(|r| IndexedBox {
                envelope: to_aabb(&r.bbox),
                id: r.id,
            })
            .collect();
        Self {
            tree: RTree::bulk_load(items),
        }
    }

    /// Ids of every record whose box intersects `query`.
    pub fn query<'a>(&'a self, query: &AxisAlignedBox) -> impl Iterator<Item = EntityId> + 'a {
        let envelope = to_aabb(query);
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|item| item.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::duplicates::Payload;
    use crate::geometry::Point3;

    fn point_record(id: u64, x: f64) -> GeometryRecord {
        let p = Point3::new(x, 0.0, 0.0);
        GeometryRecord::new(EntityId(id), AxisAlignedBox::from_point(p), Payload::Point(p))
    }

    #[test]
    fn test_query_returns_intersecting() {
        let records: Vec<_> = (0..10).map(|i| point_record(i, i as f64)).collect();
        let index = SpatialIndex::build(&records);
        assert_eq!(index.len(), 10);

        let query = AxisAlignedBox::from_point(Point3::new(4.5, 0.0, 0.0)).expanded(1.0);
        let mut hits: Vec<u64> = index.query(&query).map(|id| id.0).collect();
        hits.sort_unstable();
        assert_eq!(hits, vec![4, 5]);
    }

    #[test]
    fn test_touching_boxes_are_reported() {
        let records = vec![point_record(1, 0.0), point_record(2, 0.5)];
        let index = SpatialIndex::build(&records);
        let query = records[0].bbox.expanded(0.5);
        let hits: Vec<EntityId> = index.query(&query).collect();
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::build(&[]);
        assert!(index.is_empty());
        let query = AxisAlignedBox::from_point(Point3::ORIGIN).expanded(100.0);
        assert_eq!(index.query(&query).count(), 0);
    }
}
