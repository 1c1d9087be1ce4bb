use kiddo::KdTree;
use kiddo::SquaredEuclidean;

/// 2D KD-tree over grid cell centers for nearest-cell hover lookup.
pub struct HoverTree {
    tree: KdTree<f64, 2>,
    len: usize,
}

impl HoverTree {
    /// Build from cell centers. The item stored for each point is its index
    /// in `centers`; non-finite centers are skipped.
    pub fn build(centers: &[[f64; 2]]) -> Self {
        let mut tree: KdTree<f64, 2> = KdTree::new();
        let mut len = 0;
        for (i, c) in centers.iter().enumerate() {
            if c[0].is_finite() && c[1].is_finite() {
                tree.add(c, i as u64);
                len += 1;
            }
        }
        Self { tree, len }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the nearest center and its Euclidean distance, or `None` if
    /// the tree holds no points.
    pub fn nearest(&self, qx: f64, qy: f64) -> Option<(usize, f64)> {
        if self.is_empty() {
            return None;
        }
        let result = self.tree.nearest_one::<SquaredEuclidean>(&[qx, qy]);
        Some((result.item as usize, result.distance.sqrt()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_nearest_center() {
        let centers = [[0.25, 0.25], [0.75, 0.25], [0.25, 0.75], [0.75, 0.75]];
        let tree = HoverTree::build(&centers);
        assert_eq!(tree.nearest(0.7, 0.8).map(|(i, _)| i), Some(3));
        assert_eq!(tree.nearest(0.1, 0.3).map(|(i, _)| i), Some(0));
        let (_, d) = tree.nearest(0.25, 0.25).unwrap();
        assert!(d.abs() < 1e-12);
    }

    #[test]
    fn skips_non_finite_points() {
        let centers = [[f64::NAN, 0.0], [0.5, 0.5]];
        let tree = HoverTree::build(&centers);
        assert_eq!(tree.nearest(0.0, 0.0).map(|(i, _)| i), Some(1));
    }

    #[test]
    fn empty_tree_returns_none() {
        let tree = HoverTree::build(&[]);
        assert!(tree.is_empty());
        assert!(tree.nearest(0.5, 0.5).is_none());
    }
}
