//! This module implements [`KdTree`], an immutable 3-dimensional k-d tree over perceptual
//! coordinates. It is built once from a snapshot of a tier's coordinates and answers single-nearest
//! and k-nearest queries with branch-and-bound pruning. The tree never stores names: each node keeps
//! the index of its point in the slice it was built from, and callers map that index back to
//! whatever is aligned with it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::coord::Coord;

/// One result of a nearest-neighbor query: the index of the matched point in the tree's input, and
/// its Euclidean distance from the query.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Neighbor {
    /// The position of the point in the slice the tree was built from.
    pub index: usize,
    /// The Euclidean distance between the query and the point.
    pub distance: f64,
}

#[derive(Debug, Clone)]
struct Node {
    point: Coord,
    index: usize,
    axis: usize,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

/// A balanced k-d tree over 3D points, split on axis `depth % 3` at the median of each level.
///
/// # Example
/// ```
/// # use colorlex::kdtree::KdTree;
/// # use colorlex::coord::Coord;
/// let tree = KdTree::from_flat(&[0., 0., 0., 1., 0., 0., 0.63, 0.23, 0.13]);
/// let best = tree.nearest(&Coord{x: 0.6, y: 0.2, z: 0.1}).unwrap();
/// assert_eq!(best.index, 2);
/// let two = tree.nearest_n(&Coord{x: 0.9, y: 0., z: 0.}, 2);
/// assert_eq!(two.iter().map(|n| n.index).collect::<Vec<_>>(), vec![1, 2]);
/// ```
#[derive(Debug, Clone)]
pub struct KdTree {
    root: Option<Box<Node>>,
    len: usize,
}

impl KdTree {
    /// Builds a tree from a list of points. Each level sorts its slice along the current axis and
    /// takes the median as the node, so construction is O(n log² n). An empty list gives an empty
    /// tree.
    pub fn new(points: &[Coord]) -> KdTree {
        let mut indexed: Vec<(usize, Coord)> = points.iter().copied().enumerate().collect();
        KdTree {
            root: build(&mut indexed, 0),
            len: points.len(),
        }
    }

    /// Builds a tree from a flat list of coordinates, three values per point. Panics if the length
    /// is not a multiple of 3: that is a malformed call, not a data condition, and
    /// [`ColorNameSet`](crate::nameset::ColorNameSet) validates its data before it ever gets here.
    pub fn from_flat(values: &[f64]) -> KdTree {
        assert!(
            values.len() % Coord::DIM == 0,
            "coordinate list of length {} is not a multiple of {}",
            values.len(),
            Coord::DIM
        );
        let points: Vec<Coord> = values
            .chunks_exact(Coord::DIM)
            .map(|c| Coord{x: c[0], y: c[1], z: c[2]})
            .collect();
        KdTree::new(&points)
    }

    /// The number of points in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the tree holds no points.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Finds the single closest point to `query`, or `None` if the tree is empty. When several
    /// points are equally close, the first one reached by the search wins. That order is
    /// deterministic for a given tree, but it is not insertion order.
    pub fn nearest(&self, query: &Coord) -> Option<Neighbor> {
        let mut best: Option<(usize, f64)> = None;
        search_nearest(&self.root, query, &mut best);
        best.map(|(index, dist_sq)| Neighbor {
            index,
            distance: dist_sq.sqrt(),
        })
    }

    /// Finds up to `k` closest points to `query`, sorted by ascending distance. If `k` is larger
    /// than the tree, every point comes back. Panics if `k` is 0.
    pub fn nearest_n(&self, query: &Coord, k: usize) -> Vec<Neighbor> {
        assert!(k > 0, "asked for the 0 nearest neighbors");
        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k.min(self.len));
        search_nearest_n(&self.root, query, k, &mut heap);
        let mut found = heap.into_vec();
        found.sort_by(|a, b| a.dist_sq.total_cmp(&b.dist_sq));
        found
            .into_iter()
            .map(|c| Neighbor {
                index: c.index,
                distance: c.dist_sq.sqrt(),
            })
            .collect()
    }
}

fn build(points: &mut [(usize, Coord)], depth: usize) -> Option<Box<Node>> {
    if points.is_empty() {
        return None;
    }
    let axis = depth % Coord::DIM;
    points.sort_by(|a, b| a.1.axis(axis).total_cmp(&b.1.axis(axis)));
    let median = points.len() / 2;
    let (index, point) = points[median];
    let (left, rest) = points.split_at_mut(median);
    let right = &mut rest[1..];
    Some(Box::new(Node {
        point,
        index,
        axis,
        left: build(left, depth + 1),
        right: build(right, depth + 1),
    }))
}

// Splits a node's children into the side the query falls on and the other one, along with the
// signed distance from the query to the splitting plane.
fn sides<'a>(node: &'a Node, query: &Coord) -> (&'a Option<Box<Node>>, &'a Option<Box<Node>>, f64) {
    let diff = query.axis(node.axis) - node.point.axis(node.axis);
    if diff < 0. {
        (&node.left, &node.right, diff)
    } else {
        (&node.right, &node.left, diff)
    }
}

fn search_nearest(node: &Option<Box<Node>>, query: &Coord, best: &mut Option<(usize, f64)>) {
    let node = match node {
        Some(node) => node,
        None => return,
    };
    let dist_sq = node.point.squared_distance(query);
    if best.map_or(true, |(_, best_sq)| dist_sq < best_sq) {
        *best = Some((node.index, dist_sq));
    }
    let (near, far, diff) = sides(node, query);
    search_nearest(near, query, best);
    // the far side can only hold something closer if the splitting plane itself is closer
    if best.map_or(true, |(_, best_sq)| diff * diff < best_sq) {
        search_nearest(far, query, best);
    }
}

// A heap entry ordered by squared distance, so the heap's top is the worst of the current k.
#[derive(Debug, Copy, Clone)]
struct Candidate {
    dist_sq: f64,
    index: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Candidate) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Candidate) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Candidate) -> Ordering {
        self.dist_sq
            .total_cmp(&other.dist_sq)
            .then(self.index.cmp(&other.index))
    }
}

// The squared distance a point must beat to get into the heap.
fn kth_best(heap: &BinaryHeap<Candidate>, k: usize) -> f64 {
    if heap.len() < k {
        std::f64::INFINITY
    } else {
        heap.peek().map_or(std::f64::INFINITY, |c| c.dist_sq)
    }
}

fn search_nearest_n(node: &Option<Box<Node>>, query: &Coord, k: usize, heap: &mut BinaryHeap<Candidate>) {
    let node = match node {
        Some(node) => node,
        None => return,
    };
    let candidate = Candidate {
        dist_sq: node.point.squared_distance(query),
        index: node.index,
    };
    if heap.len() < k {
        heap.push(candidate);
    } else if let Some(mut worst) = heap.peek_mut() {
        if candidate.dist_sq < worst.dist_sq {
            // the heap restores itself when `worst` is dropped
            *worst = candidate;
        }
    }
    let (near, far, diff) = sides(node, query);
    search_nearest_n(near, query, k, heap);
    if diff * diff <= kth_best(heap, k) {
        search_nearest_n(far, query, k, heap);
    }
}
