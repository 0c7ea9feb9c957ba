//! Weighted order-statistic tree used to draw points without replacement.
//!
//! The tree is an AVL tree keyed by point identity. Every node carries the
//! point's remaining width and the aggregate width of its subtree, which
//! allows the `k`-th remaining unit to be located in `O(log n)`. Nodes live in
//! a flat arena indexed by point identity, so parent links are plain indices
//! and a point's node is found without a descent.
//!
//! Nodes are never unlinked: a point whose width reaches zero stays in the
//! tree but covers no positions and can no longer be selected.

use std::cmp::Ordering;

use crate::error::OrderStatisticError;


#[derive(Clone, Copy, Debug, Default)]
struct Node {
    width: usize,
    subtree: usize,
    height: u32,
    left: Option<usize>,
    right: Option<usize>,
    parent: Option<usize>,
}

/// Multiset of weighted points supporting rank selection and decrement.
///
/// # Examples
/// ```
/// use graphgen_core::OrderStatisticTree;
///
/// let mut tree = OrderStatisticTree::new(&[2, 0, 1]);
/// assert_eq!(tree.len(), 3);
/// assert_eq!(tree.select(0)?, 0);
/// assert_eq!(tree.select(1)?, 0);
/// assert_eq!(tree.select(2)?, 2);
///
/// tree.remove(0)?;
/// assert_eq!(tree.rank(0), 1);
/// assert_eq!(tree.select(1)?, 2);
/// # Ok::<(), graphgen_core::OrderStatisticError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct OrderStatisticTree {
    nodes: Vec<Node>,
    root: Option<usize>,
}

impl OrderStatisticTree {
    /// Builds a tree over points `0..widths.len()` where point `i` initially
    /// covers `widths[i]` positions.
    #[must_use]
    pub fn new(widths: &[usize]) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(widths.len()),
            root: None,
        };
        for &width in widths {
            let point = tree.nodes.len();
            tree.nodes.push(Node {
                width,
                subtree: width,
                height: 1,
                ..Node::default()
            });
            tree.insert(point);
        }
        tree
    }

    /// Builds a tree whose widths are the remaining deficit of each node
    /// towards `target` given its `current` degree.
    #[must_use]
    pub fn from_deficits(target: usize, current: &[usize]) -> Self {
        let widths: Vec<usize> = current
            .iter()
            .map(|&degree| target.saturating_sub(degree))
            .collect();
        Self::new(&widths)
    }

    /// Returns the total remaining width across all points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.map_or(0, |root| self.nodes[root].subtree)
    }

    /// Returns `true` when no point can be selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of points the tree was built over.
    #[must_use]
    pub fn points(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the remaining width of `point`, or zero for unknown points.
    #[must_use]
    pub fn rank(&self, point: usize) -> usize {
        self.nodes.get(point).map_or(0, |node| node.width)
    }

    /// Returns the point owning position `index` of the weighted sequence.
    ///
    /// # Errors
    /// Returns [`OrderStatisticError::Empty`] when no weight remains and
    /// [`OrderStatisticError::IndexOutOfRange`] when `index >= self.len()`.
    pub fn select(&self, index: usize) -> Result<usize, OrderStatisticError> {
        let len = self.len();
        if len == 0 {
            return Err(OrderStatisticError::Empty);
        }
        if index >= len {
            return Err(OrderStatisticError::IndexOutOfRange { index, len });
        }

        let mut remaining = index;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.nodes[id];
            let left_width = self.subtree(node.left);
            if remaining < left_width {
                current = node.left;
                continue;
            }
            let owned = left_width + node.width;
            if remaining < owned {
                return Ok(id);
            }
            remaining -= owned;
            current = node.right;
        }
        Err(OrderStatisticError::IndexOutOfRange { index, len })
    }

    /// Consumes one unit of `point`'s width.
    ///
    /// Returns `Ok(false)` when the point had no width left.
    ///
    /// # Errors
    /// Returns [`OrderStatisticError::UnknownPoint`] when `point` is not part
    /// of the tree.
    pub fn remove(&mut self, point: usize) -> Result<bool, OrderStatisticError> {
        let points = self.nodes.len();
        let node = self
            .nodes
            .get_mut(point)
            .ok_or(OrderStatisticError::UnknownPoint { point, points })?;
        if node.width == 0 {
            return Ok(false);
        }
        node.width -= 1;

        let mut current = Some(point);
        while let Some(id) = current {
            let node = &mut self.nodes[id];
            node.subtree -= 1;
            current = node.parent;
        }
        Ok(true)
    }

    fn insert(&mut self, point: usize) {
        let Some(mut current) = self.root else {
            self.root = Some(point);
            return;
        };
        loop {
            let node = self.nodes[current];
            let slot = match point.cmp(&current) {
                Ordering::Less => node.left,
                Ordering::Greater | Ordering::Equal => node.right,
            };
            match slot {
                Some(next) => current = next,
                None => {
                    if point < current {
                        self.nodes[current].left = Some(point);
                    } else {
                        self.nodes[current].right = Some(point);
                    }
                    self.nodes[point].parent = Some(current);
                    break;
                }
            }
        }
        self.retrace(Some(current));
    }

    fn retrace(&mut self, start: Option<usize>) {
        let mut current = start;
        while let Some(id) = current {
            self.refresh(id);
            let subtree_root = self.rebalance(id);
            current = self.nodes[subtree_root].parent;
        }
    }

    fn rebalance(&mut self, id: usize) -> usize {
        let balance = self.balance(id);
        if balance > 1 {
            if let Some(left) = self.nodes[id].left {
                if self.balance(left) < 0 {
                    self.rotate_left(left);
                }
            }
            self.rotate_right(id)
        } else if balance < -1 {
            if let Some(right) = self.nodes[id].right {
                if self.balance(right) > 0 {
                    self.rotate_right(right);
                }
            }
            self.rotate_left(id)
        } else {
            id
        }
    }

    fn rotate_left(&mut self, id: usize) -> usize {
        let Some(pivot) = self.nodes[id].right else {
            return id;
        };
        let inner = self.nodes[pivot].left;
        let parent = self.nodes[id].parent;

        self.nodes[id].right = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(id);
        }
        self.nodes[pivot].left = Some(id);
        self.nodes[id].parent = Some(pivot);
        self.nodes[pivot].parent = parent;
        self.replace_child(parent, id, pivot);

        self.refresh(id);
        self.refresh(pivot);
        pivot
    }

    fn rotate_right(&mut self, id: usize) -> usize {
        let Some(pivot) = self.nodes[id].left else {
            return id;
        };
        let inner = self.nodes[pivot].right;
        let parent = self.nodes[id].parent;

        self.nodes[id].left = inner;
        if let Some(inner) = inner {
            self.nodes[inner].parent = Some(id);
        }
        self.nodes[pivot].right = Some(id);
        self.nodes[id].parent = Some(pivot);
        self.nodes[pivot].parent = parent;
        self.replace_child(parent, id, pivot);

        self.refresh(id);
        self.refresh(pivot);
        pivot
    }

    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: usize) {
        match parent {
            None => self.root = Some(new),
            Some(parent) => {
                let node = &mut self.nodes[parent];
                if node.left == Some(old) {
                    node.left = Some(new);
                } else if node.right == Some(old) {
                    node.right = Some(new);
                }
            }
        }
    }

    fn refresh(&mut self, id: usize) {
        let Node {
            left, right, width, ..
        } = self.nodes[id];
        let height = 1 + self.height(left).max(self.height(right));
        let subtree = width + self.subtree(left) + self.subtree(right);
        let node = &mut self.nodes[id];
        node.height = height;
        node.subtree = subtree;
    }

    fn balance(&self, id: usize) -> i64 {
        let node = &self.nodes[id];
        i64::from(self.height(node.left)) - i64::from(self.height(node.right))
    }

    fn height(&self, id: Option<usize>) -> u32 {
        id.map_or(0, |id| self.nodes[id].height)
    }

    fn subtree(&self, id: Option<usize>) -> usize {
        id.map_or(0, |id| self.nodes[id].subtree)
    }

    /// Verifies ordering, balance, aggregate and parent-link invariants.
    ///
    /// Returns a description of the first violation found.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        let Some(root) = self.root else {
            return if self.nodes.is_empty() {
                Ok(())
            } else {
                Err("points exist but the tree has no root".to_owned())
            };
        };
        if self.nodes[root].parent.is_some() {
            return Err(format!("root {root} has a parent"));
        }
        let mut visited = 0;
        self.check_subtree(root, None, None, &mut visited)?;
        if visited != self.nodes.len() {
            return Err(format!("visited {visited} of {} points", self.nodes.len()));
        }
        Ok(())
    }

    #[cfg(test)]
    fn check_subtree(
        &self,
        id: usize,
        lower: Option<usize>,
        upper: Option<usize>,
        visited: &mut usize,
    ) -> Result<(u32, usize), String> {
        *visited += 1;
        if lower.is_some_and(|bound| id <= bound) || upper.is_some_and(|bound| id >= bound) {
            return Err(format!("point {id} violates search-tree ordering"));
        }
        let node = self.nodes[id];
        let mut check_child = |child: Option<usize>, lower, upper| match child {
            None => Ok((0, 0)),
            Some(child) => {
                if self.nodes[child].parent != Some(id) {
                    return Err(format!("point {child} does not link back to {id}"));
                }
                self.check_subtree(child, lower, upper, visited)
            }
        };
        let (left_height, left_sum) = check_child(node.left, lower, Some(id))?;
        let (right_height, right_sum) = check_child(node.right, Some(id), upper)?;
        if left_height.abs_diff(right_height) > 1 {
            return Err(format!("point {id} is unbalanced"));
        }
        let height = 1 + left_height.max(right_height);
        let sum = node.width + left_sum + right_sum;
        if node.height != height || node.subtree != sum {
            return Err(format!("point {id} carries stale aggregates"));
        }
        Ok((height, sum))
    }
}
