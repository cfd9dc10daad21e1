//! Binary search tree backing the tree visualizer.

use std::collections::VecDeque;

use serde::Serialize;

#[derive(Debug)]
struct Node {
    value: i64,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn leaf(value: i64) -> Box<Self> {
        Box::new(Self {
            value,
            left: None,
            right: None,
        })
    }
}

/// Position of a node for drawing: `x` is its in-order index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeLayout {
    pub value: i64,
    pub x: usize,
    pub depth: usize,
    pub parent: Option<i64>,
}

#[derive(Debug, Default)]
pub struct SearchTree {
    root: Option<Box<Node>>,
    len: usize,
}

impl SearchTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values(values: &[i64]) -> Self {
        let mut tree = Self::new();
        for value in values {
            tree.insert(*value);
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns false when the value is already present.
    pub fn insert(&mut self, value: i64) -> bool {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            if value == node.value {
                return false;
            }
            slot = if value < node.value {
                &mut node.left
            } else {
                &mut node.right
            };
        }
        *slot = Some(Node::leaf(value));
        self.len += 1;
        true
    }

    pub fn contains(&self, value: i64) -> bool {
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            if value == node.value {
                return true;
            }
            cursor = if value < node.value {
                node.left.as_deref()
            } else {
                node.right.as_deref()
            };
        }
        false
    }

    /// Number of levels; zero for an empty tree.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(&Node, usize)> =
            self.root.as_deref().map(|n| (n, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(node.left.as_deref().map(|n| (n, depth + 1)));
            stack.extend(node.right.as_deref().map(|n| (n, depth + 1)));
        }
        height
    }

    pub fn in_order(&self) -> Vec<i64> {
        self.layout().into_iter().map(|node| node.value).collect()
    }

    pub fn pre_order(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            out.push(node.value);
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }
        out
    }

    pub fn post_order(&self) -> Vec<i64> {
        // Reverse of a root-right-left walk.
        let mut out = Vec::with_capacity(self.len);
        let mut stack: Vec<&Node> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            out.push(node.value);
            stack.extend(node.left.as_deref());
            stack.extend(node.right.as_deref());
        }
        out.reverse();
        out
    }

    pub fn level_order(&self) -> Vec<i64> {
        let mut out = Vec::with_capacity(self.len);
        let mut queue: VecDeque<&Node> = self.root.as_deref().into_iter().collect();
        while let Some(node) = queue.pop_front() {
            out.push(node.value);
            queue.extend(node.left.as_deref());
            queue.extend(node.right.as_deref());
        }
        out
    }

    /// Nodes in in-order sequence, so `x` equals the position in the result.
    pub fn layout(&self) -> Vec<NodeLayout> {
        let mut out = Vec::with_capacity(self.len);
        // Pending ancestors with their depth and parent value.
        let mut stack: Vec<(&Node, usize, Option<i64>)> = Vec::new();
        let mut cursor = self.root.as_deref().map(|n| (n, 0, None));
        loop {
            while let Some((node, depth, parent)) = cursor {
                stack.push((node, depth, parent));
                cursor = node.left.as_deref().map(|n| (n, depth + 1, Some(node.value)));
            }
            let Some((node, depth, parent)) = stack.pop() else {
                break;
            };
            out.push(NodeLayout {
                value: node.value,
                x: out.len(),
                depth,
                parent,
            });
            cursor = node.right.as_deref().map(|n| (n, depth + 1, Some(node.value)));
        }
        out
    }
}

impl Drop for SearchTree {
    // Unlinks nodes one at a time so a degenerate chain is not freed recursively.
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

/// Accepts integers separated by commas and/or whitespace.
pub fn parse_values(text: &str) -> Result<Vec<i64>, String> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| format!("'{token}' is not a whole number"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SearchTree {
        SearchTree::from_values(&[50, 30, 70, 20, 40, 60, 80])
    }

    #[test]
    fn insert_ignores_duplicates() {
        let mut tree = sample();
        assert_eq!(tree.len(), 7);
        assert!(!tree.insert(40));
        assert!(tree.insert(45));
        assert_eq!(tree.len(), 8);
        assert!(tree.contains(45));
        assert!(!tree.contains(46));
    }

    #[test]
    fn traversals() {
        let tree = sample();
        assert_eq!(tree.in_order(), vec![20, 30, 40, 50, 60, 70, 80]);
        assert_eq!(tree.pre_order(), vec![50, 30, 20, 40, 70, 60, 80]);
        assert_eq!(tree.post_order(), vec![20, 40, 30, 60, 80, 70, 50]);
        assert_eq!(tree.level_order(), vec![50, 30, 70, 20, 40, 60, 80]);
        assert_eq!(tree.height(), 3);
    }

    #[test]
    fn degenerate_tree_height() {
        let tree = SearchTree::from_values(&[1, 2, 3, 4]);
        assert_eq!(tree.height(), 4);
        assert!(SearchTree::new().is_empty());
        assert_eq!(SearchTree::new().height(), 0);
    }

    #[test]
    fn layout_orders_x_by_value() {
        let layout = sample().layout();
        assert_eq!(
            layout[0],
            NodeLayout {
                value: 20,
                x: 0,
                depth: 2,
                parent: Some(30),
            }
        );
        assert_eq!(
            layout[3],
            NodeLayout {
                value: 50,
                x: 3,
                depth: 0,
                parent: None,
            }
        );
        let xs: Vec<usize> = layout.iter().map(|n| n.x).collect();
        assert_eq!(xs, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn parse_values_accepts_mixed_separators() {
        assert_eq!(parse_values("5, 3 8,,-1").unwrap(), vec![5, 3, 8, -1]);
        assert_eq!(parse_values("  ").unwrap(), Vec::<i64>::new());
        let err = parse_values("4, x").unwrap_err();
        assert!(err.contains("'x'"));
    }

    #[test]
    fn sorted_input_builds_a_deep_chain_without_recursing() {
        let values: Vec<i64> = (0..200_000).collect();
        let tree = SearchTree::from_values(&values);
        assert_eq!(tree.len(), 200_000);
        assert_eq!(tree.height(), 200_000);
        assert_eq!(tree.in_order(), values);
        assert_eq!(tree.pre_order(), values);
        assert_eq!(tree.post_order().first(), Some(&199_999));
        let layout = tree.layout();
        assert_eq!(layout[199_999].depth, 199_999);
        assert_eq!(layout[199_999].parent, Some(199_998));
        drop(tree);
    }
}
