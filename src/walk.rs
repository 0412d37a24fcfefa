// src/walk.rs
//! Iterative pre-order traversal with paired enter/leave events.
//!
//! Deep recursion over adversarially nested trees can exhaust the call
//! stack, so the walker keeps its own work stack. Every entered node gets a
//! matching leave event, which is what keeps nesting counters balanced.

use tree_sitter::Node;

/// Which side of a node the visitor is seeing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Enter,
    Leave,
}

/// Visitor verdict on an entered node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// Do not descend into this node's children. The leave event for the
    /// node itself still fires.
    SkipChildren,
}

enum Item<'t> {
    Enter(Node<'t>),
    Leave(Node<'t>),
}

/// Walks the subtree rooted at `root`, invoking `visit` on enter and leave.
/// The return value of a leave visit is ignored.
pub fn walk<'t, F>(root: Node<'t>, mut visit: F)
where
    F: FnMut(Node<'t>, Step) -> Flow,
{
    let mut stack = vec![Item::Enter(root)];

    while let Some(item) = stack.pop() {
        match item {
            Item::Enter(node) => {
                let flow = visit(node, Step::Enter);
                stack.push(Item::Leave(node));

                if flow == Flow::SkipChildren {
                    continue;
                }

                // Reverse so the leftmost child is popped first.
                let mut cursor = node.walk();
                let children: Vec<Node<'t>> = node.children(&mut cursor).collect();
                for child in children.into_iter().rev() {
                    stack.push(Item::Enter(child));
                }
            }
            Item::Leave(node) => {
                visit(node, Step::Leave);
            }
        }
    }
}
