//! Depth-first traversal of `on_hit` script trees.

use crate::model::{AbilityRecord, ScriptNode};

/// A script node paired with the number of `on_hit` edges above it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalkStep<'a> {
    pub node: &'a ScriptNode,
    pub depth: usize,
}

/// Pre-order iterator over script nodes and their `on_hit` descendants.
///
/// Uses an explicit stack, so arbitrarily deep trees cannot overflow the call
/// stack. Siblings are visited in their original order.
#[derive(Debug, Clone)]
pub struct ScriptWalk<'a> {
    stack: Vec<WalkStep<'a>>,
}

/// Walk `roots` (depth 0) and every node reachable through `on_hit`.
#[must_use]
pub fn walk(roots: &[ScriptNode]) -> ScriptWalk<'_> {
    let mut stack = Vec::with_capacity(roots.len());
    push_children(&mut stack, roots, 0);
    ScriptWalk { stack }
}

/// Walk every effect script of a record, effects in declaration order.
pub fn walk_record(record: &AbilityRecord) -> impl Iterator<Item = WalkStep<'_>> {
    record
        .ability
        .effects
        .iter()
        .flat_map(|effect| walk(&effect.script))
}

/// Deepest `on_hit` nesting anywhere in a record, 0 when nothing nests.
#[must_use]
pub fn max_depth(record: &AbilityRecord) -> usize {
    walk_record(record).map(|step| step.depth).max().unwrap_or(0)
}

fn push_children<'a>(stack: &mut Vec<WalkStep<'a>>, children: &'a [ScriptNode], depth: usize) {
    // Reversed so the first child is popped first.
    stack.extend(children.iter().rev().map(|node| WalkStep { node, depth }));
}

impl<'a> Iterator for ScriptWalk<'a> {
    type Item = WalkStep<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let step = self.stack.pop()?;
        push_children(&mut self.stack, &step.node.on_hit, step.depth + 1);
        Some(step)
    }
}
