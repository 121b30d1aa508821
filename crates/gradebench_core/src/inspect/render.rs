use std::collections::{HashSet, VecDeque};

use crate::containers::{BinaryTreeNode, Graph, ListNode, NaryTreeNode};
use crate::value::Value;

/// Arrow placed between chain elements.
const CHAIN_ARROW: &str = "➔ ";

/// Canonical human-readable rendering used in failure messages and transcripts.
///
/// | shape       | rendering                                   |
/// |-------------|---------------------------------------------|
/// | Array/List  | `[1, 2, 3]`                                 |
/// | Array2D     | rows on separate lines: `[[1, 2]\n [3, 4]]` |
/// | Queue       | front to back: `[1, 2]`                     |
/// | Stack       | bottom to top: `[1, 2]`                     |
/// | Set         | `{1, 2}`                                    |
/// | Chain       | `1➔ 2➔ 3`, with `cycle` on a revisit        |
/// | trees       | level order, `None` for gaps                |
/// | Vertex      | its name                                    |
/// | Graph       | one `name: dest <weight>, ...` line per vertex |
pub fn render(value: &Value) -> String {
    match value {
        Value::None => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => render_float(*f),
        Value::Str(s) => s.clone(),
        Value::List(items) => bracketed(items.iter()),
        Value::Array(array) => bracketed(array.as_slice().iter()),
        Value::Array2D(grid) => {
            let rows: Vec<String> = (0..grid.rows()).map(|r| bracketed(grid.row(r).iter())).collect();
            format!("[{}]", rows.join("\n "))
        }
        Value::Queue(queue) => bracketed(queue.iter()),
        Value::Stack(stack) => bracketed(stack.iter_from_bottom()),
        Value::Set(set) => format!("{{{}}}", joined(set.iter())),
        Value::Chain(None) | Value::BinaryTree(None) | Value::NaryTree(None) => "None".to_string(),
        Value::Chain(Some(head)) => render_chain(head),
        Value::BinaryTree(Some(root)) => render_binary(root),
        Value::NaryTree(Some(root)) => render_nary(root),
        Value::Vertex(vertex) => vertex.name().to_string(),
        Value::Graph(graph) => render_graph(graph),
        Value::Native(native) => native.to_string(),
    }
}

/// Shortest round-trippable decimal, always with a fractional part (`1.0`, `0.1`).
pub fn render_float(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let sign = if f > 0.0 { "" } else { "-" };
        format!("{sign}inf")
    } else {
        format!("{f:?}")
    }
}

fn joined<'v>(items: impl Iterator<Item = &'v Value>) -> String {
    items.map(render).collect::<Vec<_>>().join(", ")
}

fn bracketed<'v>(items: impl Iterator<Item = &'v Value>) -> String {
    format!("[{}]", joined(items))
}

fn render_chain(head: &ListNode) -> String {
    let mut parts = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(head.clone());
    while let Some(node) = current {
        if !seen.insert(node.id()) {
            parts.push("cycle".to_string());
            break;
        }
        parts.push(render(&node.data()));
        current = node.next();
    }
    parts.join(CHAIN_ARROW)
}

fn finish_level_order(mut slots: Vec<Option<String>>) -> String {
    while matches!(slots.last(), Some(None)) {
        slots.pop();
    }
    let parts: Vec<String> = slots.into_iter().map(|s| s.unwrap_or_else(|| "None".to_string())).collect();
    format!("[{}]", parts.join(", "))
}

// Level by level; stops after the first level with no real node. A revisited node renders as `cycle`
// and is not expanded.
fn render_binary(root: &BinaryTreeNode) -> String {
    let mut slots = Vec::new();
    let mut seen = HashSet::new();
    let mut level = vec![Some(root.clone())];
    loop {
        let mut next = Vec::with_capacity(level.len() * 2);
        let mut any_node = false;
        for slot in level {
            match slot {
                Some(node) if seen.insert(node.id()) => {
                    slots.push(Some(render(&node.data())));
                    next.push(node.left());
                    next.push(node.right());
                    any_node = true;
                }
                Some(_) => slots.push(Some("cycle".to_string())),
                None => slots.push(None),
            }
        }
        if !any_node {
            break;
        }
        level = next;
    }
    finish_level_order(slots)
}

// Breadth-first over the leftmost-child/right-sibling encoding. Every expanded node contributes its
// children in order followed by one `None` terminator.
fn render_nary(root: &NaryTreeNode) -> String {
    let mut slots = Vec::new();
    let mut seen = HashSet::new();
    let mut queue: VecDeque<Option<NaryTreeNode>> = VecDeque::from([Some(root.clone()), root.right_sibling()]);
    while let Some(slot) = queue.pop_front() {
        let Some(node) = slot else {
            slots.push(None);
            continue;
        };
        if !seen.insert(node.id()) {
            slots.push(Some("cycle".to_string()));
            continue;
        }
        slots.push(Some(render(&node.data())));
        let mut siblings = HashSet::new();
        let mut child = node.leftmost_child();
        while let Some(c) = child {
            if !siblings.insert(c.id()) {
                break;
            }
            child = c.right_sibling();
            queue.push_back(Some(c));
        }
        queue.push_back(None);
    }
    finish_level_order(slots)
}

fn render_graph(graph: &Graph) -> String {
    let lines: Vec<String> = graph
        .vertices()
        .map(|vertex| {
            let edges: Vec<String> = graph
                .adj(vertex.name())
                .unwrap_or_default()
                .into_iter()
                .map(|dest| match graph.weight(vertex.name(), dest.name()).ok().flatten() {
                    Some(weight) => format!("{} <{}>", dest.name(), render(weight)),
                    None => dest.name().to_string(),
                })
                .collect();
            format!("{}: {}", vertex.name(), edges.join(", "))
        })
        .collect();
    lines.join("\n")
}
