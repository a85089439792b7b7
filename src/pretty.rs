//! Human-readable rendering of a report.
//!
//! Changes are drawn as a tree, one node per path step, with the children of
//! each node in the order they appear in the compared values:
//!
//! ```text
//! a
//! ├── b
//! │   - 1
//! │   + 2
//! ├── ...
//! ╰── j
//!     - 1
//!     + 2
//! ```
//!
//! Unchanged runs between reported children collapse into a single `...`
//! line. See [`PrettyOptions`] for the other layouts.

use crate::path::compact_steps;
use crate::{Change, Key, PrettyOptions, Report, Step, Value};
use std::borrow::Cow;

const RED: &str = "31";
const GREEN: &str = "32";

struct TreeNode<'r> {
    step: Option<Step>,
    children: Vec<TreeNode<'r>>,
    changes: Vec<&'r Change>,
}

impl<'r> TreeNode<'r> {
    fn root() -> Self {
        TreeNode {
            step: None,
            children: Vec::new(),
            changes: Vec::new(),
        }
    }

    fn insert(&mut self, steps: &[Step], change: &'r Change) {
        let mut node = self;
        for step in steps {
            let idx = match node
                .children
                .iter()
                .position(|child| child.step.as_ref() == Some(step))
            {
                Some(idx) => idx,
                None => {
                    node.children.push(TreeNode {
                        step: Some(step.clone()),
                        children: Vec::new(),
                        changes: Vec::new(),
                    });
                    node.children.len() - 1
                }
            };
            node = &mut node.children[idx];
        }
        node.changes.push(change);
    }

    fn child(&self, step: &Step) -> Option<&TreeNode<'r>> {
        self.children
            .iter()
            .find(|child| child.step.as_ref() == Some(step))
    }

    fn label(&self) -> String {
        self.step.as_ref().map(Step::label).unwrap_or_default()
    }
}

enum Entry<'t, 'r> {
    Node(&'t TreeNode<'r>),
    Ellipsis,
    Context(usize),
}

struct RenderEnv<'a> {
    old: &'a Value,
    new: &'a Value,
    options: &'a PrettyOptions,
}

/// Renders `report` as text. `old` and `new` are the compared values; they
/// supply the sibling order and the context lines.
///
/// An empty report renders as an empty string.
///
/// # Examples
///
/// ```rust
/// use serde_deepdiff::{pretty, value, DeepDiff, PrettyOptions};
///
/// let old = value!({"a": {"b": 1}});
/// let new = value!({"a": {"b": 2}});
/// let diff = DeepDiff::new(old.clone(), new.clone());
///
/// let text = pretty::render(diff.report(), &old, &new, &PrettyOptions::new().no_color(true));
/// assert_eq!(text, "a\n╰── b\n    - 1\n    + 2");
/// ```
#[must_use]
pub fn render(report: &Report, old: &Value, new: &Value, options: &PrettyOptions) -> String {
    if report.is_empty() {
        return String::new();
    }

    if options.path_header {
        return render_headers(report, options);
    }

    let mut tree = TreeNode::root();
    for record in report {
        tree.insert(record.path.steps(), &record.change);
    }

    let mut lines = Vec::new();
    if !tree.changes.is_empty() {
        lines.push("root".to_string());
        for change in &tree.changes {
            push_change_lines(&mut lines, 0, &[], false, change, options);
        }
    }
    let env = RenderEnv { old, new, options };
    render_children(&tree, 0, &[], &[], &env, &mut lines);
    lines.join("\n")
}

fn render_headers(report: &Report, options: &PrettyOptions) -> String {
    let mut entries: Vec<(String, &Change)> = report
        .iter()
        .map(|record| (record.path.compact(), &record.change))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut lines = Vec::new();
    for (header, change) in entries {
        lines.push(header);
        push_change_lines(&mut lines, 0, &[], false, change, options);
    }
    lines.join("\n")
}

fn render_children(
    node: &TreeNode<'_>,
    depth: usize,
    branches: &[bool],
    steps: &[Step],
    env: &RenderEnv<'_>,
    lines: &mut Vec<String>,
) {
    if node.children.is_empty() {
        return;
    }

    let old = value_at(env.old, steps);
    let new = value_at(env.new, steps);

    let entries = if let Some(keys) = mapping_keys(old.as_deref(), new.as_deref()) {
        let mut entries = Vec::new();
        let mut seen = false;
        let mut pending_gap = false;
        for key in keys {
            match node.child(&Step::from_key(&key)) {
                Some(child) => {
                    if pending_gap {
                        entries.push(Entry::Ellipsis);
                        pending_gap = false;
                    }
                    entries.push(Entry::Node(child));
                    seen = true;
                }
                None if seen => pending_gap = true,
                None => {}
            }
        }
        append_unplaced(node, &mut entries);
        entries
    } else if let Some(len) = sequence_len(old.as_deref(), new.as_deref()) {
        let changed: Vec<usize> = node
            .children
            .iter()
            .filter_map(|child| match child.step {
                Some(Step::Index(idx)) => Some(idx),
                _ => None,
            })
            .collect();
        let context = env.options.context;
        let shown = |idx: usize| {
            changed
                .iter()
                .any(|&c| idx + context >= c && idx <= c.saturating_add(context))
        };

        let mut entries = Vec::new();
        let mut seen = false;
        let mut pending_gap = false;
        for idx in 0..len {
            if shown(idx) {
                if pending_gap {
                    entries.push(Entry::Ellipsis);
                    pending_gap = false;
                }
                match node.child(&Step::Index(idx)) {
                    Some(child) => entries.push(Entry::Node(child)),
                    None => entries.push(Entry::Context(idx)),
                }
                seen = true;
            } else if seen {
                pending_gap = true;
            }
        }
        append_unplaced(node, &mut entries);
        entries
    } else {
        let mut children: Vec<&TreeNode<'_>> = node.children.iter().collect();
        children.sort_by(|a, b| match (&a.step, &b.step) {
            (Some(Step::Index(x)), Some(Step::Index(y))) => x.cmp(y),
            _ => a.label().cmp(&b.label()),
        });
        children.into_iter().map(Entry::Node).collect()
    };

    let count = entries.len();
    for (idx, entry) in entries.into_iter().enumerate() {
        let is_last = idx + 1 == count;
        match entry {
            Entry::Node(child) => render_node(child, depth, is_last, branches, steps, env, lines),
            Entry::Ellipsis => lines.push(node_line(depth, branches, is_last, "...")),
            Entry::Context(item) => {
                lines.push(node_line(depth, branches, is_last, &format!("[{}]", item)));
                let mut item_steps = steps.to_vec();
                item_steps.push(Step::Index(item));
                let value = value_at(env.new, &item_steps)
                    .or_else(|| value_at(env.old, &item_steps))
                    .map(Cow::into_owned)
                    .unwrap_or_default();
                lines.push(format!(
                    "{}= {}",
                    branch_indent(depth, branches, !is_last),
                    value
                ));
            }
        }
    }
}

/// Children the value walk did not reach (synthetic positions, keys missing
/// from both sides) still get rendered, after the others.
fn append_unplaced<'t, 'r>(node: &'t TreeNode<'r>, entries: &mut Vec<Entry<'t, 'r>>) {
    let unplaced: Vec<&'t TreeNode<'r>> = node
        .children
        .iter()
        .filter(|child| {
            !entries
                .iter()
                .any(|entry| matches!(entry, Entry::Node(placed) if std::ptr::eq(*placed, *child)))
        })
        .collect();
    entries.extend(unplaced.into_iter().map(Entry::Node));
}

#[allow(clippy::too_many_arguments)]
fn render_node(
    node: &TreeNode<'_>,
    depth: usize,
    is_last: bool,
    branches: &[bool],
    parent_steps: &[Step],
    env: &RenderEnv<'_>,
    lines: &mut Vec<String>,
) {
    let (label, target, steps) = if env.options.compact {
        compress(node, parent_steps)
    } else {
        let mut steps = parent_steps.to_vec();
        steps.extend(node.step.iter().cloned());
        (node.label(), node, steps)
    };

    lines.push(node_line(depth, branches, is_last, &label));
    for change in &target.changes {
        push_change_lines(lines, depth, branches, !is_last, change, env.options);
    }

    let mut child_branches = branches.to_vec();
    if depth > 0 {
        child_branches.push(!is_last);
    }

    if depth >= env.options.max_depth {
        if !target.children.is_empty() {
            lines.push(node_line(depth + 1, &child_branches, true, "..."));
        }
        return;
    }

    render_children(target, depth + 1, &child_branches, &steps, env, lines);
}

/// Follows single-child, change-less nodes and returns the joined label.
fn compress<'t, 'r>(
    node: &'t TreeNode<'r>,
    parent_steps: &[Step],
) -> (String, &'t TreeNode<'r>, Vec<Step>) {
    let mut parts: Vec<Step> = node.step.iter().cloned().collect();
    let mut current = node;
    while current.changes.is_empty() && current.children.len() == 1 {
        current = &current.children[0];
        parts.extend(current.step.iter().cloned());
    }

    let mut steps = parent_steps.to_vec();
    steps.extend(parts.iter().cloned());
    (compact_steps(&parts), current, steps)
}

fn node_line(depth: usize, branches: &[bool], is_last: bool, label: &str) -> String {
    if depth == 0 {
        return label.to_string();
    }
    let mut out = tree_prefix(branches);
    out.push_str(if is_last { "╰── " } else { "├── " });
    out.push_str(label);
    out
}

fn push_change_lines(
    lines: &mut Vec<String>,
    depth: usize,
    branches: &[bool],
    node_has_more: bool,
    change: &Change,
    options: &PrettyOptions,
) {
    let indent = branch_indent(depth, branches, node_has_more);
    let color = !options.no_color;
    let mut push = |text: String, code: &str| {
        lines.push(format!("{}{}", indent, colorize(&text, code, color)));
    };

    match change {
        Change::ValueChanged { old, new } => {
            push(format!("- {}", old), RED);
            push(format!("+ {}", new), GREEN);
        }
        Change::TypeChanged {
            old,
            new,
            old_type,
            new_type,
        } => {
            push(format!("- ({}) {}", old_type, old), RED);
            push(format!("+ ({}) {}", new_type, new), GREEN);
        }
        Change::ItemAdded { value, .. } => push(format!("+ {}", value), GREEN),
        Change::ItemRemoved { value, .. } => push(format!("- {}", value), RED),
    }
}

fn colorize(text: &str, code: &str, enabled: bool) -> String {
    if enabled {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

fn tree_prefix(branches: &[bool]) -> String {
    branches
        .iter()
        .map(|&has_more| if has_more { "│   " } else { "    " })
        .collect()
}

fn branch_indent(depth: usize, branches: &[bool], node_has_more: bool) -> String {
    let mut out = tree_prefix(branches);
    out.push_str(if depth == 0 || node_has_more {
        "│   "
    } else {
        "    "
    });
    out
}

/// The value reached by following `steps`, looking through wrappers.
fn value_at<'a>(value: &'a Value, steps: &[Step]) -> Option<Cow<'a, Value>> {
    let Some((first, rest)) = steps.split_first() else {
        return Some(Cow::Borrowed(value));
    };
    let current = value.resolve();
    match (first, current) {
        (Step::Key(key), Value::Object(map)) => value_at(map.get(key)?, rest),
        (Step::Attribute(name), Value::Object(map)) => {
            value_at(map.get(Key::Attr(name.clone()))?, rest)
        }
        (Step::Index(idx), Value::Array(items)) => value_at(items.get(*idx)?, rest),
        (Step::Key(key), Value::Table { .. }) => {
            let column = current.columns()?.get(key)?.clone();
            value_at(&column, rest).map(|found| Cow::Owned(found.into_owned()))
        }
        _ => None,
    }
}

/// Keys of the mapping at this position, new side first.
fn mapping_keys(old: Option<&Value>, new: Option<&Value>) -> Option<Vec<Key>> {
    let mut keys: Vec<Key> = Vec::new();
    for side in [new, old].into_iter().flatten() {
        let side_keys: Vec<Key> = match side.resolve() {
            Value::Object(map) => map.keys().cloned().collect(),
            Value::Table { headers, .. } => headers.iter().map(Key::from).collect(),
            _ => continue,
        };
        for key in side_keys {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }
    (!keys.is_empty()).then_some(keys)
}

fn sequence_len(old: Option<&Value>, new: Option<&Value>) -> Option<usize> {
    let len = |side: Option<&Value>| match side.map(Value::resolve) {
        Some(Value::Array(items)) => items.len(),
        _ => 0,
    };
    let longest = len(old).max(len(new));
    (longest > 0).then_some(longest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{value, ChangeRecord, ContainerKind, DeepDiff, Path};

    fn plain(old: Value, new: Value) -> String {
        DeepDiff::new(old, new).pretty(PrettyOptions::new().no_color(true))
    }

    #[test]
    fn test_root_change() {
        assert_eq!(plain(value!(1), value!(2)), "root\n│   - 1\n│   + 2");
    }

    #[test]
    fn test_type_change_lines() {
        assert_eq!(
            plain(value!({"a": 1}), value!({"a": "1"})),
            "a\n│   - (int) 1\n│   + (str) '1'"
        );
    }

    #[test]
    fn test_added_and_removed_keys() {
        assert_eq!(
            plain(value!({"a": 1}), value!({"b": 2})),
            "b\n│   + 2\na\n│   - 1"
        );
    }

    #[test]
    fn test_colors() {
        let text = DeepDiff::new(value!([1]), value!([2])).pretty(PrettyOptions::new());
        assert_eq!(
            text,
            "[0]\n│   \x1b[31m- 1\x1b[0m\n│   \x1b[32m+ 2\x1b[0m"
        );
    }

    #[test]
    fn test_context_lines() {
        let text = DeepDiff::new(value!({"l": [1, 2, 3, 4]}), value!({"l": [1, 2, 9, 4]}))
            .pretty(PrettyOptions::new().no_color(true).context(1));
        assert_eq!(
            text,
            "l\n├── [1]\n│   = 2\n├── [2]\n│   - 3\n│   + 9\n╰── [3]\n    = 4"
        );
    }

    #[test]
    fn test_max_depth_elides() {
        let text = DeepDiff::new(value!({"a": {"b": {"c": 1}}}), value!({"a": {"b": {"c": 2}}}))
            .pretty(PrettyOptions::new().no_color(true).max_depth(1));
        assert_eq!(text, "a\n╰── b\n    ╰── ...");
    }

    #[test]
    fn test_compact_chain() {
        let text = DeepDiff::new(value!({"a": {"b": [0, 1]}}), value!({"a": {"b": [0, 2]}}))
            .pretty(PrettyOptions::new().no_color(true).compact(true));
        assert_eq!(text, "a.b[1]\n│   - 1\n│   + 2");
    }

    #[test]
    fn test_path_header_sorted() {
        let text = DeepDiff::new(value!({"b": 1, "a": {"x y": 1}}), value!({"b": 2, "a": {"x y": 2}}))
            .pretty(PrettyOptions::new().no_color(true).path_header(true));
        assert_eq!(text, "a['x y']\n│   - 1\n│   + 2\nb\n│   - 1\n│   + 2");
    }

    #[test]
    fn test_changes_sharing_a_path_are_all_drawn() {
        let old = value!({"a": [1]});
        let new = value!({"a": [2]});
        let path = Path::parse("root['a'][0]").unwrap();
        let report = Report::new(
            vec![
                ChangeRecord::new(
                    path.clone(),
                    Change::ItemRemoved {
                        container: ContainerKind::Iterable,
                        value: value!(1),
                    },
                ),
                ChangeRecord::new(
                    path,
                    Change::ItemAdded {
                        container: ContainerKind::Iterable,
                        value: value!(2),
                    },
                ),
            ],
            1,
        );
        let text = render(&report, &old, &new, &PrettyOptions::new().no_color(true));
        assert_eq!(text, "a\n╰── [0]\n    - 1\n    + 2");
    }
}
