//! The inspector view model.
//!
//! `Inspector` flattens an arbitrary JSON-like value into indented lines
//! for a host UI to draw. Object keys render in sorted order, array items
//! in positional order. Collapsed containers show a truncated preview;
//! expansion state, pick hooks and per-path render wrappers are all keyed
//! by [`NodePath`] keys.

use super::path::NodePath;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// How many object keys a collapsed preview shows.
const PREVIEW_KEYS: usize = 3;

/// One rendered row of the tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Line {
    /// Nesting depth, 0 for the root.
    pub depth: usize,
    /// The node's path key (see [`NodePath`]).
    pub path: String,
    /// The row text, wrappers applied.
    pub text: String,
    /// True for non-empty objects and arrays.
    pub expandable: bool,
    /// True when the node's children are rendered below it.
    pub expanded: bool,
}

type WrapFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
type PickFn = Arc<dyn Fn(&str) + Send + Sync>;

/// Expansion-state bookkeeping and rendering over a value tree.
///
/// The root is always expanded; every other container starts collapsed
/// until toggled.
///
/// # Example
///
/// ```rust
/// use gearshift::inspect::{Inspector, NodePath};
/// use serde_json::json;
///
/// let mut inspector = Inspector::new();
/// let value = json!({ "items": [1, 2, 3], "tag": "LOADED" });
///
/// let lines = inspector.render(&value);
/// assert_eq!(lines[1].text, "items: [3 items]");
///
/// inspector.toggle(NodePath::root().child("items").key());
/// let lines = inspector.render(&value);
/// assert_eq!(lines[2].text, "0: 1");
/// ```
#[derive(Default)]
pub struct Inspector {
    expanded: HashSet<String>,
    wrappers: HashMap<String, WrapFn>,
    pick_hook: Option<PickFn>,
}

impl Inspector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a node's expansion state (the click-to-toggle seam).
    pub fn toggle(&mut self, path: &str) {
        if !self.expanded.remove(path) {
            self.expanded.insert(path.to_string());
        }
    }

    pub fn expand(&mut self, path: &str) {
        self.expanded.insert(path.to_string());
    }

    pub fn collapse(&mut self, path: &str) {
        self.expanded.remove(path);
    }

    pub fn is_expanded(&self, path: &str) -> bool {
        path.is_empty() || self.expanded.contains(path)
    }

    /// Register the pick hook (the modifier-click seam).
    pub fn on_pick<F>(&mut self, hook: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.pick_hook = Some(Arc::new(hook));
    }

    /// Report a picked path to the registered hook.
    pub fn pick(&self, path: &str) {
        if let Some(hook) = &self.pick_hook {
            hook(path);
        }
    }

    /// Install a render wrapper applied to one node's text.
    pub fn wrap<F>(&mut self, path: &str, wrapper: F)
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.wrappers.insert(path.to_string(), Arc::new(wrapper));
    }

    /// Flatten the value into rows.
    pub fn render(&self, value: &Value) -> Vec<Line> {
        let mut lines = Vec::new();
        self.walk(value, &NodePath::root(), 0, None, &mut lines);
        lines
    }

    fn walk(
        &self,
        value: &Value,
        path: &NodePath,
        depth: usize,
        label: Option<&str>,
        out: &mut Vec<Line>,
    ) {
        let expanded = self.is_expanded(path.key());
        match value {
            Value::Object(map) => {
                let expandable = !map.is_empty();
                let text = if expandable && !expanded {
                    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    keys.sort_unstable();
                    labelled(label, &object_preview(&keys))
                } else if expandable {
                    labelled(label, "{")
                } else {
                    labelled(label, "{}")
                };
                self.push(out, depth, path, text, expandable, expanded);

                if expandable && expanded {
                    let mut keys: Vec<&str> = map.keys().map(String::as_str).collect();
                    keys.sort_unstable();
                    for key in keys {
                        self.walk(&map[key], &path.child(key), depth + 1, Some(key), out);
                    }
                }
            }
            Value::Array(items) => {
                let expandable = !items.is_empty();
                let text = if expandable && !expanded {
                    labelled(label, &format!("[{} items]", items.len()))
                } else if expandable {
                    labelled(label, "[")
                } else {
                    labelled(label, "[]")
                };
                self.push(out, depth, path, text, expandable, expanded);

                if expandable && expanded {
                    for (i, item) in items.iter().enumerate() {
                        let index = i.to_string();
                        self.walk(item, &path.index(i), depth + 1, Some(&index), out);
                    }
                }
            }
            scalar => {
                // Value's own Display quotes strings and renders numbers,
                // booleans and null as JSON literals.
                self.push(out, depth, path, labelled(label, &scalar.to_string()), false, false);
            }
        }
    }

    fn push(
        &self,
        out: &mut Vec<Line>,
        depth: usize,
        path: &NodePath,
        text: String,
        expandable: bool,
        expanded: bool,
    ) {
        let text = match self.wrappers.get(path.key()) {
            Some(wrapper) => wrapper(&text),
            None => text,
        };
        out.push(Line {
            depth,
            path: path.key().to_string(),
            text,
            expandable,
            expanded: expandable && expanded,
        });
    }
}

fn labelled(label: Option<&str>, body: &str) -> String {
    match label {
        Some(label) => format!("{label}: {body}"),
        None => body.to_string(),
    }
}

fn object_preview(sorted_keys: &[&str]) -> String {
    let shown = sorted_keys.iter().take(PREVIEW_KEYS).copied().collect::<Vec<_>>();
    if sorted_keys.len() > PREVIEW_KEYS {
        format!("{{{}, …}}", shown.join(", "))
    } else {
        format!("{{{}}}", shown.join(", "))
    }
}
