use roxmltree::{Document, Node};
use std::collections::HashMap;

/// Elements of a document grouped by local tag name, in document order.
///
/// Namespaces are ignored: `nport:invstOrSec`, `invstOrSec` under a default
/// namespace and an unqualified `invstOrSec` all land in the same bucket.
/// Built once per document so field lookups never re-walk the tree.
pub struct LocalNameIndex<'a, 'input: 'a> {
    root: Node<'a, 'input>,
    by_name: HashMap<&'a str, Vec<Node<'a, 'input>>>,
}

impl<'a, 'input: 'a> LocalNameIndex<'a, 'input> {
    pub fn build(document: &'a Document<'input>) -> Self {
        let root = document.root_element();
        let mut by_name: HashMap<&'a str, Vec<Node<'a, 'input>>> = HashMap::new();
        for node in root.descendants().filter(|n| n.is_element()) {
            by_name.entry(node.tag_name().name()).or_default().push(node);
        }

        LocalNameIndex { root, by_name }
    }

    pub fn root(&self) -> Node<'a, 'input> {
        self.root
    }

    pub fn all(&self, name: &str) -> &[Node<'a, 'input>] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Elements named `name` strictly inside `scope`, in document order.
    pub fn descendants(
        &self,
        scope: Node<'a, 'input>,
        name: &str,
    ) -> impl Iterator<Item = Node<'a, 'input>> + '_ {
        let nodes = self.all(name);
        let scope_start = scope.range().start;
        // A subtree is a contiguous run in document order.
        let first = nodes.partition_point(|n| n.range().start <= scope_start);
        nodes[first..]
            .iter()
            .copied()
            .take_while(move |n| is_inside(*n, scope))
    }

    /// First element named `name` whose parent is `scope`.
    pub fn child(&self, scope: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
        self.descendants(scope, name)
            .find(|n| n.parent() == Some(scope))
    }

    /// Elements reached from `scope` by following `path` one child level per step.
    pub fn at_path(&self, scope: Node<'a, 'input>, path: &[&str]) -> Vec<Node<'a, 'input>> {
        let Some((last, parents)) = path.split_last() else {
            return Vec::new();
        };

        self.descendants(scope, last)
            .filter(|n| follows_path(*n, parents, scope))
            .collect()
    }
}

fn is_inside(node: Node, scope: Node) -> bool {
    node.ancestors().skip(1).any(|ancestor| ancestor == scope)
}

fn follows_path(node: Node, parents: &[&str], scope: Node) -> bool {
    let mut current = node;
    for step in parents.iter().rev() {
        match current.parent() {
            Some(parent) if parent.is_element() && parent.tag_name().name() == *step => {
                current = parent
            }
            _ => return false,
        }
    }
    current.parent() == Some(scope)
}
