//! The `Graph` container: a directed (or undirected), optionally compound, optionally
//! multigraph data structure, keyed by string node ids.
//!
//! Baseline: `@dagrejs/graphlib`'s `Graph` class. Node and edge storage favors insertion
//! order (algorithms throughout `dugong` depend on deterministic iteration) over raw lookup
//! speed.

use hashbrown::HashMap;

use super::EdgeKey;
use super::edge_key::EdgeKeyView;
use super::options::GraphOptions;

#[derive(Debug, Clone)]
pub struct Graph<N, E, G> {
    options: GraphOptions,
    graph_label: G,

    node_order: Vec<String>,
    nodes: HashMap<String, N>,

    parents: HashMap<String, String>,
    children: HashMap<String, Vec<String>>,
    root_children: Vec<String>,

    edge_order: Vec<EdgeKey>,
    edges: HashMap<EdgeKey, E>,
}

impl<N, E, G> Graph<N, E, G>
where
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            graph_label: G::default(),
            node_order: Vec::new(),
            nodes: HashMap::new(),
            parents: HashMap::new(),
            children: HashMap::new(),
            root_children: Vec::new(),
            edge_order: Vec::new(),
            edges: HashMap::new(),
        }
    }
}

impl<N, E, G> Graph<N, E, G> {
    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn set_graph(&mut self, label: G) {
        self.graph_label = label;
    }

    pub fn graph(&self) -> &G {
        &self.graph_label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.graph_label
    }

    // -- nodes ---------------------------------------------------------

    pub fn set_node(&mut self, id: impl Into<String>, label: N) {
        let id = id.into();
        if !self.nodes.contains_key(&id) {
            self.node_order.push(id.clone());
            self.root_children.push(id.clone());
        }
        self.nodes.insert(id, label);
    }

    pub fn ensure_node(&mut self, id: &str)
    where
        N: Default,
    {
        if !self.nodes.contains_key(id) {
            self.set_node(id.to_string(), N::default());
        }
    }

    pub fn set_default_node_label<F>(&mut self, _f: F)
    where
        F: Fn() -> N,
    {
        // `dugong` only ever calls this immediately before `ensure_node`/`set_path`, both of
        // which require `N: Default`; keeping a boxed factory around is unnecessary plumbing.
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.nodes.get_mut(id)
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.node_order.clone()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &String> {
        self.node_order.iter()
    }

    pub fn node_count(&self) -> usize {
        self.node_order.len()
    }

    pub fn remove_node(&mut self, id: &str) -> Option<N> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        let stale: Vec<EdgeKey> = self
            .edge_order
            .iter()
            .filter(|k| k.v == id || k.w == id)
            .cloned()
            .collect();
        for k in stale {
            self.remove_edge_key(&k);
        }

        self.clear_parent(id);
        let orphaned: Vec<String> = self.children(id).into_iter().map(str::to_string).collect();
        for child in orphaned {
            self.parents.remove(&child);
            self.set_parent_root(&child);
        }
        self.children.remove(id);

        self.node_order.retain(|n| n != id);
        self.root_children.retain(|n| n != id);
        self.nodes.remove(id)
    }

    // -- compound hierarchy ---------------------------------------------

    pub fn set_parent(&mut self, child: impl Into<String>, parent: impl Into<String>) {
        let child = child.into();
        let parent = parent.into();

        self.detach_from_current_parent(&child);
        self.parents.insert(child.clone(), parent.clone());
        self.children.entry(parent).or_default().push(child);
    }

    pub fn clear_parent(&mut self, id: &str) {
        if self.parents.remove(id).is_some() {
            self.set_parent_root(id);
        }
    }

    fn set_parent_root(&mut self, id: &str) {
        if !self.root_children.iter().any(|c| c == id) {
            self.root_children.push(id.to_string());
        }
    }

    fn detach_from_current_parent(&mut self, id: &str) {
        if let Some(old_parent) = self.parents.remove(id) {
            if let Some(siblings) = self.children.get_mut(&old_parent) {
                siblings.retain(|c| c != id);
            }
        } else {
            self.root_children.retain(|c| c != id);
        }
    }

    pub fn parent(&self, id: &str) -> Option<&str> {
        self.parents.get(id).map(String::as_str)
    }

    pub fn children(&self, id: &str) -> Vec<&str> {
        match self.children.get(id) {
            Some(c) => c.iter().map(String::as_str).collect(),
            None => Vec::new(),
        }
    }

    pub fn children_root(&self) -> Vec<&str> {
        self.root_children.iter().map(String::as_str).collect()
    }

    // -- edges -----------------------------------------------------------

    pub fn set_default_edge_label<F>(&mut self, _f: F)
    where
        F: Fn() -> E,
    {
        // See `set_default_node_label`: every call site immediately provides its own label.
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>)
    where
        E: Default,
    {
        self.set_edge_with_label(v, w, E::default());
    }

    pub fn set_edge_with_label(&mut self, v: impl Into<String>, w: impl Into<String>, label: E) {
        self.set_edge_named::<_, _, String>(v, w, None, Some(label));
    }

    pub fn set_edge_named<V, W, S>(&mut self, v: V, w: W, name: Option<S>, label: Option<E>)
    where
        V: Into<String>,
        W: Into<String>,
        S: Into<String>,
        E: Default,
    {
        let v = v.into();
        let w = w.into();
        let name = name.map(Into::into);

        self.ensure_endpoint(&v);
        self.ensure_endpoint(&w);

        let key = EdgeKey::new(v, w, name);
        self.set_edge_key(key, label.unwrap_or_default());
    }

    pub fn set_edge_key(&mut self, key: EdgeKey, label: E) {
        if !self.edges.contains_key(&key) {
            self.edge_order.push(key.clone());
        }
        self.edges.insert(key, label);
    }

    pub fn set_path(&mut self, ids: &[&str])
    where
        N: Default,
        E: Default,
    {
        for id in ids {
            self.ensure_node(id);
        }
        for pair in ids.windows(2) {
            self.set_edge(pair[0].to_string(), pair[1].to_string());
        }
    }

    fn ensure_endpoint(&mut self, id: &str)
    where
        N: Default,
    {
        if !self.nodes.contains_key(id) {
            self.set_node(id.to_string(), N::default());
        }
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edges.contains_key(&EdgeKeyView { v, w, name })
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        self.edges.get(&EdgeKeyView { v, w, name })
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        self.edges.get_mut(&EdgeKeyView { v, w, name })
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edges.get(key)
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        self.edges.get_mut(key)
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edge_order.clone()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edge_order.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_order.len()
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> Option<E> {
        self.edge_order.retain(|k| k != key);
        self.edges.remove(key)
    }

    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        self.edge_order
            .iter()
            .filter(|k| k.v == v && w.is_none_or(|w| k.w == w))
            .cloned()
            .collect()
    }

    pub fn in_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        self.edge_order
            .iter()
            .filter(|k| k.w == v && w.is_none_or(|w| k.v == w))
            .cloned()
            .collect()
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for k in &self.edge_order {
            if k.v == v && !out.contains(&k.w.as_str()) {
                out.push(k.w.as_str());
            }
        }
        out
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for k in &self.edge_order {
            if k.w == v && !out.contains(&k.v.as_str()) {
                out.push(k.v.as_str());
            }
        }
        out
    }

    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let mut out = self.successors(v);
        for p in self.predecessors(v) {
            if !out.contains(&p) {
                out.push(p);
            }
        }
        out
    }
}
