use indexmap::IndexMap;
use std::{collections::HashMap, hash::Hash};

/// Index of a node inside a [`StateGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(usize);

impl StateId {
	pub fn index(self) -> usize {
		self.0
	}
}

/// A named node with its outgoing transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<K, T>
where
	K: Eq + Hash,
{
	pub(crate) name: String,
	pub(crate) start: bool,
	pub(crate) accepts: bool,
	pub(crate) transitions: IndexMap<K, T>,
}

impl<K, T> Node<K, T>
where
	K: Eq + Hash,
{
	fn new(name: String) -> Self {
		Self {
			name,
			start: false,
			accepts: false,
			transitions: IndexMap::new(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn is_start(&self) -> bool {
		self.start
	}

	pub fn is_final(&self) -> bool {
		self.accepts
	}

	/// Target stored for `key`, if any.
	pub fn target(&self, key: &K) -> Option<&T> {
		self.transitions.get(key)
	}
}

/// Arena of named nodes shared by both automaton families.
///
/// `K` is the transition key and `T` what a key leads to: a set of nodes for
/// the NFA, a single node for the DFA.
#[derive(Debug, Clone, PartialEq)]
pub struct StateGraph<K, T>
where
	K: Eq + Hash,
{
	nodes: Vec<Node<K, T>>,
	index: HashMap<String, StateId>,
	start: Option<StateId>,
}

impl<K, T> Default for StateGraph<K, T>
where
	K: Eq + Hash,
{
	fn default() -> Self {
		Self {
			nodes: Vec::new(),
			index: HashMap::new(),
			start: None,
		}
	}
}

impl<K, T> StateGraph<K, T>
where
	K: Eq + Hash,
{
	/// Returns the id of `name`, inserting a fresh node if it is unknown.
	/// The second value is `true` if the node was created.
	pub fn insert(&mut self, name: &str) -> (StateId, bool) {
		if let Some(&id) = self.index.get(name) {
			return (id, false);
		}
		let id = StateId(self.nodes.len());
		self.nodes.push(Node::new(name.to_owned()));
		self.index.insert(name.to_owned(), id);
		(id, true)
	}

	pub fn id(&self, name: &str) -> Option<StateId> {
		self.index.get(name).copied()
	}

	pub fn contains(&self, name: &str) -> bool {
		self.index.contains_key(name)
	}

	pub fn node(&self, id: StateId) -> &Node<K, T> {
		&self.nodes[id.0]
	}

	pub(crate) fn node_mut(&mut self, id: StateId) -> &mut Node<K, T> {
		&mut self.nodes[id.0]
	}

	pub fn name(&self, id: StateId) -> &str {
		&self.nodes[id.0].name
	}

	pub fn start(&self) -> Option<StateId> {
		self.start
	}

	/// Flags `id` as the start node, clearing any earlier start flag.
	pub(crate) fn set_start(&mut self, id: StateId) {
		if let Some(prev) = self.start {
			self.nodes[prev.0].start = false;
		}
		self.nodes[id.0].start = true;
		self.start = Some(id);
	}

	pub(crate) fn set_final(&mut self, id: StateId) {
		self.nodes[id.0].accepts = true;
	}

	/// Nodes in insertion order.
	pub fn nodes(&self) -> impl Iterator<Item = (StateId, &Node<K, T>)> {
		self.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| (StateId(i), node))
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_is_idempotent() {
		let mut graph = StateGraph::<char, StateId>::default();
		let (p, created) = graph.insert("p");
		assert!(created);
		let (q, _) = graph.insert("q");
		let (again, created) = graph.insert("p");
		assert!(!created, "Existing node was recreated");
		assert_eq!(p, again);
		assert_ne!(p, q);
		assert_eq!(2, graph.len());
		assert_eq!(Some(q), graph.id("q"));
		assert_eq!("q", graph.name(q));
	}

	#[test]
	fn start_flag_moves() {
		let mut graph = StateGraph::<char, StateId>::default();
		let (p, _) = graph.insert("p");
		let (q, _) = graph.insert("q");
		graph.set_start(p);
		graph.set_start(q);
		assert!(!graph.node(p).is_start(), "Old start flag kept");
		assert!(graph.node(q).is_start());
		assert_eq!(Some(q), graph.start());
	}

	#[test]
	fn nodes_in_insertion_order() {
		let mut graph = StateGraph::<char, StateId>::default();
		for name in &["c", "a", "b"] {
			graph.insert(name);
		}
		let names: Vec<_> = graph.nodes().map(|(_, node)| node.name()).collect();
		assert_eq!(vec!["c", "a", "b"], names);
	}
}
