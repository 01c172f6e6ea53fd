use super::{
	graph::{StateGraph, StateId},
	Automaton, AutomatonError,
};
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use std::hash::Hash;

pub(crate) type DfaGraph<I> = StateGraph<I, StateId>;

/// A deterministic finite state automaton, as produced by the subset construction.
#[derive(Debug, Clone, Serialize)]
#[serde(into = "Repr<I>", bound(serialize = "I: Serialize + Clone + Eq + Hash"))]
pub struct DFA<I>
where
	I: Eq + Hash,
{
	graph: DfaGraph<I>,
	alphabet: IndexSet<I>,
}

impl<I> DFA<I>
where
	I: Clone + Eq + Hash,
{
	pub(crate) fn with_alphabet(alphabet: IndexSet<I>) -> Self {
		Self {
			graph: StateGraph::default(),
			alphabet,
		}
	}

	/// Adds a fresh state.
	/// Returns an `AutomatonError::DuplicateStateName` error if the label is taken.
	pub(crate) fn add_state(&mut self, label: &str, accepts: bool) -> Result<StateId, AutomatonError> {
		let (id, created) = self.graph.insert(label);
		if !created {
			return Err(AutomatonError::DuplicateStateName(label.to_owned()));
		}
		if accepts {
			self.graph.set_final(id);
		}
		Ok(id)
	}

	pub(crate) fn set_start(&mut self, id: StateId) {
		self.graph.set_start(id);
	}

	pub(crate) fn add_transition(&mut self, prev: StateId, symbol: I, next: StateId) {
		self.graph.node_mut(prev).transitions.insert(symbol, next);
	}

	/// Checks whether the automaton has a state labeled `name`.
	pub fn has_state(&self, name: &str) -> bool {
		self.graph.contains(name)
	}

	/// State labels in discovery order.
	pub fn states(&self) -> impl Iterator<Item = &str> {
		self.graph.nodes().map(|(_, node)| node.name())
	}

	pub fn final_states(&self) -> impl Iterator<Item = &str> {
		self.graph
			.nodes()
			.filter(|(_, node)| node.is_final())
			.map(|(_, node)| node.name())
	}

	pub fn start_state(&self) -> Option<&str> {
		self.graph.start().map(|id| self.graph.name(id))
	}

	pub fn is_final(&self, name: &str) -> bool {
		self.graph
			.id(name)
			.map_or(false, |id| self.graph.node(id).is_final())
	}

	pub fn alphabet(&self) -> &IndexSet<I> {
		&self.alphabet
	}

	/// Target of the transition from `state` on `symbol`.
	/// Returns None if the state is inexistent or the symbol is outside the alphabet.
	pub fn transition(&self, state: &str, symbol: &I) -> Option<&str> {
		let id = self.graph.id(state)?;
		self.graph
			.node(id)
			.target(symbol)
			.map(|&next| self.graph.name(next))
	}

	/// All transitions as `(from, symbol, to)`, grouped by source state.
	pub fn transitions(&self) -> impl Iterator<Item = (&str, &I, &str)> {
		let graph = &self.graph;
		graph.nodes().flat_map(move |(_, node)| {
			node.transitions
				.iter()
				.map(move |(symbol, &next)| (node.name(), symbol, graph.name(next)))
		})
	}

	pub fn len(&self) -> usize {
		self.graph.len()
	}

	pub fn is_empty(&self) -> bool {
		self.graph.is_empty()
	}
}

impl<I> Automaton<I> for DFA<I>
where
	I: Clone + Eq + Hash,
{
	type State = StateId;

	fn initial(&self) -> Option<StateId> {
		self.graph.start()
	}

	fn step(&self, state: &StateId, input: &I) -> Option<StateId> {
		self.graph.node(*state).target(input).copied()
	}

	fn is_accepting(&self, state: &StateId) -> bool {
		self.graph.node(*state).is_final()
	}
}

#[derive(Debug, Serialize)]
struct StateRepr<I>
where
	I: Eq + Hash,
{
	name: String,
	accepts: bool,
	transitions: IndexMap<I, String>,
}

/// Serialized form of a [`DFA`].
#[derive(Debug, Serialize)]
struct Repr<I>
where
	I: Eq + Hash,
{
	start: Option<String>,
	alphabet: IndexSet<I>,
	states: Vec<StateRepr<I>>,
}

impl<I> From<DFA<I>> for Repr<I>
where
	I: Clone + Eq + Hash,
{
	fn from(dfa: DFA<I>) -> Self {
		let graph = &dfa.graph;
		let states = graph
			.nodes()
			.map(|(_, node)| StateRepr {
				name: node.name().to_owned(),
				accepts: node.is_final(),
				transitions: node
					.transitions
					.iter()
					.map(|(symbol, &next)| (symbol.clone(), graph.name(next).to_owned()))
					.collect(),
			})
			.collect();
		Repr {
			start: dfa.start_state().map(str::to_owned),
			alphabet: dfa.alphabet.clone(),
			states,
		}
	}
}
