use super::{
	graph::{StateGraph, StateId},
	naming::FinalityRule,
	Automaton, AutomatonError, Invalid,
};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, convert::TryFrom, hash::Hash};

/// Label of an NFA transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Input<I> {
	/// Move that consumes no input.
	Epsilon,
	Symbol(I),
}

impl<I> From<I> for Input<I> {
	fn from(symbol: I) -> Self {
		Self::Symbol(symbol)
	}
}

pub(crate) type NfaGraph<I> = StateGraph<Input<I>, IndexSet<StateId>>;

/// A non-deterministic finite state automaton with epsilon moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(
	try_from = "Repr<I>",
	into = "Repr<I>",
	bound(
		serialize = "I: Serialize + Clone + Eq + Hash",
		deserialize = "I: Deserialize<'de> + Clone + Eq + Hash"
	)
)]
pub struct NFA<I>
where
	I: Eq + Hash,
{
	graph: NfaGraph<I>,
	alphabet: IndexSet<I>,
	final_names: IndexSet<String>,
}

impl<I> Default for NFA<I>
where
	I: Eq + Hash,
{
	fn default() -> Self {
		Self {
			graph: StateGraph::default(),
			alphabet: IndexSet::new(),
			final_names: IndexSet::new(),
		}
	}
}

impl<I> NFA<I>
where
	I: Clone + Eq + Hash,
{
	/// Creates a new empty NFA.
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn graph(&self) -> &NfaGraph<I> {
		&self.graph
	}

	/// Checks whether the automaton has a state named `name`.
	pub fn has_state(&self, name: &str) -> bool {
		self.graph.contains(name)
	}

	/// Adds a plain state. Adding an existing name leaves it untouched.
	pub fn add_state(&mut self, name: &str) -> StateId {
		self.graph.insert(name).0
	}

	/// Adds a state or flags an existing one as the start state.
	/// Returns an `Invalid::MultipleStartStates` error if another state already is the start.
	pub fn add_start_state(&mut self, name: &str) -> Result<StateId, AutomatonError> {
		if let Some(current) = self.graph.start() {
			let current = self.graph.name(current);
			if current != name {
				return Err(Invalid::MultipleStartStates {
					current: current.to_owned(),
					requested: name.to_owned(),
				}
				.into());
			}
		}
		let id = self.add_state(name);
		self.graph.set_start(id);
		Ok(id)
	}

	/// Adds a state or flags an existing one as accepting.
	pub fn add_final_state(&mut self, name: &str) -> StateId {
		let id = self.add_state(name);
		self.graph.set_final(id);
		self.final_names.insert(name.to_owned());
		id
	}

	/// Adds a new transition to the automaton. Repeated calls for the same
	/// source and input accumulate destinations.
	/// Returns an `Invalid::InexistentState` error if one of the states is inexistent.
	pub fn add_transition<T>(&mut self, from: &str, input: T, to: &str) -> Result<(), AutomatonError>
	where
		T: Into<Input<I>>,
	{
		let prev = self.get_id(from)?;
		let next = self.get_id(to)?;
		let input = input.into();
		if let Input::Symbol(symbol) = &input {
			self.alphabet.insert(symbol.clone());
		}
		self.graph
			.node_mut(prev)
			.transitions
			.entry(input)
			.or_default()
			.insert(next);
		Ok(())
	}

	/// Shorthand for an epsilon transition.
	pub fn add_epsilon_transition(&mut self, from: &str, to: &str) -> Result<(), AutomatonError> {
		self.add_transition(from, Input::<I>::Epsilon, to)
	}

	/// Names of all states, in the order they were added.
	pub fn states(&self) -> impl Iterator<Item = &str> {
		self.graph.nodes().map(|(_, node)| node.name())
	}

	/// Names of the accepting states, in the order they were added.
	pub fn final_states(&self) -> impl Iterator<Item = &str> {
		self.graph
			.nodes()
			.filter(|(_, node)| node.is_final())
			.map(|(_, node)| node.name())
	}

	/// Every name ever passed to `add_final_state`.
	pub fn final_names(&self) -> &IndexSet<String> {
		&self.final_names
	}

	pub fn start_state(&self) -> Option<&str> {
		self.graph.start().map(|id| self.graph.name(id))
	}

	/// Symbols used by the transitions, epsilon excluded, in order of first use.
	pub fn alphabet(&self) -> &IndexSet<I> {
		&self.alphabet
	}

	/// Destinations of a single move from `name`, without epsilon closure.
	pub fn successors(&self, name: &str, input: &Input<I>) -> Result<Vec<&str>, AutomatonError> {
		let id = self.get_id(name)?;
		Ok(self
			.graph
			.node(id)
			.target(input)
			.into_iter()
			.flatten()
			.map(|&next| self.graph.name(next))
			.collect())
	}

	/// Returns the id of the requested state or an `Invalid::InexistentState` error otherwise.
	pub(crate) fn get_id(&self, name: &str) -> Result<StateId, AutomatonError> {
		self.graph
			.id(name)
			.ok_or_else(|| Invalid::InexistentState(name.to_owned()).into())
	}
}

impl<I> Automaton<I> for NFA<I>
where
	I: Clone + Eq + Hash,
{
	type State = BTreeSet<StateId>;

	fn initial(&self) -> Option<Self::State> {
		self.graph.start().map(|start| self.epsilon_closure(start))
	}

	fn step(&self, state: &Self::State, input: &I) -> Option<Self::State> {
		Some(self.closure_union(state, input))
	}

	fn is_accepting(&self, state: &Self::State) -> bool {
		FinalityRule::default().is_final(self, state)
	}
}

fn is_false(value: &bool) -> bool {
	!value
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StateRepr {
	name: String,
	#[serde(skip_serializing_if = "is_false")]
	start: bool,
	#[serde(skip_serializing_if = "is_false")]
	accepts: bool,
}

/// Serialized form of an [`NFA`].
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct Repr<I> {
	states: Vec<StateRepr>,
	#[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
	transitions: Vec<(String, I, String)>,
	#[serde(default = "Vec::new", skip_serializing_if = "Vec::is_empty")]
	epsilon: Vec<(String, String)>,
}

impl<I> TryFrom<Repr<I>> for NFA<I>
where
	I: Clone + Eq + Hash,
{
	type Error = AutomatonError;

	fn try_from(repr: Repr<I>) -> Result<Self, Self::Error> {
		let mut nfa = Self::new();
		for state in repr.states {
			if nfa.has_state(&state.name) {
				return Err(AutomatonError::DuplicateStateName(state.name));
			}
			nfa.add_state(&state.name);
			if state.start {
				nfa.add_start_state(&state.name)?;
			}
			if state.accepts {
				nfa.add_final_state(&state.name);
			}
		}
		for (prev, input, next) in repr.transitions {
			nfa.add_transition(&prev, input, &next)?;
		}
		for (prev, next) in repr.epsilon {
			nfa.add_epsilon_transition(&prev, &next)?;
		}
		Ok(nfa)
	}
}

impl<I> From<NFA<I>> for Repr<I>
where
	I: Clone + Eq + Hash,
{
	fn from(nfa: NFA<I>) -> Self {
		let graph = nfa.graph();
		let mut repr = Repr {
			states: Vec::with_capacity(graph.len()),
			transitions: Vec::new(),
			epsilon: Vec::new(),
		};
		for (_, node) in graph.nodes() {
			repr.states.push(StateRepr {
				name: node.name().to_owned(),
				start: node.is_start(),
				accepts: node.is_final(),
			});
			for (input, targets) in &node.transitions {
				for &next in targets {
					let prev = node.name().to_owned();
					let next = graph.name(next).to_owned();
					match input {
						Input::Epsilon => repr.epsilon.push((prev, next)),
						Input::Symbol(symbol) => repr.transitions.push((prev, symbol.clone(), next)),
					}
				}
			}
		}
		repr
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use maplit::btreeset;

	#[test]
	fn construct() {
		let mut nfa = NFA::<char>::new();
		nfa.add_start_state("p").unwrap();
		nfa.add_state("q");
		nfa.add_final_state("r");
		nfa.add_transition("p", 'a', "q").unwrap();
		nfa.add_transition("p", 'a', "r").unwrap();
		nfa.add_epsilon_transition("q", "r").unwrap();

		assert!(nfa.has_state("p"), "Start state missing");
		assert_eq!(vec!["p", "q", "r"], nfa.states().collect::<Vec<_>>());
		assert_eq!(vec!["r"], nfa.final_states().collect::<Vec<_>>());
		assert_eq!(Some("p"), nfa.start_state());
		assert_eq!(
			vec![&'a'],
			nfa.alphabet().iter().collect::<Vec<_>>(),
			"Epsilon leaked into the alphabet"
		);
		assert_eq!(
			vec!["q", "r"],
			nfa.successors("p", &Input::Symbol('a')).unwrap(),
			"Destinations were overwritten instead of accumulated"
		);
		assert_eq!(vec!["r"], nfa.successors("q", &Input::Epsilon).unwrap());
		assert!(nfa.successors("r", &Input::Symbol('a')).unwrap().is_empty());
	}

	#[test]
	fn start_and_final_coexist() {
		let mut nfa = NFA::<char>::new();
		nfa.add_final_state("p");
		nfa.add_start_state("p").unwrap();
		assert_eq!(Some("p"), nfa.start_state());
		assert_eq!(vec!["p"], nfa.final_states().collect::<Vec<_>>());
		assert_eq!(1, nfa.states().count(), "State was duplicated");
	}

	#[test]
	fn start_state_is_set_once() {
		let mut nfa = NFA::<char>::new();
		nfa.add_start_state("p").unwrap();
		nfa.add_start_state("p").unwrap();
		assert_eq!(
			Err(AutomatonError::InvalidAutomaton(Invalid::MultipleStartStates {
				current: "p".into(),
				requested: "q".into(),
			})),
			nfa.add_start_state("q")
		);
		assert!(!nfa.has_state("q"), "Rejected start state was added");
		assert_eq!(Some("p"), nfa.start_state());
	}

	#[test]
	fn transition_to_inexistent_state() {
		let mut nfa = NFA::<char>::new();
		nfa.add_start_state("p").unwrap();
		assert_eq!(
			Err(AutomatonError::InvalidAutomaton(Invalid::InexistentState(
				"q".into()
			))),
			nfa.add_transition("p", 'a', "q")
		);
		assert_eq!(
			Err(AutomatonError::InvalidAutomaton(Invalid::InexistentState(
				"x".into()
			))),
			nfa.add_transition("x", 'a', "p")
		);
		assert!(nfa.alphabet().is_empty(), "Failed transition touched the alphabet");
	}

	#[test]
	fn run() {
		let mut nfa = NFA::<char>::new();
		nfa.add_start_state("0").unwrap();
		nfa.add_state("1");
		nfa.add_final_state("2");
		nfa.add_transition("0", 'a', "1").unwrap();
		nfa.add_transition("0", 'a', "2").unwrap();
		nfa.add_transition("1", 'b', "1").unwrap();
		nfa.add_epsilon_transition("1", "2").unwrap();

		assert_eq!(Some(btreeset![nfa.get_id("0").unwrap()]), nfa.initial());
		assert!(nfa.run(&['a']), "Incorrect result on accepting run");
		assert!(nfa.run(&['a', 'b', 'b']), "Epsilon move not followed");
		assert!(!nfa.run(&['b']), "Incorrect result on rejecting run");
		assert!(!nfa.run(&[] as &[char]), "Empty word accepted");
	}

	#[test]
	fn deserialize() {
		let yaml = r"{states: [{name: p, start: true}, {name: q, accepts: true}], transitions: [[p, a, q], [q, b, q]], epsilon: [[q, p]]}";
		let nfa: NFA<char> = serde_yaml::from_str(yaml).unwrap();
		assert_eq!(Some("p"), nfa.start_state());
		assert_eq!(vec!["q"], nfa.final_states().collect::<Vec<_>>());
		assert!(
			nfa.run(&"aba".chars().collect::<Vec<_>>()),
			"Incorrect result after run"
		);
	}

	#[test]
	fn deserialize_invalid() {
		let duplicate = r"{states: [{name: p, start: true}, {name: p}]}";
		let err = serde_yaml::from_str::<NFA<char>>(duplicate).unwrap_err();
		assert!(err.to_string().contains("Duplicate state name"), "{}", err);

		let dangling = r"{states: [{name: p}], transitions: [[p, a, q]]}";
		let err = serde_yaml::from_str::<NFA<char>>(dangling).unwrap_err();
		assert!(err.to_string().contains("inexistent state"), "{}", err);

		let unknown = r"{states: [{name: p, initial: true}]}";
		assert!(serde_yaml::from_str::<NFA<char>>(unknown).is_err());
	}

	#[test]
	fn serialize_roundtrip() {
		let mut nfa = NFA::<char>::new();
		nfa.add_start_state("p").unwrap();
		nfa.add_final_state("q");
		nfa.add_transition("p", 'a', "q").unwrap();
		nfa.add_epsilon_transition("p", "q").unwrap();

		let yaml = serde_yaml::to_string(&nfa).unwrap();
		let back: NFA<char> = serde_yaml::from_str(&yaml).unwrap();
		assert_eq!(nfa.states().collect::<Vec<_>>(), back.states().collect::<Vec<_>>());
		assert_eq!(Some("p"), back.start_state());
		assert_eq!(vec!["q"], back.successors("p", &Input::Epsilon).unwrap());
		assert_eq!(vec!["q"], back.successors("p", &Input::Symbol('a')).unwrap());
	}
}
