use super::{
	graph::StateId,
	naming::{Composite, FinalityRule, SINK_LABEL},
	AutomatonError, Invalid, DFA, NFA,
};
use log::{debug, trace};
use std::{
	collections::{HashMap, VecDeque},
	hash::Hash,
};

/// Converts an NFA into an equivalent DFA by the subset construction.
///
/// Composite states are discovered breadth-first from the epsilon closure of
/// the start state; for every discovered state each alphabet symbol is
/// followed in alphabet order. The result is total: a symbol that leads to no
/// NFA state leads to the sink state instead, which loops on itself.
pub struct SubsetConstruction<'a, I>
where
	I: Eq + Hash,
{
	nfa: &'a NFA<I>,
	finality: FinalityRule,
	sink_label: String,
}

impl<'a, I> SubsetConstruction<'a, I>
where
	I: Clone + Eq + Hash,
{
	pub fn new(nfa: &'a NFA<I>) -> Self {
		Self {
			nfa,
			finality: FinalityRule::default(),
			sink_label: SINK_LABEL.to_owned(),
		}
	}

	/// Sets the rule deciding which composite states accept.
	pub fn finality(mut self, rule: FinalityRule) -> Self {
		self.finality = rule;
		self
	}

	/// Sets the label of the state holding no NFA state.
	pub fn sink_label<S>(mut self, label: S) -> Self
	where
		S: Into<String>,
	{
		self.sink_label = label.into();
		self
	}

	/// Runs the construction.
	///
	/// Returns an `Invalid::MissingStartState` error if the NFA has no start state, or an
	/// `AutomatonError::DuplicateStateName` error if two distinct composites get the same label.
	pub fn run(&self) -> Result<DFA<I>, AutomatonError> {
		let nfa = self.nfa;
		let start = nfa.graph().start().ok_or(Invalid::MissingStartState)?;
		debug!(
			"subset construction over {} NFA states and {} symbols",
			nfa.graph().len(),
			nfa.alphabet().len()
		);

		let mut builder = Builder {
			dfa: DFA::with_alphabet(nfa.alphabet().clone()),
			discovered: HashMap::new(),
			worklist: VecDeque::new(),
		};
		let initial = builder.discover(self, nfa.epsilon_closure(start).into())?;
		builder.dfa.set_start(initial);

		while let Some((composite, from)) = builder.worklist.pop_front() {
			for symbol in nfa.alphabet() {
				let target: Composite = nfa.closure_union(composite.ids(), symbol).into();
				let to = match builder.discovered.get(&target) {
					Some(&to) => to,
					None => builder.discover(self, target)?,
				};
				builder.dfa.add_transition(from, symbol.clone(), to);
			}
		}

		debug!("subset construction produced {} DFA states", builder.dfa.len());
		Ok(builder.dfa)
	}

	fn label(&self, composite: &Composite) -> String {
		composite.label(self.nfa, &self.sink_label)
	}
}

/// Scratch state of a single construction run.
struct Builder<I>
where
	I: Eq + Hash,
{
	dfa: DFA<I>,
	discovered: HashMap<Composite, StateId>,
	worklist: VecDeque<(Composite, StateId)>,
}

impl<I> Builder<I>
where
	I: Clone + Eq + Hash,
{
	/// Creates the DFA state for a composite seen for the first time and queues it.
	fn discover(
		&mut self,
		construction: &SubsetConstruction<I>,
		composite: Composite,
	) -> Result<StateId, AutomatonError> {
		let label = construction.label(&composite);
		let accepts = construction
			.finality
			.is_final(construction.nfa, composite.ids());
		let id = self.dfa.add_state(&label, accepts)?;
		if composite.is_empty() {
			trace!("created sink state {}", label);
		} else {
			trace!("discovered {} (accepting: {})", label, accepts);
		}
		self.discovered.insert(composite.clone(), id);
		self.worklist.push_back((composite, id));
		Ok(id)
	}
}

impl<I> NFA<I>
where
	I: Clone + Eq + Hash,
{
	/// Converts the automaton into an equivalent DFA.
	pub fn to_dfa(&self) -> Result<DFA<I>, AutomatonError> {
		SubsetConstruction::new(self).run()
	}
}
