use super::{graph::StateId, nfa::Input, AutomatonError, NFA};
use std::{collections::BTreeSet, hash::Hash};

impl<I> NFA<I>
where
	I: Clone + Eq + Hash,
{
	/// States reachable from `state` through zero or more epsilon moves,
	/// `state` included.
	///
	/// The visited set is local to the call, so repeated or nested calls never
	/// see each other's markers.
	pub fn epsilon_closure(&self, state: StateId) -> BTreeSet<StateId> {
		let graph = self.graph();
		let mut closure = BTreeSet::new();
		let mut stack = vec![state];
		while let Some(current) = stack.pop() {
			if !closure.insert(current) {
				continue;
			}
			if let Some(targets) = graph.node(current).target(&Input::Epsilon) {
				// push in reverse so targets expand in insertion order
				stack.extend(targets.iter().rev().filter(|next| !closure.contains(*next)));
			}
		}
		closure
	}

	/// Epsilon closure of the state named `name`, as names in declaration order.
	pub fn epsilon_closure_of(&self, name: &str) -> Result<Vec<&str>, AutomatonError> {
		let id = self.get_id(name)?;
		Ok(self
			.epsilon_closure(id)
			.into_iter()
			.map(|id| self.graph().name(id))
			.collect())
	}

	/// Union of the epsilon closures of every state reachable from `states`
	/// by one `symbol` move.
	pub fn closure_union<'a, S>(&self, states: S, symbol: &I) -> BTreeSet<StateId>
	where
		S: IntoIterator<Item = &'a StateId>,
	{
		let input = Input::Symbol(symbol.clone());
		let mut union = BTreeSet::new();
		for &state in states {
			if let Some(targets) = self.graph().node(state).target(&input) {
				for &next in targets {
					if !union.contains(&next) {
						union.extend(self.epsilon_closure(next));
					}
				}
			}
		}
		union
	}
}
