use super::{graph::StateId, NFA};
use std::{collections::BTreeSet, hash::Hash, iter::FromIterator};

/// Label of the composite state holding no NFA state.
pub const SINK_LABEL: &str = "[]";

/// A set of NFA states in canonical form: sorted by id, without duplicates.
///
/// Two composites are the same DFA state iff they compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Composite(Vec<StateId>);

impl Composite {
	pub fn ids(&self) -> &[StateId] {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Canonical label, e.g. `[p, q]`. Members are listed by ascending id,
	/// which is the order the NFA states were declared in.
	/// The empty composite is labeled `sink`.
	pub fn label<I>(&self, nfa: &NFA<I>, sink: &str) -> String
	where
		I: Clone + Eq + Hash,
	{
		if self.is_empty() {
			return sink.to_owned();
		}
		let names: Vec<_> = self.0.iter().map(|&id| nfa.graph().name(id)).collect();
		format!("[{}]", names.join(", "))
	}
}

impl From<BTreeSet<StateId>> for Composite {
	fn from(set: BTreeSet<StateId>) -> Self {
		Self(set.into_iter().collect())
	}
}

impl FromIterator<StateId> for Composite {
	fn from_iter<T: IntoIterator<Item = StateId>>(iter: T) -> Self {
		iter.into_iter().collect::<BTreeSet<_>>().into()
	}
}

/// Decides whether a composite state accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalityRule {
	/// A member is flagged final, or a member's name contains any name that was
	/// ever declared final. Renamed states like `q1'` keep accepting as long as
	/// they carry the original name.
	NameContainment,
	/// A member is flagged final.
	Flag,
}

impl Default for FinalityRule {
	fn default() -> Self {
		Self::NameContainment
	}
}

impl FinalityRule {
	pub fn is_final<'a, I, S>(self, nfa: &NFA<I>, members: S) -> bool
	where
		I: Clone + Eq + Hash,
		S: IntoIterator<Item = &'a StateId>,
	{
		let graph = nfa.graph();
		members.into_iter().any(|&id| {
			let node = graph.node(id);
			node.is_final()
				|| (self == Self::NameContainment
					&& nfa
						.final_names()
						.iter()
						.any(|name| node.name().contains(name.as_str())))
		})
	}
}
