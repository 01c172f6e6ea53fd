use std::fmt;

/// Trait for running an automaton over a word.
///
/// Simulation keeps no state inside the automaton: every step maps an explicit
/// configuration to the next one.
pub trait Automaton<I> {
	/// Configuration the automaton is in between two inputs.
	type State: Clone;

	/// Configuration before any input was read.
	/// Returns None if the automaton has no start state.
	fn initial(&self) -> Option<Self::State>;

	/// Performs a single state transition.
	/// Returns None if `input` leads nowhere.
	fn step(&self, state: &Self::State, input: &I) -> Option<Self::State>;

	/// Checks whether a configuration is accepting.
	fn is_accepting(&self, state: &Self::State) -> bool;

	/// Runs the automaton on a sequence of inputs.
	fn run<'a, V>(&self, inputs: V) -> bool
	where
		V: IntoIterator<Item = &'a I>,
		I: 'a,
	{
		let mut state = match self.initial() {
			Some(state) => state,
			None => return false,
		};
		for input in inputs {
			state = match self.step(&state, input) {
				Some(next) => next,
				None => return false,
			};
		}
		self.is_accepting(&state)
	}
}

/// Reasons an automaton is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invalid {
	MissingStartState,
	InexistentState(String),
	MultipleStartStates { current: String, requested: String },
}

/// Enum representing an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutomatonError {
	InvalidAutomaton(Invalid),
	DuplicateStateName(String),
}

impl From<Invalid> for AutomatonError {
	fn from(invalid: Invalid) -> Self {
		Self::InvalidAutomaton(invalid)
	}
}

impl fmt::Display for Invalid {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::MissingStartState => write!(f, "no start state"),
			Self::InexistentState(state) => write!(f, "inexistent state \"{}\"", state),
			Self::MultipleStartStates { current, requested } => write!(
				f,
				"cannot make \"{}\" the start state, \"{}\" already is",
				requested, current
			),
		}
	}
}

impl fmt::Display for AutomatonError {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::InvalidAutomaton(invalid) => write!(f, "Invalid automaton: {}", invalid),
			Self::DuplicateStateName(state) => write!(f, "Duplicate state name \"{}\"", state),
		}
	}
}

impl std::error::Error for AutomatonError {}
