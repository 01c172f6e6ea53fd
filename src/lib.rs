mod automaton;
mod closure;
mod dfa;
mod graph;
mod naming;
mod nfa;
mod subset;

pub use automaton::{Automaton, AutomatonError, Invalid};
pub use dfa::DFA;
pub use graph::StateId;
pub use naming::{Composite, FinalityRule, SINK_LABEL};
pub use nfa::{Input, NFA};
pub use subset::SubsetConstruction;
