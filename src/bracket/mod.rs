mod engine;
mod node;
mod seeding;

pub use engine::{Bracket, BracketState};
pub use node::{BracketNode, NodeId, Slot};
