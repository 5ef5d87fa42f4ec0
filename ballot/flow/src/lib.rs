mod flow;
mod outcome;

pub use {flow::*, outcome::*};
