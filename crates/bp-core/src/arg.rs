use std::fmt::{Display, Formatter};

use crate::value::Value;

/// Diagnostic path of the argument currently being resolved.
///
/// Child paths borrow their parent, so building one per collection element
/// costs nothing until the path is actually formatted for an error or a
/// trace line.
#[derive(Debug, Clone, Copy)]
pub enum ArgName<'a> {
    Named(&'a str),
    Indexed(&'a ArgName<'a>, usize),
    Keyed(&'a ArgName<'a>, &'a Value),
}

impl<'a> ArgName<'a> {
    pub fn new(name: &'a str) -> Self {
        ArgName::Named(name)
    }

    /// Child path for the element at `index` (`arg[2]`).
    pub fn index<'b>(&'b self, index: usize) -> ArgName<'b>
    where
        'a: 'b,
    {
        ArgName::Indexed(self, index)
    }

    /// Child path for a map value stored under the resolved `key` (`arg[key]`).
    pub fn key<'b>(&'b self, key: &'b Value) -> ArgName<'b>
    where
        'a: 'b,
    {
        ArgName::Keyed(self, key)
    }

    /// Name of the top-level argument this path starts from.
    pub fn root(&self) -> &str {
        match self {
            ArgName::Named(name) => name,
            ArgName::Indexed(parent, _) | ArgName::Keyed(parent, _) => parent.root(),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            ArgName::Named(_) => 0,
            ArgName::Indexed(parent, _) | ArgName::Keyed(parent, _) => parent.depth() + 1,
        }
    }
}

impl Display for ArgName<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgName::Named(name) => f.write_str(name),
            ArgName::Indexed(parent, index) => write!(f, "{}[{}]", parent, index),
            ArgName::Keyed(parent, key) => write!(f, "{}[{}]", parent, key),
        }
    }
}
