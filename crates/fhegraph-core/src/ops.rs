//! Operation vocabulary of a compiled BFV program graph.
//!
//! [`Operation`] is a closed set. The serde representation is externally
//! tagged, so unit variants travel as their bare name (`"Multiply"`) and the
//! one payload variant as a single-key map (`{"InputCiphertext": 2}`). Any
//! other tag fails to decode; there is no catch-all variant.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::edge::EdgeRole;

/// Number and kind of operands an operation consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// A graph source. Takes no incoming edges.
    Nullary,
    /// Consumes exactly one `Unary` operand.
    Unary,
    /// Consumes exactly one `Left` and one `Right` operand.
    Binary,
}

impl Arity {
    /// Edge roles a well-formed node of this arity receives, in operand order.
    pub fn operand_roles(self) -> &'static [EdgeRole] {
        match self {
            Arity::Nullary => &[],
            Arity::Unary => &[EdgeRole::Unary],
            Arity::Binary => &[EdgeRole::Left, EdgeRole::Right],
        }
    }
}

/// The computational role of one node in an FHE program graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Reads the encrypted program input at the given slot.
    InputCiphertext(usize),
    /// Ciphertext-ciphertext multiplication.
    Multiply,
    /// Ciphertext-ciphertext addition.
    Add,
    /// Shrinks a ciphertext back to two polynomials after a multiplication.
    Relinearize,
    /// Marks its operand as a program output. Always a sink.
    OutputCiphertext,
}

impl Operation {
    /// Variant name, stable across releases. Used as the user-visible label.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::InputCiphertext(_) => "InputCiphertext",
            Operation::Multiply => "Multiply",
            Operation::Add => "Add",
            Operation::Relinearize => "Relinearize",
            Operation::OutputCiphertext => "OutputCiphertext",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            Operation::InputCiphertext(_) => Arity::Nullary,
            Operation::Multiply | Operation::Add => Arity::Binary,
            Operation::Relinearize | Operation::OutputCiphertext => Arity::Unary,
        }
    }

    /// Returns the input slot if this is an `InputCiphertext`.
    pub fn input_slot(&self) -> Option<usize> {
        match self {
            Operation::InputCiphertext(slot) => Some(*slot),
            _ => None,
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Operation::InputCiphertext(_))
    }

    pub fn is_output(&self) -> bool {
        matches!(self, Operation::OutputCiphertext)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::InputCiphertext(slot) => write!(f, "InputCiphertext({})", slot),
            other => f.write_str(other.name()),
        }
    }
}
