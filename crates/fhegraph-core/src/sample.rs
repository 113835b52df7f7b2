//! Built-in example programs shown by the viewer before any real session is
//! loaded.

use crate::edge::{Edge, EdgeRole};
use crate::id::NodeId;
use crate::node::ProgramNode;
use crate::ops::Operation;
use crate::graph::ProgramGraph;

/// Source of the program compiled into [`sample_program`].
pub const SAMPLE_SOURCE: &str = r#"#[fhe_program(scheme = "bfv")]
fn sum_and_product(
    a: Cipher<Signed>,
    b: Cipher<Signed>,
    c: Cipher<Signed>,
    d: Cipher<Signed>,
) -> (Cipher<Signed>, Cipher<Signed>) {
    let x = a * b;
    let y = c * d;
    (x + y, x * y)
}
"#;

/// Compiled graph of [`SAMPLE_SOURCE`]: four inputs, three multiplies, one
/// add, three relinearizations, and two outputs joined by 13 edges.
///
/// | id | op               | operands        |
/// |----|------------------|-----------------|
/// | 0-3| InputCiphertext  |                 |
/// | 4  | Multiply         | 0 L, 1 R        |
/// | 5  | Multiply         | 2 L, 3 R        |
/// | 6  | Relinearize      | 4               |
/// | 7  | Add              | 6 L, 8 R        |
/// | 8  | Relinearize      | 5               |
/// | 9  | Multiply         | 6 L, 8 R        |
/// | 10 | Relinearize      | 9               |
/// | 11 | OutputCiphertext | 7               |
/// | 12 | OutputCiphertext | 10              |
pub fn sample_program() -> ProgramGraph {
    use EdgeRole::{Left, Right, Unary};

    let nodes = [
        Operation::InputCiphertext(0),
        Operation::InputCiphertext(1),
        Operation::InputCiphertext(2),
        Operation::InputCiphertext(3),
        Operation::Multiply,
        Operation::Multiply,
        Operation::Relinearize,
        Operation::Add,
        Operation::Relinearize,
        Operation::Multiply,
        Operation::Relinearize,
        Operation::OutputCiphertext,
        Operation::OutputCiphertext,
    ];
    let edges = [
        (0, 4, Left),
        (1, 4, Right),
        (2, 5, Left),
        (3, 5, Right),
        (4, 6, Unary),
        (6, 7, Left),
        (8, 7, Right),
        (5, 8, Unary),
        (6, 9, Left),
        (8, 9, Right),
        (9, 10, Unary),
        (7, 11, Unary),
        (10, 12, Unary),
    ];

    ProgramGraph::from_parts(
        nodes.into_iter().map(ProgramNode::new).collect(),
        edges
            .into_iter()
            .map(|(s, t, role)| Edge::new(NodeId(s), NodeId(t), role))
            .collect(),
    )
}

/// A single relinearized product of two inputs.
pub fn simple_multiply() -> ProgramGraph {
    use EdgeRole::{Left, Right, Unary};

    let nodes = [
        Operation::InputCiphertext(0),
        Operation::InputCiphertext(1),
        Operation::Multiply,
        Operation::Relinearize,
        Operation::OutputCiphertext,
    ];
    let edges = [(0, 2, Left), (1, 2, Right), (2, 3, Unary), (3, 4, Unary)];

    ProgramGraph::from_parts(
        nodes.into_iter().map(ProgramNode::new).collect(),
        edges
            .into_iter()
            .map(|(s, t, role)| Edge::new(NodeId(s), NodeId(t), role))
            .collect(),
    )
}
