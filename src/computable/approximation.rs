use crate::computable::{NodeId, Precision};
use crate::{Context, Decimal, Problem};
use core::fmt;
use tracing::{debug, trace};

// Each operand of a sum or product is asked for this many more digits
const MARGIN: Precision = 1;

pub(super) type Procedure = Box<dyn Fn(Precision) -> Decimal + Send>;

pub(super) enum Node {
    Literal(Decimal),
    Procedure(Procedure),
    Negate(NodeId),
    Add(NodeId, NodeId),
    Multiply(NodeId, NodeId),
    Divide(NodeId, NodeId),
}

impl Node {
    pub(super) fn operands(&self) -> impl Iterator<Item = NodeId> {
        use Node::*;

        let (a, b) = match self {
            Literal(_) | Procedure(_) => (None, None),
            Negate(n) => (Some(*n), None),
            Add(a, b) | Multiply(a, b) | Divide(a, b) => (Some(*a), Some(*b)),
        };
        a.into_iter().chain(b)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Node::*;

        match self {
            Literal(d) => f.debug_tuple("Literal").field(d).finish(),
            Procedure(_) => f.write_str("Procedure(..)"),
            Negate(n) => f.debug_tuple("Negate").field(n).finish(),
            Add(a, b) => f.debug_tuple("Add").field(a).field(b).finish(),
            Multiply(a, b) => f.debug_tuple("Multiply").field(a).field(b).finish(),
            Divide(a, b) => f.debug_tuple("Divide").field(a).field(b).finish(),
        }
    }
}

pub(super) fn approximate(
    nodes: &[Node],
    id: NodeId,
    p: Precision,
    cx: &Context,
) -> Result<Decimal, Problem> {
    use Node::*;

    trace!(node = id.index(), precision = p, "approximate");
    match &nodes[id.index()] {
        Literal(d) => Ok(d.clone()),
        Procedure(f) => Ok(f(p)),
        Negate(n) => Ok(-approximate(nodes, *n, p, cx)?),
        Add(a, b) => add(nodes, *a, *b, p, cx),
        Multiply(a, b) => multiply(nodes, *a, *b, p, cx),
        Divide(a, b) => divide(nodes, *a, *b, p, cx),
    }
}

fn add(
    nodes: &[Node],
    a: NodeId,
    b: NodeId,
    p: Precision,
    cx: &Context,
) -> Result<Decimal, Problem> {
    let inner = p.saturating_add(MARGIN);
    let a = approximate(nodes, a, inner, cx)?;
    let b = approximate(nodes, b, inner, cx)?;
    Ok(a + b)
}

fn multiply(
    nodes: &[Node],
    a: NodeId,
    b: NodeId,
    p: Precision,
    cx: &Context,
) -> Result<Decimal, Problem> {
    // Not magnitude aware, see Number::multiply
    let inner = p.saturating_add(MARGIN);
    let a = approximate(nodes, a, inner, cx)?;
    let b = approximate(nodes, b, inner, cx)?;
    a.checked_mul(&b)
}

fn divide(
    nodes: &[Node],
    a: NodeId,
    b: NodeId,
    p: Precision,
    cx: &Context,
) -> Result<Decimal, Problem> {
    let inner = p.saturating_add(cx.division_margin());
    let dividend = approximate(nodes, a, inner, cx)?;
    let divisor = approximate(nodes, b, inner, cx)?;

    // An exactly zero approximation doesn't prove the divisor is zero,
    // but nothing better is known at this precision
    if divisor.is_zero() {
        debug!(divisor = b.index(), precision = inner, "division by zero");
        return Err(Problem::DivisionByZero);
    }
    dividend.div_rounded(&divisor, p, cx.rounding())
}
