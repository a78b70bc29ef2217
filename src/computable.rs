use crate::computable::approximation::Node;
use crate::{Context, Decimal, Problem};
use core::fmt;
use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

mod approximation;

/// Decimal digits after the point which an approximation must get right
///
/// An approximation at precision `p` is within `10^-p` of the true value
pub type Precision = u32;

static NEXT_GRAPH: AtomicU64 = AtomicU64::new(0);

/// Identity of one computable number inside its [`Graph`]
///
/// An id remembers which graph made it, so it is only accepted by that graph.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    graph: u64,
    index: usize,
}

impl NodeId {
    /// Position of this node in the arena
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeId").field(&self.index).finish()
    }
}

/// Arena of computable numbers
///
/// Every number ever constructed lives here as a node, composed numbers
/// refer to their operands by [`NodeId`] so one operand may feed any number
/// of later compositions. Nodes are never changed or removed, they go away
/// with the graph.
///
/// Nothing is evaluated until a value is materialized, and nothing is cached:
/// each materialization walks the whole subgraph again.
///
/// # Examples
///
/// ```
/// use computable::{Decimal, Graph};
/// let graph = Graph::new();
/// let answer = (graph.literal(2) + graph.literal(3)) * graph.literal(4);
/// assert_eq!(answer.to_decimal(5).unwrap(), Decimal::new(20));
/// ```
///
/// Division is lazy, a zero divisor is only noticed when materializing
/// ```
/// use computable::{Graph, Problem};
/// let graph = Graph::new();
/// let oops = graph.literal(5) / graph.literal(0);
/// assert_eq!(oops.to_decimal(3), Err(Problem::DivisionByZero));
/// ```
pub struct Graph {
    id: u64,
    nodes: RefCell<Vec<Node>>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    /// An empty graph, whose ids no other graph will accept
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAPH.fetch_add(1, Ordering::Relaxed),
            nodes: RefCell::new(Vec::new()),
        }
    }

    /// How many numbers have been constructed in this graph
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Whether no number has been constructed in this graph yet
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    fn push(&self, node: Node) -> Number<'_> {
        let mut nodes = self.nodes.borrow_mut();
        debug_assert!(node
            .operands()
            .all(|n| n.graph == self.id && n.index < nodes.len()));
        nodes.push(node);
        Number {
            graph: self,
            id: NodeId {
                graph: self.id,
                index: nodes.len() - 1,
            },
        }
    }

    fn check(&self, id: NodeId) {
        assert!(
            id.graph == self.id && id.index < self.len(),
            "node {} is not in this graph",
            id.index
        );
    }

    /// Handle for a node previously constructed in this graph
    ///
    /// # Panics
    ///
    /// If the id was made by a different graph
    pub fn number(&self, id: NodeId) -> Number<'_> {
        self.check(id);
        Number { graph: self, id }
    }

    /// Exactly this value at every precision
    pub fn literal(&self, value: impl Into<Decimal>) -> Number<'_> {
        self.push(Node::Literal(value.into()))
    }

    /// Exactly the value written in decimal text, e.g. `"0.1"` or `"-2.5e3"`
    ///
    /// # Example
    ///
    /// ```
    /// use computable::{Decimal, Graph};
    /// let graph = Graph::new();
    /// let tenth = graph.parse("0.1").unwrap();
    /// let sum = tenth + graph.parse("0.2").unwrap();
    /// assert_eq!(sum.to_decimal(0).unwrap(), "0.3".parse::<Decimal>().unwrap());
    /// ```
    pub fn parse(&self, text: &str) -> Result<Number<'_>, Problem> {
        let value: Decimal = text.parse()?;
        Ok(self.literal(value))
    }

    /// Wrap an approximation procedure as it is
    ///
    /// The procedure must be deterministic, must terminate, and its result
    /// at precision `p` must lie within `10^-p` of the one true value it
    /// approximates, for every `p`.
    ///
    /// # Example
    ///
    /// ```
    /// use computable::{Decimal, Graph};
    /// use num::BigInt;
    /// let graph = Graph::new();
    /// // √2 truncated to p digits
    /// let root_two = graph.procedure(|p| {
    ///     let scaled = BigInt::from(2) * BigInt::from(10).pow(2 * p);
    ///     Decimal::from_parts(scaled.sqrt(), p)
    /// });
    /// assert_eq!(root_two.to_decimal(6).unwrap().to_string(), "1.414213");
    /// ```
    pub fn procedure<F>(&self, f: F) -> Number<'_>
    where
        F: Fn(Precision) -> Decimal + Send + 'static,
    {
        self.push(Node::Procedure(Box::new(f)))
    }

    /// Materialize the number `id` at precision `p` with default settings
    pub fn approximate(&self, id: NodeId, p: Precision) -> Result<Decimal, Problem> {
        self.approximate_with(id, p, &Context::default())
    }

    /// Materialize the number `id` at precision `p`
    ///
    /// # Panics
    ///
    /// If the id was made by a different graph
    pub fn approximate_with(
        &self,
        id: NodeId,
        p: Precision,
        cx: &Context,
    ) -> Result<Decimal, Problem> {
        self.check(id);
        debug!(node = id.index(), precision = p, "materializing");
        let nodes = self.nodes.borrow();
        approximation::approximate(&nodes, id, p, cx)
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("id", &self.id)
            .field("nodes", &*self.nodes.borrow())
            .finish()
    }
}

/// A computable number, as a handle into the [`Graph`] which owns it
///
/// Handles are cheap to copy. Composition builds a new node and never
/// changes either operand, so the same handle can be used again freely.
///
/// Combining handles from two different graphs is a programming error and
/// panics.
#[derive(Copy, Clone, Debug)]
pub struct Number<'g> {
    graph: &'g Graph,
    id: NodeId,
}

impl<'g> Number<'g> {
    /// Id of this number, which [`Graph::number`] turns back into a handle
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// The graph which owns this number
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    fn binary(self, other: Self, make: fn(NodeId, NodeId) -> Node) -> Self {
        assert!(
            std::ptr::eq(self.graph, other.graph),
            "cannot combine numbers from different graphs"
        );
        self.graph.push(make(self.id, other.id))
    }

    /// Sum, each operand is asked for one more digit than the result
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Self) -> Self {
        self.binary(other, Node::Add)
    }

    /// Product, each operand is asked for one more digit than the result
    ///
    /// # Known limitation
    ///
    /// The one digit margin only bounds the error while both operands have
    /// magnitude at most one. The error of a product grows with the size of
    /// the other operand, so for larger operands the result may miss its
    /// `10^-p` bound. Products of exact values are unaffected.
    pub fn multiply(self, other: Self) -> Self {
        self.binary(other, Node::Multiply)
    }

    /// Quotient, rounded to the requested precision
    ///
    /// Both operands are asked for [`Context::division_margin`] extra digits.
    /// Materializing fails with [`Problem::DivisionByZero`] if the divisor's
    /// approximation at that precision is exactly zero.
    pub fn divide(self, other: Self) -> Self {
        self.binary(other, Node::Divide)
    }

    /// Negation, exact at every precision
    pub fn negate(self) -> Self {
        self.graph.push(Node::Negate(self.id))
    }

    /// Difference, built as the sum with the negated `other`
    pub fn subtract(self, other: Self) -> Self {
        self.add(other.negate())
    }

    /// Materialize at precision `p` with default settings
    ///
    /// # Example
    ///
    /// ```
    /// use computable::Graph;
    /// let graph = Graph::new();
    /// let third = graph.literal(1) / graph.literal(3);
    /// assert_eq!(third.to_decimal(5).unwrap().to_string(), "0.33333");
    /// assert_eq!(third.to_decimal(10).unwrap().to_string(), "0.3333333333");
    /// ```
    pub fn to_decimal(&self, p: Precision) -> Result<Decimal, Problem> {
        self.graph.approximate(self.id, p)
    }

    /// Materialize at precision `p` with the rounding and margin of `cx`
    pub fn to_decimal_with(&self, p: Precision, cx: &Context) -> Result<Decimal, Problem> {
        self.graph.approximate_with(self.id, p, cx)
    }
}

use core::ops;

impl<'g> ops::Add for Number<'g> {
    type Output = Number<'g>;

    fn add(self, other: Self) -> Self::Output {
        Number::add(self, other)
    }
}

impl<'g> ops::Sub for Number<'g> {
    type Output = Number<'g>;

    fn sub(self, other: Self) -> Self::Output {
        self.subtract(other)
    }
}

impl<'g> ops::Mul for Number<'g> {
    type Output = Number<'g>;

    fn mul(self, other: Self) -> Self::Output {
        self.multiply(other)
    }
}

impl<'g> ops::Div for Number<'g> {
    type Output = Number<'g>;

    fn div(self, other: Self) -> Self::Output {
        self.divide(other)
    }
}

impl<'g> ops::Neg for Number<'g> {
    type Output = Number<'g>;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}
