use crate::Precision;

/// How a quotient is brought to the requested number of fractional digits
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Rounding {
    /// Round to nearest, ties to the even neighbour
    #[default]
    HalfEven,
    /// Round to nearest, ties away from zero
    HalfUp,
    /// Truncate towards zero
    Down,
    /// Towards negative infinity
    Floor,
    /// Towards positive infinity
    Ceiling,
}

/// Evaluation settings threaded through every materialization
///
/// Nothing here is global: two graphs may be materialized with different
/// contexts, on different threads, without affecting one another.
///
/// # Example
///
/// ```
/// use computable::{Context, Graph, Rounding};
/// let graph = Graph::new();
/// let two_thirds = graph.literal(2) / graph.literal(3);
/// let down = Context::default().with_rounding(Rounding::Down);
/// assert_eq!(two_thirds.to_decimal_with(4, &down).unwrap().to_string(), "0.6666");
/// assert_eq!(two_thirds.to_decimal(4).unwrap().to_string(), "0.6667");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Context {
    rounding: Rounding,
    division_margin: Precision,
}

impl Context {
    /// Fewest extra digits a division asks of its operands
    pub const MIN_DIVISION_MARGIN: Precision = 10;

    /// Round half to even, with the smallest division margin
    pub const fn new() -> Self {
        Self {
            rounding: Rounding::HalfEven,
            division_margin: Self::MIN_DIVISION_MARGIN,
        }
    }

    /// Same settings, rounding quotients with `rounding` instead
    pub const fn with_rounding(self, rounding: Rounding) -> Self {
        Self { rounding, ..self }
    }

    /// Extra digits requested from both operands of a division
    ///
    /// Values below [`Context::MIN_DIVISION_MARGIN`] are raised to it
    pub const fn with_division_margin(self, margin: Precision) -> Self {
        let division_margin = if margin < Self::MIN_DIVISION_MARGIN {
            Self::MIN_DIVISION_MARGIN
        } else {
            margin
        };
        Self {
            division_margin,
            ..self
        }
    }

    /// How quotients are rounded
    pub const fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Extra digits each division operand is asked for
    pub const fn division_margin(&self) -> Precision {
        self.division_margin
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
