mod context;
pub use crate::context::{Context, Rounding};

mod computable;
pub use crate::computable::{Graph, NodeId, Number, Precision};

mod decimal;
pub use crate::decimal::Decimal;

mod problem;
pub use crate::problem::Problem;
