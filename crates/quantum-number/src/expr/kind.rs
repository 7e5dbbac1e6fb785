//! Operation and function kinds of expression nodes.

use std::fmt;

/// Arithmetic operations an internal node can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OperationKind {
    /// Binary `+`.
    Add,
    /// Binary `-`.
    Subtract,
    /// Binary `×` (slot-wise).
    Multiply,
    /// Binary `/` (slot-wise, sentinel on zero denominators).
    Divide,
    /// Unary `-`.
    Negate,
}

impl OperationKind {
    /// All operation kinds.
    pub const ALL: [Self; 5] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::Negate,
    ];

    /// Number of operands the operation takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Negate => 1,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide => 2,
        }
    }

    /// Stable one-byte code used in content-addressed ids.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Add => 0x01,
            Self::Subtract => 0x02,
            Self::Multiply => 0x03,
            Self::Divide => 0x04,
            Self::Negate => 0x05,
        }
    }

    /// Infix symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract | Self::Negate => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Lowercase name (`add`, `subtract`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::Negate => "negate",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Functions a node can apply to a single argument.
///
/// Only [`Abs`](Self::Abs), [`Sqrt`](Self::Sqrt) and
/// [`Conjugate`](Self::Conjugate) have an exact definition over atomic
/// units. The transcendental kinds are reserved: evaluating them fails with
/// [`QnError::UnsupportedOperation`](crate::QnError::UnsupportedOperation)
/// instead of approximating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FunctionKind {
    /// Clear every sign flag.
    Abs,
    /// Slot-wise floor square root.
    Sqrt,
    /// Flip the sign of the imaginary slot.
    Conjugate,
    /// Reserved.
    Sin,
    /// Reserved.
    Cos,
    /// Reserved.
    Tan,
    /// Reserved.
    Exp,
    /// Reserved.
    Log,
}

impl FunctionKind {
    /// All function kinds.
    pub const ALL: [Self; 8] = [
        Self::Abs,
        Self::Sqrt,
        Self::Conjugate,
        Self::Sin,
        Self::Cos,
        Self::Tan,
        Self::Exp,
        Self::Log,
    ];

    /// True if the function can be evaluated exactly.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Abs | Self::Sqrt | Self::Conjugate)
    }

    /// Stable one-byte code used in content-addressed ids.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Abs => 0x11,
            Self::Sqrt => 0x12,
            Self::Conjugate => 0x13,
            Self::Sin => 0x21,
            Self::Cos => 0x22,
            Self::Tan => 0x23,
            Self::Exp => 0x24,
            Self::Log => 0x25,
        }
    }

    /// Lowercase name (`abs`, `sqrt`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Sqrt => "sqrt",
            Self::Conjugate => "conjugate",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Exp => "exp",
            Self::Log => "log",
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
