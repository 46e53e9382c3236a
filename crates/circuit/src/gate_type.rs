//! Gate types, their stable wire-format codes, and engine dispatch classes.

/// Integer gate-type codes used by circuit descriptions.
///
/// These values are the contract between circuit-description tooling and the
/// engines. Interoperating descriptions rely on them; they must never be
/// renumbered.
pub mod codes {
    /// Constant-false generator.
    pub const FIXED_ZERO_GATE: i8 = 0;
    /// NOR.
    pub const NOR_GATE: i8 = 1;
    /// NOR with the second input inverted.
    pub const NORN_GATE: i8 = 2;
    /// AND with the second input inverted.
    pub const ANDN_GATE: i8 = 4;
    /// XOR.
    pub const XOR_GATE: i8 = 6;
    /// NAND.
    pub const NAND_GATE: i8 = 7;
    /// AND.
    pub const AND_GATE: i8 = 8;
    /// XNOR.
    pub const XNOR_GATE: i8 = 9;
    /// NAND with the second input inverted.
    pub const NANDN_GATE: i8 = 11;
    /// Inverter.
    pub const NOT_GATE: i8 = 12;
    /// OR with the second input inverted.
    pub const ORN_GATE: i8 = 13;
    /// OR.
    pub const OR_GATE: i8 = 14;
    /// Constant-true generator.
    pub const FIXED_ONE_GATE: i8 = 15;
    /// Sequential latch carrying a wire value across cycles.
    pub const DFF_GATE: i8 = -1;

    /// Bookkeeping tag for gates that consume garbled-table rows.
    pub const TABLE_ID: i8 = -1;
    /// Bookkeeping tag for linear (free-XOR) gates.
    pub const XOR_ID: i8 = -2;
    /// Bookkeeping tag for inverter (free-NOT) gates.
    pub const NOT_ID: i8 = -3;
}

/// Gate type of a [`GarbledGate`](crate::GarbledGate).
///
/// The `*N` variants invert the second input of the base gate. Two-input
/// gates read `input0` and `input1`; [`Not`](Self::Not) and
/// [`Dff`](Self::Dff) read only `input0`; the fixed gates read nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateType {
    /// Constant false.
    FixedZero,
    /// `!(a | b)`
    Nor,
    /// `!(a | !b)`
    Norn,
    /// `a & !b`
    Andn,
    /// `a ^ b`
    Xor,
    /// `!(a & b)`
    Nand,
    /// `a & b`
    And,
    /// `!(a ^ b)`
    Xnor,
    /// `!(a & !b)`
    Nandn,
    /// `!a`
    Not,
    /// `a | !b`
    Orn,
    /// `a | b`
    Or,
    /// Constant true.
    FixedOne,
    /// Latch: output takes the value of `input0` from the previous cycle.
    Dff,
}

/// Engine dispatch class of a gate type.
///
/// Half-gates cover every AND-family gate by decomposing
/// `g(a, b) = invert_out ^ ((a ^ invert_a) & (b ^ invert_b))`; input and
/// output inversions are free under Free-XOR, so all eight variants share one
/// garbling path and a single evaluation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// AND-family gate garbled with half-gates; consumes two table rows.
    Table {
        /// Invert the first input of the underlying AND.
        invert_a: bool,
        /// Invert the second input of the underlying AND.
        invert_b: bool,
        /// Invert the output of the underlying AND.
        invert_out: bool,
    },
    /// Linear gate, no table rows; `invert_out` distinguishes XNOR from XOR.
    FreeXor {
        /// Complement the output (XNOR).
        invert_out: bool,
    },
    /// Single-input inverter, no table rows.
    FreeNot,
    /// Constant generator.
    Fixed {
        /// The constant produced.
        value: bool,
    },
    /// Sequential latch; relabeling handled by the cycle driver.
    Latch,
}

impl Dispatch {
    /// The legacy bookkeeping tag for this class.
    ///
    /// [`codes::TABLE_ID`] for row-consuming gates, [`codes::XOR_ID`] for
    /// linear gates, [`codes::NOT_ID`] for inverters. Constants, latches and
    /// anything else outside the original three-way split get `None`.
    pub const fn bookkeeping_id(self) -> Option<i8> {
        match self {
            Dispatch::Table { .. } => Some(codes::TABLE_ID),
            Dispatch::FreeXor { .. } => Some(codes::XOR_ID),
            Dispatch::FreeNot => Some(codes::NOT_ID),
            Dispatch::Fixed { .. } | Dispatch::Latch => None,
        }
    }
}

impl GateType {
    /// The stable wire-format code for this gate type.
    pub const fn code(self) -> i8 {
        match self {
            GateType::FixedZero => codes::FIXED_ZERO_GATE,
            GateType::Nor => codes::NOR_GATE,
            GateType::Norn => codes::NORN_GATE,
            GateType::Andn => codes::ANDN_GATE,
            GateType::Xor => codes::XOR_GATE,
            GateType::Nand => codes::NAND_GATE,
            GateType::And => codes::AND_GATE,
            GateType::Xnor => codes::XNOR_GATE,
            GateType::Nandn => codes::NANDN_GATE,
            GateType::Not => codes::NOT_GATE,
            GateType::Orn => codes::ORN_GATE,
            GateType::Or => codes::OR_GATE,
            GateType::FixedOne => codes::FIXED_ONE_GATE,
            GateType::Dff => codes::DFF_GATE,
        }
    }

    /// Look a gate type up by its wire-format code.
    pub const fn from_code(code: i8) -> Option<Self> {
        Some(match code {
            codes::FIXED_ZERO_GATE => GateType::FixedZero,
            codes::NOR_GATE => GateType::Nor,
            codes::NORN_GATE => GateType::Norn,
            codes::ANDN_GATE => GateType::Andn,
            codes::XOR_GATE => GateType::Xor,
            codes::NAND_GATE => GateType::Nand,
            codes::AND_GATE => GateType::And,
            codes::XNOR_GATE => GateType::Xnor,
            codes::NANDN_GATE => GateType::Nandn,
            codes::NOT_GATE => GateType::Not,
            codes::ORN_GATE => GateType::Orn,
            codes::OR_GATE => GateType::Or,
            codes::FIXED_ONE_GATE => GateType::FixedOne,
            codes::DFF_GATE => GateType::Dff,
            _ => return None,
        })
    }

    /// How the engines process this gate.
    pub const fn dispatch(self) -> Dispatch {
        match self {
            GateType::And => Dispatch::Table {
                invert_a: false,
                invert_b: false,
                invert_out: false,
            },
            GateType::Andn => Dispatch::Table {
                invert_a: false,
                invert_b: true,
                invert_out: false,
            },
            GateType::Nand => Dispatch::Table {
                invert_a: false,
                invert_b: false,
                invert_out: true,
            },
            GateType::Nandn => Dispatch::Table {
                invert_a: false,
                invert_b: true,
                invert_out: true,
            },
            // a | b = !(!a & !b), and the inverted-input variants follow.
            GateType::Or => Dispatch::Table {
                invert_a: true,
                invert_b: true,
                invert_out: true,
            },
            GateType::Orn => Dispatch::Table {
                invert_a: true,
                invert_b: false,
                invert_out: true,
            },
            GateType::Nor => Dispatch::Table {
                invert_a: true,
                invert_b: true,
                invert_out: false,
            },
            GateType::Norn => Dispatch::Table {
                invert_a: true,
                invert_b: false,
                invert_out: false,
            },
            GateType::Xor => Dispatch::FreeXor { invert_out: false },
            GateType::Xnor => Dispatch::FreeXor { invert_out: true },
            GateType::Not => Dispatch::FreeNot,
            GateType::FixedZero => Dispatch::Fixed { value: false },
            GateType::FixedOne => Dispatch::Fixed { value: true },
            GateType::Dff => Dispatch::Latch,
        }
    }

    /// Whether this gate consumes garbled-table rows.
    pub const fn consumes_table(self) -> bool {
        matches!(self.dispatch(), Dispatch::Table { .. })
    }

    /// Whether this gate reads both input wires.
    pub const fn is_two_input(self) -> bool {
        matches!(
            self.dispatch(),
            Dispatch::Table { .. } | Dispatch::FreeXor { .. }
        )
    }

    /// Cleartext semantics. Single-input gates ignore `b`; constants ignore
    /// both. [`Dff`](Self::Dff) returns `a` (the latched data input).
    pub const fn eval(self, a: bool, b: bool) -> bool {
        match self {
            GateType::FixedZero => false,
            GateType::FixedOne => true,
            GateType::And => a & b,
            GateType::Andn => a & !b,
            GateType::Nand => !(a & b),
            GateType::Nandn => !(a & !b),
            GateType::Or => a | b,
            GateType::Orn => a | !b,
            GateType::Nor => !(a | b),
            GateType::Norn => !(a | !b),
            GateType::Xor => a ^ b,
            GateType::Xnor => !(a ^ b),
            GateType::Not => !a,
            GateType::Dff => a,
        }
    }

    /// All gate types, in code order.
    pub const ALL: [GateType; 14] = [
        GateType::FixedZero,
        GateType::Nor,
        GateType::Norn,
        GateType::Andn,
        GateType::Xor,
        GateType::Nand,
        GateType::And,
        GateType::Xnor,
        GateType::Nandn,
        GateType::Not,
        GateType::Orn,
        GateType::Or,
        GateType::FixedOne,
        GateType::Dff,
    ];
}
