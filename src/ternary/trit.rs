use core::fmt;
use core::ops::Neg;

/// A balanced-ternary scalar: one of {neg, neu, pos}, plus `Unknown`,
/// a sentinel only ever returned from a failed operation. `Unknown`
/// must never be written into a register or memory cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Trit {
    Neg,
    #[default]
    Neu,
    Pos,
    Unknown,
}

impl Trit {
    pub fn from_value(value: i8) -> Trit {
        match value {
            -1 => Trit::Neg,
            0 => Trit::Neu,
            1 => Trit::Pos,
            _ => Trit::Unknown,
        }
    }

    pub fn value(self) -> Option<i8> {
        match self {
            Trit::Neg => Some(-1),
            Trit::Neu => Some(0),
            Trit::Pos => Some(1),
            Trit::Unknown => None,
        }
    }

    pub fn is_valid(self) -> bool {
        !matches!(self, Trit::Unknown)
    }

    pub fn is_neutral(self) -> bool {
        matches!(self, Trit::Neu)
    }

    pub fn is_positive(self) -> bool {
        matches!(self, Trit::Pos)
    }

    pub fn is_negative(self) -> bool {
        matches!(self, Trit::Neg)
    }

    /// Trit-valued equality: +1 if equal, 0 if not equal, `Unknown` if
    /// either operand is invalid.
    pub fn trit_eq(self, other: Trit) -> Trit {
        if !self.is_valid() || !other.is_valid() {
            return Trit::Unknown;
        }
        if self == other {
            Trit::Pos
        } else {
            Trit::Neu
        }
    }
}

impl Neg for Trit {
    type Output = Trit;

    fn neg(self) -> Trit {
        match self {
            Trit::Neg => Trit::Pos,
            Trit::Pos => Trit::Neg,
            Trit::Neu => Trit::Neu,
            Trit::Unknown => Trit::Unknown,
        }
    }
}

impl fmt::Display for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Trit::Neg => '-',
            Trit::Neu => '0',
            Trit::Pos => '+',
            Trit::Unknown => '?',
        };
        write!(f, "{}", c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case]
    fn construction_round_trips_value() {
        assert_eq!(Trit::from_value(-1).value(), Some(-1));
        assert_eq!(Trit::from_value(0).value(), Some(0));
        assert_eq!(Trit::from_value(1).value(), Some(1));
        assert!(Trit::from_value(-1).is_valid());
    }

    #[test_case]
    fn out_of_range_value_is_unknown() {
        assert_eq!(Trit::from_value(2), Trit::Unknown);
        assert!(!Trit::from_value(5).is_valid());
    }

    #[test_case]
    fn negation_flips_sign_and_fixes_zero() {
        assert_eq!(-Trit::Pos, Trit::Neg);
        assert_eq!(-Trit::Neg, Trit::Pos);
        assert_eq!(-Trit::Neu, Trit::Neu);
        assert_eq!(-(-Trit::Pos), Trit::Pos);
    }

    #[test_case]
    fn trit_eq_reports_unknown_for_invalid_operands() {
        assert_eq!(Trit::Pos.trit_eq(Trit::Pos), Trit::Pos);
        assert_eq!(Trit::Pos.trit_eq(Trit::Neg), Trit::Neu);
        assert_eq!(Trit::Pos.trit_eq(Trit::Unknown), Trit::Unknown);
    }
}
