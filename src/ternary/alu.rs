use super::trit::Trit;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AluFlags {
    pub overflow: bool,
    pub underflow: bool,
    pub zero: bool,
    pub negative: bool,
    pub positive: bool,
}

impl AluFlags {
    pub fn clear(&mut self) {
        *self = AluFlags::default();
    }

    fn set_from_result(&mut self, result: Trit) {
        self.zero = result.is_neutral();
        self.negative = result.is_negative();
        self.positive = result.is_positive();
    }
}

/// Stateless arithmetic/logic over trits. Condition flags are updated on
/// every operation; `clear_flags` resets them explicitly.
#[derive(Debug, Default)]
pub struct TernaryAlu {
    pub flags: AluFlags,
}

impl TernaryAlu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_flags(&mut self) {
        self.flags.clear();
    }

    /// Balanced-ternary sum of two single-trit values, reduced back into
    /// {-1,0,1} with carry reported as overflow (sum=2) or underflow (sum=-2).
    fn wrapped_sum(a: i8, b: i8) -> (i8, bool, bool) {
        match a + b {
            sum @ -1..=1 => (sum, false, false),
            2 => (-1, true, false),
            -2 => (1, false, true),
            _ => (0, false, false),
        }
    }

    pub fn add(&mut self, a: Trit, b: Trit) -> Trit {
        self.clear_flags();
        let (Some(av), Some(bv)) = (a.value(), b.value()) else {
            return Trit::Unknown;
        };
        let (v, overflow, underflow) = Self::wrapped_sum(av, bv);
        self.flags.overflow = overflow;
        self.flags.underflow = underflow;
        let result = Trit::from_value(v);
        self.flags.set_from_result(result);
        result
    }

    pub fn sub(&mut self, a: Trit, b: Trit) -> Trit {
        if !b.is_valid() {
            self.clear_flags();
            return Trit::Unknown;
        }
        self.add(a, -b)
    }

    pub fn mul(&mut self, a: Trit, b: Trit) -> Trit {
        self.clear_flags();
        let (Some(av), Some(bv)) = (a.value(), b.value()) else {
            return Trit::Unknown;
        };
        let result = Trit::from_value(av * bv);
        self.flags.set_from_result(result);
        result
    }

    /// Division by zero returns `Unknown` and leaves flags untouched beyond
    /// `zero`, which is set only when the dividend itself is neutral.
    pub fn div(&mut self, a: Trit, b: Trit) -> Trit {
        self.clear_flags();
        let (Some(av), Some(bv)) = (a.value(), b.value()) else {
            return Trit::Unknown;
        };
        if bv == 0 {
            self.flags.zero = av == 0;
            return Trit::Unknown;
        }
        let result = Trit::from_value(av / bv);
        self.flags.set_from_result(result);
        result
    }

    pub fn and(&mut self, a: Trit, b: Trit) -> Trit {
        self.clear_flags();
        let (Some(av), Some(bv)) = (a.value(), b.value()) else {
            return Trit::Unknown;
        };
        let result = Trit::from_value(av.min(bv));
        self.flags.set_from_result(result);
        result
    }

    pub fn or(&mut self, a: Trit, b: Trit) -> Trit {
        self.clear_flags();
        let (Some(av), Some(bv)) = (a.value(), b.value()) else {
            return Trit::Unknown;
        };
        let result = Trit::from_value(av.max(bv));
        self.flags.set_from_result(result);
        result
    }

    pub fn not(&mut self, a: Trit) -> Trit {
        self.clear_flags();
        if !a.is_valid() {
            return Trit::Unknown;
        }
        let result = -a;
        self.flags.set_from_result(result);
        result
    }

    /// `xor(a,b) = (a+b) mod 3`, mapped back into {-1,0,1}. Unlike `add`,
    /// this does not report overflow/underflow; it is a logic op, not an
    /// arithmetic one.
    pub fn xor(&mut self, a: Trit, b: Trit) -> Trit {
        self.clear_flags();
        let (Some(av), Some(bv)) = (a.value(), b.value()) else {
            return Trit::Unknown;
        };
        let (v, _, _) = Self::wrapped_sum(av, bv);
        let result = Trit::from_value(v);
        self.flags.set_from_result(result);
        result
    }

    pub fn compare(&mut self, a: Trit, b: Trit) -> Trit {
        self.clear_flags();
        let (Some(av), Some(bv)) = (a.value(), b.value()) else {
            return Trit::Unknown;
        };
        let result = if av > bv {
            Trit::Pos
        } else if av < bv {
            Trit::Neg
        } else {
            Trit::Neu
        };
        self.flags.set_from_result(result);
        result
    }

    pub fn greater_than(&mut self, a: Trit, b: Trit) -> Trit {
        match self.compare(a, b) {
            Trit::Pos => Trit::Pos,
            Trit::Unknown => Trit::Unknown,
            _ => Trit::Neg,
        }
    }

    pub fn less_than(&mut self, a: Trit, b: Trit) -> Trit {
        match self.compare(a, b) {
            Trit::Neg => Trit::Pos,
            Trit::Unknown => Trit::Unknown,
            _ => Trit::Neg,
        }
    }

    /// A single trit has no internal structure to shift; any |k| >= 1
    /// degenerates to neutral, per the documented contract.
    pub fn shift(&mut self, a: Trit, k: i32) -> Trit {
        self.clear_flags();
        if !a.is_valid() {
            return Trit::Unknown;
        }
        let result = if k == 0 { a } else { Trit::Neu };
        self.flags.set_from_result(result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case]
    fn and_is_min_or_is_max() {
        let mut alu = TernaryAlu::new();
        assert_eq!(alu.and(Trit::Pos, Trit::Neg), Trit::Neg);
        assert_eq!(alu.or(Trit::Pos, Trit::Neg), Trit::Pos);
    }

    #[test_case]
    fn not_is_involution() {
        let mut alu = TernaryAlu::new();
        let a = Trit::Pos;
        let n = alu.not(a);
        assert_eq!(alu.not(n), a);
    }

    #[test_case]
    fn compare_orders_values() {
        let mut alu = TernaryAlu::new();
        assert_eq!(alu.compare(Trit::Pos, Trit::Neg), Trit::Pos);
        assert_eq!(alu.compare(Trit::Neg, Trit::Pos), Trit::Neg);
        assert_eq!(alu.compare(Trit::Neu, Trit::Neu), Trit::Neu);
    }

    #[test_case]
    fn add_overflow_wraps_with_flag() {
        let mut alu = TernaryAlu::new();
        let result = alu.add(Trit::Pos, Trit::Pos);
        assert_eq!(result, Trit::Neg);
        assert!(alu.flags.overflow);
    }

    #[test_case]
    fn add_cancels_to_zero() {
        let mut alu = TernaryAlu::new();
        assert_eq!(alu.add(Trit::Pos, Trit::Neg), Trit::Neu);
        assert!(alu.flags.zero);
    }

    #[test_case]
    fn mul_of_negatives_is_positive() {
        let mut alu = TernaryAlu::new();
        assert_eq!(alu.mul(Trit::Neg, Trit::Neg), Trit::Pos);
        assert!(!alu.flags.overflow);
    }

    #[test_case]
    fn div_by_zero_is_unknown() {
        let mut alu = TernaryAlu::new();
        assert_eq!(alu.div(Trit::Pos, Trit::Neu), Trit::Unknown);
    }

    #[test_case]
    fn shift_by_nonzero_is_always_neutral() {
        let mut alu = TernaryAlu::new();
        assert_eq!(alu.shift(Trit::Pos, 1), Trit::Neu);
        assert_eq!(alu.shift(Trit::Neg, -3), Trit::Neu);
        assert_eq!(alu.shift(Trit::Pos, 0), Trit::Pos);
    }
}
