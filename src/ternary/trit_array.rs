use alloc::vec;
use alloc::vec::Vec;
use super::trit::Trit;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayError {
    LengthMismatch,
    OutOfRange,
}

/// An ordered sequence of trits. Length is fixed at construction; every
/// element starts `Neu` and is always a valid trit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TritArray {
    trits: Vec<Trit>,
}

impl TritArray {
    pub fn new(len: usize) -> Self {
        Self {
            trits: vec![Trit::Neu; len],
        }
    }

    pub fn from_trits(trits: &[Trit]) -> Self {
        Self {
            trits: trits.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.trits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trits.is_empty()
    }

    pub fn get(&self, index: usize) -> Trit {
        self.trits.get(index).copied().unwrap_or(Trit::Unknown)
    }

    /// Bounds-checked write. Rejects `Unknown` since it may never be stored.
    pub fn set(&mut self, index: usize, value: Trit) -> bool {
        if !value.is_valid() {
            return false;
        }
        match self.trits.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn as_slice(&self) -> &[Trit] {
        &self.trits
    }
}

/// Applies `op` element-wise across two equal-length arrays. Fails if the
/// lengths differ.
pub fn elementwise<F>(a: &TritArray, b: &TritArray, op: F) -> Result<TritArray, ArrayError>
where
    F: Fn(Trit, Trit) -> Trit,
{
    if a.len() != b.len() {
        return Err(ArrayError::LengthMismatch);
    }
    let mut out = TritArray::new(a.len());
    for i in 0..a.len() {
        out.set(i, op(a.get(i), b.get(i)));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_case]
    fn new_array_is_all_neutral() {
        let arr = TritArray::new(5);
        assert_eq!(arr.len(), 5);
        for i in 0..5 {
            assert_eq!(arr.get(i), Trit::Neu);
        }
    }

    #[test_case]
    fn equality_requires_same_length_and_elements() {
        let a = TritArray::from_trits(&[Trit::Pos, Trit::Neg]);
        let b = TritArray::from_trits(&[Trit::Pos, Trit::Neg]);
        let c = TritArray::from_trits(&[Trit::Pos]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test_case]
    fn out_of_bounds_read_returns_unknown() {
        let arr = TritArray::new(2);
        assert_eq!(arr.get(5), Trit::Unknown);
    }

    #[test_case]
    fn elementwise_rejects_length_mismatch() {
        let a = TritArray::new(2);
        let b = TritArray::new(3);
        assert_eq!(elementwise(&a, &b, |x, _| x), Err(ArrayError::LengthMismatch));
    }

    #[test_case]
    fn elementwise_applies_op_per_index() {
        let a = TritArray::from_trits(&[Trit::Pos, Trit::Neg]);
        let b = TritArray::from_trits(&[Trit::Neg, Trit::Neg]);
        let result = elementwise(&a, &b, |x, y| if x == y { Trit::Pos } else { Trit::Neu }).unwrap();
        assert_eq!(result.get(0), Trit::Neu);
        assert_eq!(result.get(1), Trit::Pos);
    }
}
