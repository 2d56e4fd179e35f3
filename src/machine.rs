use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Zero;
use std::collections::BTreeMap;

/// Accumulator register plus sparse byte memory.
///
/// The accumulator is unbounded (a `load` keeps the literal as written, and
/// `sgn` can leave -1 in it). Bytes are only produced at the memory boundary.
#[derive(Debug, Clone, Default)]
pub struct Machine {
    accumulator: BigInt,
    memory: BTreeMap<BigUint, u8>,
}

impl Machine {
    pub fn new() -> Self {
        Machine::default()
    }

    pub fn accumulator(&self) -> &BigInt {
        &self.accumulator
    }

    pub fn set_accumulator(&mut self, value: impl Into<BigInt>) {
        self.accumulator = value.into();
    }

    /// Unwritten cells read as zero.
    pub fn read(&self, addr: &BigUint) -> u8 {
        self.memory.get(addr).copied().unwrap_or(0)
    }

    pub fn write(&mut self, addr: &BigUint, value: &BigInt) {
        let byte = truncate(value);
        self.memory.insert(addr.clone(), byte);
    }

    /// Written cells in address order.
    pub fn written(&self) -> impl Iterator<Item = (&BigUint, u8)> {
        self.memory.iter().map(|(addr, byte)| (addr, *byte))
    }

    pub fn reset(&mut self) {
        self.accumulator = BigInt::zero();
        self.memory.clear();
    }
}

/// Reduce a value into [0, 255]. Negative values wrap, so -1 becomes 255.
pub fn truncate(value: &BigInt) -> u8 {
    let low = value.magnitude().iter_u32_digits().next().unwrap_or(0) as u8;
    match value.sign() {
        Sign::Minus => low.wrapping_neg(),
        _ => low,
    }
}

/// Signed-byte reinterpretation: b if b < 128 else b - 256.
pub fn as_signed(byte: u8) -> i8 {
    byte as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_initial_state() {
        let m = Machine::new();
        assert!(m.accumulator().is_zero());
        assert_eq!(m.read(&addr(0)), 0);
        assert_eq!(m.read(&addr(0x1000)), 0);
        assert_eq!(m.written().count(), 0);
    }

    #[test]
    fn test_write_truncates() {
        let mut m = Machine::new();
        m.write(&addr(10), &BigInt::from(246));
        m.write(&addr(11), &BigInt::from(0x1000));
        m.write(&addr(12), &BigInt::from(257));
        m.write(&addr(13), &BigInt::from(-1));
        m.write(&addr(14), &BigInt::from(-256));
        assert_eq!(m.read(&addr(10)), 246);
        assert_eq!(m.read(&addr(11)), 0);
        assert_eq!(m.read(&addr(12)), 1);
        assert_eq!(m.read(&addr(13)), 255);
        assert_eq!(m.read(&addr(14)), 0);
    }

    #[test]
    fn test_sparse_addresses() {
        let mut m = Machine::new();
        let far = BigUint::from(1u8) << 100;
        m.write(&far, &BigInt::from(7));
        m.write(&addr(3), &BigInt::from(9));
        assert_eq!(m.read(&far), 7);
        let cells: Vec<_> = m.written().map(|(a, b)| (a.clone(), b)).collect();
        assert_eq!(cells, vec![(addr(3), 9), (far, 7)]);
    }

    #[test]
    fn test_truncate_large() {
        let big = (BigInt::from(1) << 200) + 42;
        assert_eq!(truncate(&big), 42);
        assert_eq!(truncate(&-big), 214);
    }

    #[test]
    fn test_as_signed() {
        assert_eq!(as_signed(0), 0);
        assert_eq!(as_signed(127), 127);
        assert_eq!(as_signed(128), -128);
        assert_eq!(as_signed(246), -10);
        assert_eq!(as_signed(255), -1);
    }

    #[test]
    fn test_reset() {
        let mut m = Machine::new();
        m.set_accumulator(5);
        m.write(&addr(1), &BigInt::from(5));
        m.reset();
        assert!(m.accumulator().is_zero());
        assert_eq!(m.read(&addr(1)), 0);
    }
}
