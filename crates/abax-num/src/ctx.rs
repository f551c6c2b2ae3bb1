//! Shared numeric context: current precisions and the transcendental
//! constants cache.

use astro_float::Consts;
use std::cell::{RefCell, RefMut};

/// Default decimal precision in significant digits.
pub const DEFAULT_DEC_PREC: u32 = 16;
/// Default binary precision in mantissa bits (IEEE binary64).
pub const DEFAULT_FLOAT_PREC: usize = 53;
/// Default exponent field width in bits.
pub const DEFAULT_EXP_BITS: u32 = 11;

/// Largest accepted precision settings (guards the REPL directives).
pub const MAX_DEC_PREC: u32 = 1_000_000;
pub const MAX_FLOAT_PREC: usize = 4_000_000;

/// Numeric context shared by all floating operations.
///
/// The backend's constants cache (pi, e, ln(2), …) is kept behind a
/// `RefCell` so that reads of context-dependent constants stay cheap
/// after the first computation at a given precision.
pub struct NumCtx {
    pub dec_prec: u32,
    pub dec_exp_bits: u32,
    pub float_prec: usize,
    pub float_exp_bits: u32,
    cc: RefCell<Consts>,
}

impl NumCtx {
    pub fn new() -> Self {
        NumCtx {
            dec_prec: DEFAULT_DEC_PREC,
            dec_exp_bits: DEFAULT_EXP_BITS,
            float_prec: DEFAULT_FLOAT_PREC,
            float_exp_bits: DEFAULT_EXP_BITS,
            cc: RefCell::new(Consts::new().expect("constants cache")),
        }
    }

    /// Mutable access to the constants cache for transcendental calls.
    pub fn cc(&self) -> RefMut<'_, Consts> {
        self.cc.borrow_mut()
    }

    /// Binary precision used when a decimal operation is routed through
    /// the binary backend: `ceil(p * log2(10)) + 16` bits.
    pub fn dec_work_bits(&self) -> usize {
        let p = self.dec_prec as f64;
        (p * std::f64::consts::LOG2_10).ceil() as usize + 16
    }
}

impl Default for NumCtx {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dec_work_bits_default() {
        let ctx = NumCtx::new();
        // 16 digits need 54 bits, plus the 16 guard bits.
        assert_eq!(ctx.dec_work_bits(), 70);
    }
}
