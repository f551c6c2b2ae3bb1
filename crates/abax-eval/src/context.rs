//! Per-calculator context: numeric precision settings, output modes and
//! the variable table.

use crate::registry::Binding;
use abax_num::NumCtx;
use rustc_hash::FxHashMap;

pub struct Ctx {
    pub num: NumCtx,
    pub vars: FxHashMap<String, Binding>,
    /// Print integers and binary floats in hexadecimal.
    pub hex_output: bool,
    /// JS mode: `[]` is an array literal, `^` is xor.
    pub js_mode: bool,
    /// Put each matrix row on its own line when printing.
    pub tensor_output_lf: bool,
}

impl Ctx {
    pub fn new() -> Ctx {
        let mut ctx = Ctx {
            num: NumCtx::new(),
            vars: FxHashMap::default(),
            hex_output: false,
            js_mode: false,
            tensor_output_lf: true,
        };
        crate::builtins::register_all(&mut ctx);
        ctx
    }

    /// Binary working precision for decimal transcendentals.
    pub fn dec_bits(&self) -> usize {
        self.num.dec_work_bits()
    }
}

impl Default for Ctx {
    fn default() -> Self {
        Self::new()
    }
}
