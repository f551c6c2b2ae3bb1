//! Named bindings: built-in functions, constants and user variables.

use crate::context::Ctx;
use crate::value::{Callable, Function, Value};
use abax_common::{CalcError, CalcResult};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    /// Getter bindings hold a zero-argument function that produces the
    /// value on each access (`PI` at the current decimal precision).
    pub is_getter: bool,
    /// Set when the user (re)bound the name.
    pub is_user: bool,
}

impl Ctx {
    pub fn set_variable(&mut self, name: &str, value: Value, is_getter: bool, is_user: bool) {
        let entry = self.vars.entry(name.to_string()).or_insert(Binding {
            value: Value::Null,
            is_getter: false,
            is_user: false,
        });
        entry.value = value;
        entry.is_getter = is_getter;
        entry.is_user |= is_user;
    }

    /// Resolve a name, invoking getter bindings.
    pub fn get_variable(&self, name: &str) -> CalcResult<Value> {
        let Some(binding) = self.vars.get(name) else {
            return Err(CalcError::reference(format!(
                "variable '{name}' is not defined"
            )));
        };
        if binding.is_getter {
            crate::interpreter::call_function(self, binding.value.clone(), Vec::new())
        } else {
            Ok(binding.value.clone())
        }
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub(crate) fn def_func(&mut self, name: &str, arity: usize, call: Callable) {
        self.def_func2(name, arity, false, call);
    }

    pub(crate) fn def_func2(&mut self, name: &str, arity: usize, var_args: bool, call: Callable) {
        let f = Value::Func(Rc::new(Function {
            name: name.to_string(),
            arity,
            var_args,
            call,
        }));
        self.set_variable(name, f, false, false);
    }

    pub(crate) fn def_getter(&mut self, name: &str, call: Callable) {
        let f = Value::Func(Rc::new(Function {
            name: name.to_string(),
            arity: 0,
            var_args: false,
            call,
        }));
        self.set_variable(name, f, true, false);
    }
}
