//! The environment: a name table of variable bindings and a function table
//! of procedure definitions.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::StmtList;
use crate::value::Value;

/// Maps variable names to their current value. Insertion order is
/// irrelevant, so a plain hash map suffices.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    bindings: HashMap<String, Value>,
}

impl NameTable {
    pub fn new() -> Self {
        NameTable::default()
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).copied()
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.bindings.insert(name.into(), value);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.bindings.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A user-defined procedure: an ordered parameter list and a body. No
/// captured environment — every call gets a fresh scope.
#[derive(Debug, Clone)]
pub struct Procedure {
    pub params: Vec<String>,
    pub body: Rc<StmtList>,
}

impl Procedure {
    pub fn new(params: Vec<String>, body: StmtList) -> Self {
        Procedure {
            params,
            body: Rc::new(body),
        }
    }
}

/// Maps procedure names to their definitions. Lives for the whole program;
/// redefinition replaces the previous entry.
#[derive(Debug, Clone, Default)]
pub struct FuncTable {
    procedures: HashMap<String, Procedure>,
}

impl FuncTable {
    pub fn new() -> Self {
        FuncTable::default()
    }

    pub fn get(&self, name: &str) -> Option<&Procedure> {
        self.procedures.get(name)
    }

    pub fn define(&mut self, name: impl Into<String>, proc: Procedure) {
        self.procedures.insert(name.into(), proc);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Procedure)> {
        self.procedures.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The reserved identifier a procedure body assigns to produce its return
/// value.
pub const RETURN_SYMBOL: &str = "return";
