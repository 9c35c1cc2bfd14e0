//! Name tables for globals and function locals.
//!
//! Globals and locals are disjoint namespaces. A global slot indexes the
//! program's global memory array; a local slot is an offset from the
//! active call frame's base on the operand stack.

use std::collections::HashMap;

use crate::error::DeclareError;
use crate::type_tag::TypeTag;

/// A declared variable: its name, declared type, and slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableInfo {
    pub name: String,
    pub ty: TypeTag,
    pub slot: usize,
}

/// Slot-ordered table of variables with lookup by name.
///
/// Slots are handed out densely in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SlotTable {
    vars: Vec<VariableInfo>,
    by_name: HashMap<String, usize>,
}

impl SlotTable {
    fn declare(&mut self, name: &str, ty: TypeTag) -> Result<usize, DeclareError> {
        if self.by_name.contains_key(name) {
            return Err(DeclareError::Duplicate {
                name: name.to_string(),
            });
        }
        let slot = self.vars.len();
        self.vars.push(VariableInfo {
            name: name.to_string(),
            ty,
            slot,
        });
        self.by_name.insert(name.to_string(), slot);
        Ok(slot)
    }

    fn get(&self, name: &str) -> Option<&VariableInfo> {
        self.by_name.get(name).map(|&slot| &self.vars[slot])
    }
}

/// Global bindings: name → slot in global memory plus declared type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalTable {
    table: SlotTable,
}

impl GlobalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new global in the next free slot.
    pub fn declare(&mut self, name: &str, ty: TypeTag) -> Result<usize, DeclareError> {
        self.table.declare(name, ty)
    }

    pub fn get(&self, name: &str) -> Option<&VariableInfo> {
        self.table.get(name)
    }

    pub fn slot(&self, name: &str) -> Option<usize> {
        self.get(name).map(|info| info.slot)
    }

    /// Iterate in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &VariableInfo> {
        self.table.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.table.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.vars.is_empty()
    }
}

/// The closed local table of one function: parameters first, then
/// additional locals in first-declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalTable {
    table: SlotTable,
}

impl LocalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a new local in the next free slot.
    pub fn declare(&mut self, name: &str, ty: TypeTag) -> Result<usize, DeclareError> {
        self.table.declare(name, ty)
    }

    pub fn get(&self, name: &str) -> Option<&VariableInfo> {
        self.table.get(name)
    }

    /// Iterate in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &VariableInfo> {
        self.table.vars.iter()
    }

    pub fn len(&self) -> usize {
        self.table.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.vars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_dense_in_declaration_order() {
        let mut globals = GlobalTable::new();
        assert_eq!(globals.declare("x", TypeTag::Int), Ok(0));
        assert_eq!(globals.declare("y", TypeTag::Str), Ok(1));
        assert_eq!(globals.slot("y"), Some(1));
        assert_eq!(globals.get("x").unwrap().ty, TypeTag::Int);
        let names: Vec<_> = globals.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }

    #[test]
    fn duplicate_declaration_rejected() {
        let mut locals = LocalTable::new();
        locals.declare("n", TypeTag::Int).unwrap();
        assert_eq!(
            locals.declare("n", TypeTag::Str),
            Err(DeclareError::Duplicate {
                name: "n".to_string()
            })
        );
        assert_eq!(locals.len(), 1);
    }

    #[test]
    fn unknown_name() {
        let locals = LocalTable::new();
        assert!(locals.get("missing").is_none());
        assert!(locals.is_empty());
    }

    #[test]
    fn namespaces_are_disjoint() {
        let mut globals = GlobalTable::new();
        let mut locals = LocalTable::new();
        globals.declare("x", TypeTag::Int).unwrap();
        assert_eq!(locals.declare("x", TypeTag::Int), Ok(0));
        globals.declare("y", TypeTag::Int).unwrap();
        assert_eq!(globals.slot("x"), Some(0));
        assert_eq!(globals.slot("y"), Some(1));
    }
}
