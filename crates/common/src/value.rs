//! Runtime value representation for the noast VM.
//!
//! Values are what live on the operand stack and in global memory. Each
//! one carries its [`TypeTag`] explicitly through its variant.

use std::io::Write;
use std::rc::Rc;

use crate::error::NativeError;
use crate::registry::LocalTable;
use crate::type_tag::TypeTag;

/// What a native callback asks the VM to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep executing.
    Continue,
    /// Stop the whole run immediately.
    Halt,
}

/// Signature of a native callback.
///
/// Receives its arguments in call order and the VM's output sink. Natives
/// return nothing to the program; they act through side effects.
pub type NativeFn = fn(&[Value], &mut dyn Write) -> Result<Flow, NativeError>;

/// A named native callback.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: NativeFn,
}

impl Builtin {
    pub fn new(name: &'static str, func: NativeFn) -> Self {
        Self { name, func }
    }

    /// Invoke the callback.
    pub fn call(&self, args: &[Value], out: &mut dyn Write) -> Result<Flow, NativeError> {
        (self.func)(args, out)
    }
}

impl std::fmt::Debug for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

// Builtins are identified by name; the callback pointer is not compared.
impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Builtin {}

/// A compiled user function.
///
/// Created once when the function body is compiled and never changed
/// afterwards. Stored as [`Value::Function`] in the global slot that
/// matches its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDescriptor {
    pub name: String,
    /// Declared parameter types, in order. Parameters occupy local slots
    /// `0..params.len()`.
    pub params: Vec<TypeTag>,
    /// `None` means the function returns nothing.
    pub return_type: Option<TypeTag>,
    /// Index of the first instruction of the body.
    pub entry: usize,
    /// Parameters followed by declared locals.
    pub locals: LocalTable,
}

impl FunctionDescriptor {
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Initial values for the locals declared after the parameters, in
    /// slot order.
    pub fn extra_local_defaults(&self) -> Vec<Value> {
        self.locals
            .iter()
            .skip(self.params.len())
            .map(|info| Value::default_for(info.ty))
            .collect()
    }
}

/// Runtime value representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// Immutable string.
    Str(String),
    /// Native callback.
    Builtin(Builtin),
    /// Compiled user function.
    Function(Rc<FunctionDescriptor>),
}

impl Value {
    /// Returns the type tag for this value.
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Int,
            Value::Str(_) => TypeTag::Str,
            Value::Builtin(_) => TypeTag::Builtin,
            Value::Function(_) => TypeTag::Function,
        }
    }

    /// The value a freshly declared variable of type `ty` starts with.
    ///
    /// Callable tags have no natural zero, so they start as `Int(0)` and
    /// must be assigned before use.
    pub fn default_for(ty: TypeTag) -> Value {
        match ty {
            TypeTag::Str => Value::Str(String::new()),
            TypeTag::Int | TypeTag::Builtin | TypeTag::Function => Value::Int(0),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl std::fmt::Display for Value {
    /// Format a value the way the print builtins show it.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::Builtin(b) => write!(f, "<builtin {}>", b.name),
            Value::Function(func) => write!(f, "<function {}>", func.name),
        }
    }
}
