//! Program assembly: global declarations, function bodies, top-level code.
//!
//! A [`ProgramBuilder`] owns the shared instruction array while a program is
//! being put together. Function bodies are appended as they are compiled;
//! the top-level code is compiled last by [`ProgramBuilder::build`], so it
//! runs from `Program::entry` to the end of the array.

use std::rc::Rc;

use log::debug;
use noast_common::{
    Builtin, FunctionDescriptor, GlobalTable, Instruction, LocalTable, Program, TypeTag, Value,
};

use crate::error::{CompileError, LexError};
use crate::lexer::Tokenizer;
use crate::parser::Parser;
use crate::token::Token;

/// Name, parameters, and declared locals of a function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    name: String,
    params: Vec<(String, TypeTag)>,
    locals: Vec<(String, TypeTag)>,
    return_type: Option<TypeTag>,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            locals: Vec::new(),
            return_type: None,
        }
    }

    /// Append a parameter. Parameters take local slots in order.
    pub fn param(mut self, name: impl Into<String>, ty: TypeTag) -> Self {
        self.params.push((name.into(), ty));
        self
    }

    /// Append an extra local, placed after all parameters.
    pub fn local(mut self, name: impl Into<String>, ty: TypeTag) -> Self {
        self.locals.push((name.into(), ty));
        self
    }

    pub fn returns(mut self, ty: TypeTag) -> Self {
        self.return_type = Some(ty);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn local_table(&self) -> Result<LocalTable, CompileError> {
        let mut table = LocalTable::new();
        for (name, ty) in self.params.iter().chain(&self.locals) {
            table
                .declare(name, *ty)
                .map_err(|_| CompileError::DuplicateParameter {
                    function: self.name.clone(),
                    name: name.clone(),
                })?;
        }
        Ok(table)
    }
}

/// Collects globals and compiled functions, then compiles the top-level
/// code into a [`Program`].
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    instructions: Vec<Instruction>,
    globals: GlobalTable,
    memory: Vec<Value>,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder with every builtin in `builtins` already declared.
    pub fn with_builtins(
        builtins: impl IntoIterator<Item = Builtin>,
    ) -> Result<Self, CompileError> {
        let mut builder = Self::new();
        for b in builtins {
            builder.builtin(b)?;
        }
        Ok(builder)
    }

    /// Declare a global variable. It starts as `0` or `""`.
    pub fn global(&mut self, name: &str, ty: TypeTag) -> Result<usize, CompileError> {
        self.declare(name, ty, Value::default_for(ty))
    }

    /// Declare a global holding a native callback.
    pub fn builtin(&mut self, builtin: Builtin) -> Result<usize, CompileError> {
        self.declare(builtin.name, TypeTag::Builtin, Value::Builtin(builtin))
    }

    /// Claim a global slot for a function whose body is compiled later.
    pub fn reserve_function(&mut self, name: &str) -> Result<usize, CompileError> {
        self.declare(name, TypeTag::Function, Value::default_for(TypeTag::Function))
    }

    fn declare(&mut self, name: &str, ty: TypeTag, initial: Value) -> Result<usize, CompileError> {
        let slot = self
            .globals
            .declare(name, ty)
            .map_err(|_| CompileError::DuplicateGlobal {
                name: name.to_string(),
            })?;
        self.memory.push(initial);
        Ok(slot)
    }

    /// Global slot the function `name` may be stored in, if it is free.
    ///
    /// `Ok(None)` means the name is undeclared. A slot reserved with
    /// [`reserve_function`](Self::reserve_function) is free until a body is
    /// stored in it.
    fn function_slot(&self, name: &str) -> Result<Option<usize>, CompileError> {
        let Some(info) = self.globals.get(name) else {
            return Ok(None);
        };
        let defined = matches!(self.memory.get(info.slot), Some(Value::Function(_)));
        if info.ty != TypeTag::Function || defined {
            return Err(CompileError::DuplicateGlobal {
                name: name.to_string(),
            });
        }
        Ok(Some(info.slot))
    }

    /// Compile a function body from source text.
    pub fn function(
        &mut self,
        signature: FunctionSignature,
        body: &str,
    ) -> Result<Rc<FunctionDescriptor>, CompileError> {
        self.function_from_tokens(signature, Tokenizer::new(body))
    }

    /// Compile a function body from a token sequence.
    ///
    /// The body is appended to the instruction array followed by an implicit
    /// `Return`. On error the array is left as it was.
    pub fn function_from_tokens<I>(
        &mut self,
        signature: FunctionSignature,
        tokens: I,
    ) -> Result<Rc<FunctionDescriptor>, CompileError>
    where
        I: Iterator<Item = Result<Token, LexError>>,
    {
        let existing = self.function_slot(&signature.name)?;
        let mut locals = signature.local_table()?;

        let entry = self.instructions.len();
        let compiled =
            Parser::new(tokens, &mut self.instructions, Some(&mut locals)).compile_block();
        if let Err(e) = compiled {
            self.instructions.truncate(entry);
            return Err(e);
        }
        self.instructions.push(Instruction::Return);

        let descriptor = Rc::new(FunctionDescriptor {
            name: signature.name,
            params: signature.params.iter().map(|(_, ty)| *ty).collect(),
            return_type: signature.return_type,
            entry,
            locals,
        });
        debug!(
            "compiled function '{}' at {:04}..{:04} ({} locals)",
            descriptor.name,
            entry,
            self.instructions.len(),
            descriptor.locals.len()
        );

        let value = Value::Function(Rc::clone(&descriptor));
        match existing {
            Some(slot) => self.memory[slot] = value,
            None => {
                self.declare(&descriptor.name, TypeTag::Function, value)?;
            }
        }
        Ok(descriptor)
    }

    /// Compile the top-level code and finish the program.
    pub fn build(self, main: &str) -> Result<Program, CompileError> {
        self.build_from_tokens(Tokenizer::new(main))
    }

    /// Compile the top-level code from a token sequence and finish the
    /// program.
    pub fn build_from_tokens<I>(mut self, tokens: I) -> Result<Program, CompileError>
    where
        I: Iterator<Item = Result<Token, LexError>>,
    {
        let entry = self.instructions.len();
        Parser::new(tokens, &mut self.instructions, None).compile_block()?;
        debug!(
            "compiled top-level code at {:04}..{:04}",
            entry,
            self.instructions.len()
        );
        Ok(Program {
            instructions: self.instructions,
            globals: self.globals,
            memory: self.memory,
            entry,
        })
    }

    /// Compile a whole script: `var` and `func` declarations followed by
    /// top-level code.
    pub fn script(self, source: &str) -> Result<Program, CompileError> {
        crate::script::compile_with(self, source)
    }
}
