//! Runtime type tags.
//!
//! Every value on the operand stack and in global memory carries exactly one
//! tag. Tags are checked at each operation that cares about them; they are
//! never inferred from the shape of the data.

/// The closed set of runtime type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    /// Signed 64-bit integer. Also used for truth values (0 is false).
    Int,
    /// Immutable string.
    Str,
    /// Native callback registered by the host.
    Builtin,
    /// Compiled user function.
    Function,
}

/// All type tags, in definition order.
pub const ALL_TYPE_TAGS: [TypeTag; 4] = [
    TypeTag::Int,
    TypeTag::Str,
    TypeTag::Builtin,
    TypeTag::Function,
];

impl TypeTag {
    /// Returns the source-level name for this tag.
    pub fn name(&self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Str => "string",
            TypeTag::Builtin => "builtin",
            TypeTag::Function => "function",
        }
    }

    /// Looks up a tag by its source-level name.
    pub fn from_name(name: &str) -> Option<TypeTag> {
        ALL_TYPE_TAGS.iter().find(|tt| tt.name() == name).copied()
    }

    /// Returns true for tags a script may declare a variable with.
    pub fn is_declarable(&self) -> bool {
        matches!(self, TypeTag::Int | TypeTag::Str)
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
