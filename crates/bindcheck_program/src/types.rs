//! Type table for the analyzed program.
//!
//! Types live in an arena ([`TypeTable`]) and are referred to by [`TypeId`].
//! Named types are nominal and may refer to themselves through their
//! underlying type; every other kind is structural and compared field by
//! field.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::decl::DeclId;

/// Recursion bound for structural walks over unnamed types.
///
/// Unnamed types cannot be cyclic in a well-formed program, but snapshots come
/// from outside and may not be well-formed.
const MAX_STRUCTURAL_DEPTH: usize = 64;

/// Identifier of a type in a [`TypeTable`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    /// Returns the raw index of this type.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Predeclared scalar types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BasicKind {
    /// `bool`
    Bool,
    /// `int`
    Int,
    /// `int8`
    Int8,
    /// `int16`
    Int16,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `uint`
    Uint,
    /// `uint8`
    Uint8,
    /// `uint16`
    Uint16,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
    /// `uintptr`
    Uintptr,
    /// `float32`
    Float32,
    /// `float64`
    Float64,
    /// `complex64`
    Complex64,
    /// `complex128`
    Complex128,
    /// `string`
    String,
    /// `unsafe.Pointer`
    UnsafePointer,
    /// The type of the untyped `nil` literal.
    UntypedNil,
}

impl BasicKind {
    /// All basic kinds, in the order they are preallocated in a [`TypeTable`].
    pub const ALL: [BasicKind; 19] = [
        Self::Bool,
        Self::Int,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Uintptr,
        Self::Float32,
        Self::Float64,
        Self::Complex64,
        Self::Complex128,
        Self::String,
        Self::UnsafePointer,
        Self::UntypedNil,
    ];

    /// Returns the source spelling of this type.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::String => "string",
            Self::UnsafePointer => "unsafe.Pointer",
            Self::UntypedNil => "untyped nil",
        }
    }

    const fn slot(self) -> u32 {
        self as u32
    }
}

/// A struct field.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Field {
    /// Field name (the type name for embedded fields).
    pub name: String,
    /// Field type.
    pub ty: TypeId,
    /// Raw tag text, e.g. `json:"name,omitempty"`.
    pub tag: Option<String>,
    /// Whether the field is embedded.
    pub embedded: bool,
}

impl Field {
    /// Creates a plain field without a tag.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            tag: None,
            embedded: false,
        }
    }

    /// Sets the raw tag text.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Returns true if the field is visible outside its module.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }

    /// Returns the value stored under `key` in the field's tag.
    #[must_use]
    pub fn tag_value(&self, key: &str) -> Option<String> {
        self.tag.as_deref().and_then(|tag| lookup_tag(tag, key))
    }
}

/// A method attached to a named type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Whether the receiver is a pointer.
    pub pointer_receiver: bool,
    /// The method's declaration, when it is part of the program.
    pub decl: Option<DeclId>,
}

/// A named (defined) type.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NamedType {
    /// Path of the module defining the type; empty for predeclared names.
    pub module: String,
    /// Type name.
    pub name: String,
    /// Underlying type, once known.
    pub underlying: Option<TypeId>,
    /// Declared methods.
    pub methods: Vec<Method>,
}

/// A function signature.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Signature {
    /// Parameter types, in order. For variadic signatures the last one is a slice.
    pub params: Vec<TypeId>,
    /// Result types, in order.
    pub results: Vec<TypeId>,
    /// Whether the last parameter is variadic.
    pub variadic: bool,
}

/// The kinds of types the analysis understands.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeKind {
    /// A predeclared scalar.
    Basic(BasicKind),
    /// A named type.
    Named(NamedType),
    /// `*T`
    Pointer(TypeId),
    /// `[]T`
    Slice(TypeId),
    /// `[N]T`
    Array {
        /// Element type.
        elem: TypeId,
        /// Array length.
        len: u64,
    },
    /// `map[K]V`
    Map {
        /// Key type.
        key: TypeId,
        /// Value type.
        value: TypeId,
    },
    /// `struct{...}`
    Struct(Vec<Field>),
    /// `interface{...}`, described by its method names.
    Interface(Vec<String>),
    /// `func(...) ...`
    Signature(Signature),
    /// `chan T`
    Chan(TypeId),
}

/// Structural classification of a type, used to decide transportability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeShape<'a> {
    /// A scalar value.
    Basic(BasicKind),
    /// Pointer to the given type.
    Pointer(TypeId),
    /// Slice of the given type.
    Sequence(TypeId),
    /// Fixed-size array of the given type.
    Array(TypeId, u64),
    /// Map from key to value type.
    Mapping(TypeId, TypeId),
    /// Struct with the given fields.
    Struct(&'a [Field]),
    /// Interface: concrete shape unknown at analysis time.
    Interface,
    /// The type encodes itself.
    CustomCodec,
    /// The loader did not describe the type.
    Unknown,
    /// Anything the boundary cannot carry, described by kind.
    Unsupported(&'static str),
}

/// Arena of all types in a program.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeTable {
    kinds: Vec<TypeKind>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeTable {
    /// Creates a table holding only the predeclared basic types.
    #[must_use]
    pub fn new() -> Self {
        Self {
            kinds: BasicKind::ALL.iter().map(|b| TypeKind::Basic(*b)).collect(),
        }
    }

    /// Returns the number of types in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Returns true if the table holds no types at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Returns the predeclared type for a basic kind.
    #[must_use]
    pub const fn basic(&self, kind: BasicKind) -> TypeId {
        TypeId(kind.slot())
    }

    /// Adds a type and returns its id.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add(&mut self, kind: TypeKind) -> TypeId {
        let id = TypeId(self.kinds.len() as u32);
        self.kinds.push(kind);
        id
    }

    /// Adds `*elem`.
    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.add(TypeKind::Pointer(elem))
    }

    /// Adds `[]elem`.
    pub fn slice(&mut self, elem: TypeId) -> TypeId {
        self.add(TypeKind::Slice(elem))
    }

    /// Adds `[len]elem`.
    pub fn array(&mut self, elem: TypeId, len: u64) -> TypeId {
        self.add(TypeKind::Array { elem, len })
    }

    /// Adds `map[key]value`.
    pub fn map(&mut self, key: TypeId, value: TypeId) -> TypeId {
        self.add(TypeKind::Map { key, value })
    }

    /// Adds `chan elem`.
    pub fn chan(&mut self, elem: TypeId) -> TypeId {
        self.add(TypeKind::Chan(elem))
    }

    /// Adds an unnamed struct type.
    pub fn structure(&mut self, fields: Vec<Field>) -> TypeId {
        self.add(TypeKind::Struct(fields))
    }

    /// Adds an unnamed interface type with the given method names.
    pub fn interface(&mut self, methods: &[&str]) -> TypeId {
        self.add(TypeKind::Interface(
            methods.iter().map(|m| (*m).to_string()).collect(),
        ))
    }

    /// Adds a signature type.
    pub fn signature(&mut self, signature: Signature) -> TypeId {
        self.add(TypeKind::Signature(signature))
    }

    /// Declares a named type whose underlying type is set later.
    pub fn named(&mut self, module: impl Into<String>, name: impl Into<String>) -> TypeId {
        self.add(TypeKind::Named(NamedType {
            module: module.into(),
            name: name.into(),
            underlying: None,
            methods: Vec::new(),
        }))
    }

    /// Declares a named type with a known underlying type.
    pub fn named_with(
        &mut self,
        module: impl Into<String>,
        name: impl Into<String>,
        underlying: TypeId,
    ) -> TypeId {
        let id = self.named(module, name);
        self.set_underlying(id, underlying);
        id
    }

    /// Sets the underlying type of a named type. Returns false if `named` is not named.
    pub fn set_underlying(&mut self, named: TypeId, underlying: TypeId) -> bool {
        match self.kinds.get_mut(named.0 as usize) {
            Some(TypeKind::Named(n)) => {
                n.underlying = Some(underlying);
                true
            }
            _ => false,
        }
    }

    /// Attaches a method to a named type. Returns false if `named` is not named.
    pub fn add_method(&mut self, named: TypeId, method: Method) -> bool {
        match self.kinds.get_mut(named.0 as usize) {
            Some(TypeKind::Named(n)) => {
                n.methods.push(method);
                true
            }
            _ => false,
        }
    }

    /// Looks up a type.
    #[must_use]
    pub fn get(&self, id: TypeId) -> Option<&TypeKind> {
        self.kinds.get(id.0 as usize)
    }

    /// Iterates over all types with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &TypeKind)> {
        (0u32..).zip(&self.kinds).map(|(i, kind)| (TypeId(i), kind))
    }

    /// Returns the first type equal to `kind`, if the table already holds one.
    #[must_use]
    pub fn find(&self, kind: &TypeKind) -> Option<TypeId> {
        self.iter().find(|(_, k)| *k == kind).map(|(id, _)| id)
    }

    /// Returns the named type behind `id`, if it is one.
    #[must_use]
    pub fn as_named(&self, id: TypeId) -> Option<&NamedType> {
        match self.get(id)? {
            TypeKind::Named(n) => Some(n),
            _ => None,
        }
    }

    /// Follows named types down to their underlying type.
    #[must_use]
    pub fn underlying(&self, id: TypeId) -> Option<TypeId> {
        let mut current = id;
        for _ in 0..=self.kinds.len() {
            match self.get(current)? {
                TypeKind::Named(n) => current = n.underlying?,
                _ => return Some(current),
            }
        }
        None
    }

    /// Returns the kind of the underlying type.
    #[must_use]
    pub fn underlying_kind(&self, id: TypeId) -> Option<&TypeKind> {
        self.underlying(id).and_then(|u| self.get(u))
    }

    /// Returns the pointee if `id` is a pointer type (not through names).
    #[must_use]
    pub fn pointee(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id)? {
            TypeKind::Pointer(elem) => Some(*elem),
            _ => None,
        }
    }

    /// Returns `id` itself, or its pointee when `id` is a pointer.
    #[must_use]
    pub fn deref(&self, id: TypeId) -> TypeId {
        self.pointee(id).unwrap_or(id)
    }

    /// Returns the element type of a slice.
    #[must_use]
    pub fn slice_elem(&self, id: TypeId) -> Option<TypeId> {
        match self.underlying_kind(id)? {
            TypeKind::Slice(elem) => Some(*elem),
            _ => None,
        }
    }

    /// Returns `module.Name` for named types.
    #[must_use]
    pub fn qualified_name(&self, id: TypeId) -> Option<String> {
        self.as_named(id).map(|n| {
            if n.module.is_empty() {
                n.name.clone()
            } else {
                format!("{}.{}", n.module, n.name)
            }
        })
    }

    /// Returns true if `id` is the named type `qualified`, or a pointer to it.
    #[must_use]
    pub fn is_named_or_pointer_to(&self, id: TypeId, qualified: &str) -> bool {
        self.qualified_name(self.deref(id))
            .is_some_and(|name| name == qualified)
    }

    /// Returns the methods declared on a named type, or on the named pointee of a pointer.
    #[must_use]
    pub fn methods(&self, id: TypeId) -> &[Method] {
        self.as_named(self.deref(id))
            .map_or(&[], |n| n.methods.as_slice())
    }

    /// Returns true if the underlying type is a struct.
    #[must_use]
    pub fn is_struct(&self, id: TypeId) -> bool {
        matches!(self.underlying_kind(id), Some(TypeKind::Struct(_)))
    }

    /// Returns true if the type is a struct or a pointer to one.
    #[must_use]
    pub fn is_struct_or_pointer_to_struct(&self, id: TypeId) -> bool {
        if self.is_struct(id) {
            return true;
        }
        match self.underlying_kind(id) {
            Some(TypeKind::Pointer(elem)) => self.is_struct(*elem),
            _ => false,
        }
    }

    /// Returns true if `id` is the type of the untyped `nil` literal.
    #[must_use]
    pub fn is_untyped_nil(&self, id: TypeId) -> bool {
        matches!(self.get(id), Some(TypeKind::Basic(BasicKind::UntypedNil)))
    }

    /// Looks up a struct field by name on a struct, named struct, or pointer to either.
    #[must_use]
    pub fn field(&self, id: TypeId, name: &str) -> Option<&Field> {
        let target = match self.underlying_kind(id)? {
            TypeKind::Pointer(elem) => *elem,
            _ => id,
        };
        match self.underlying_kind(target)? {
            TypeKind::Struct(fields) => fields.iter().find(|f| f.name == name),
            _ => None,
        }
    }

    /// Reports whether two types are identical.
    ///
    /// Named types are identical only to themselves; all other kinds are
    /// compared structurally.
    #[must_use]
    pub fn identical(&self, a: TypeId, b: TypeId) -> bool {
        self.identical_at(a, b, 0)
    }

    fn identical_at(&self, a: TypeId, b: TypeId, depth: usize) -> bool {
        if a == b {
            return true;
        }
        if depth > MAX_STRUCTURAL_DEPTH {
            return false;
        }
        let (Some(ka), Some(kb)) = (self.get(a), self.get(b)) else {
            return false;
        };
        let next = depth + 1;
        match (ka, kb) {
            (TypeKind::Basic(x), TypeKind::Basic(y)) => x == y,
            (TypeKind::Pointer(x), TypeKind::Pointer(y))
            | (TypeKind::Slice(x), TypeKind::Slice(y))
            | (TypeKind::Chan(x), TypeKind::Chan(y)) => self.identical_at(*x, *y, next),
            (
                TypeKind::Array { elem: x, len: lx },
                TypeKind::Array { elem: y, len: ly },
            ) => lx == ly && self.identical_at(*x, *y, next),
            (
                TypeKind::Map { key: kx, value: vx },
                TypeKind::Map { key: ky, value: vy },
            ) => self.identical_at(*kx, *ky, next) && self.identical_at(*vx, *vy, next),
            (TypeKind::Struct(fx), TypeKind::Struct(fy)) => {
                fx.len() == fy.len()
                    && fx.iter().zip(fy).all(|(x, y)| {
                        x.name == y.name
                            && x.embedded == y.embedded
                            && x.tag == y.tag
                            && self.identical_at(x.ty, y.ty, next)
                    })
            }
            (TypeKind::Interface(mx), TypeKind::Interface(my)) => {
                let mut mx = mx.clone();
                let mut my = my.clone();
                mx.sort();
                my.sort();
                mx == my
            }
            (TypeKind::Signature(sx), TypeKind::Signature(sy)) => {
                sx.variadic == sy.variadic
                    && self.all_identical(&sx.params, &sy.params, next)
                    && self.all_identical(&sx.results, &sy.results, next)
            }
            _ => false,
        }
    }

    fn all_identical(&self, xs: &[TypeId], ys: &[TypeId], depth: usize) -> bool {
        xs.len() == ys.len()
            && xs
                .iter()
                .zip(ys)
                .all(|(x, y)| self.identical_at(*x, *y, depth))
    }

    /// Classifies a type for the transportability check.
    ///
    /// `is_codec_method` decides which method names mark a named type as
    /// encoding itself.
    #[must_use]
    pub fn shape(&self, id: TypeId, is_codec_method: impl Fn(&str) -> bool) -> TypeShape<'_> {
        let Some(kind) = self.get(id) else {
            return TypeShape::Unknown;
        };
        if let TypeKind::Named(named) = kind {
            if named.methods.iter().any(|m| is_codec_method(&m.name)) {
                return TypeShape::CustomCodec;
            }
        }
        match self.underlying_kind(id) {
            None | Some(TypeKind::Named(_)) => TypeShape::Unknown,
            Some(TypeKind::Basic(b)) => TypeShape::Basic(*b),
            Some(TypeKind::Pointer(elem)) => TypeShape::Pointer(*elem),
            Some(TypeKind::Slice(elem)) => TypeShape::Sequence(*elem),
            Some(TypeKind::Array { elem, len }) => TypeShape::Array(*elem, *len),
            Some(TypeKind::Map { key, value }) => TypeShape::Mapping(*key, *value),
            Some(TypeKind::Struct(fields)) => TypeShape::Struct(fields),
            Some(TypeKind::Interface(_)) => TypeShape::Interface,
            Some(TypeKind::Signature(_)) => TypeShape::Unsupported("function"),
            Some(TypeKind::Chan(_)) => TypeShape::Unsupported("channel"),
        }
    }

    /// Returns a displayable rendering of a type in source syntax.
    #[must_use]
    pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay { table: self, id }
    }

    fn write_type(&self, f: &mut fmt::Formatter<'_>, id: TypeId, depth: usize) -> fmt::Result {
        if depth > MAX_STRUCTURAL_DEPTH {
            return f.write_str("...");
        }
        let Some(kind) = self.get(id) else {
            return f.write_str("invalid type");
        };
        let next = depth + 1;
        match kind {
            TypeKind::Basic(b) => f.write_str(b.name()),
            TypeKind::Named(n) => {
                if n.module.is_empty() {
                    f.write_str(&n.name)
                } else {
                    write!(f, "{}.{}", n.module, n.name)
                }
            }
            TypeKind::Pointer(elem) => {
                f.write_str("*")?;
                self.write_type(f, *elem, next)
            }
            TypeKind::Slice(elem) => {
                f.write_str("[]")?;
                self.write_type(f, *elem, next)
            }
            TypeKind::Array { elem, len } => {
                write!(f, "[{len}]")?;
                self.write_type(f, *elem, next)
            }
            TypeKind::Map { key, value } => {
                f.write_str("map[")?;
                self.write_type(f, *key, next)?;
                f.write_str("]")?;
                self.write_type(f, *value, next)
            }
            TypeKind::Chan(elem) => {
                f.write_str("chan ")?;
                self.write_type(f, *elem, next)
            }
            TypeKind::Struct(fields) => {
                f.write_str("struct{")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if !field.embedded {
                        write!(f, "{} ", field.name)?;
                    }
                    self.write_type(f, field.ty, next)?;
                    if let Some(tag) = &field.tag {
                        write!(f, " {tag:?}")?;
                    }
                }
                f.write_str("}")
            }
            TypeKind::Interface(methods) => {
                f.write_str("interface{")?;
                for (i, m) in methods.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{m}()")?;
                }
                f.write_str("}")
            }
            TypeKind::Signature(sig) => self.write_signature(f, sig, next),
        }
    }

    fn write_signature(
        &self,
        f: &mut fmt::Formatter<'_>,
        sig: &Signature,
        depth: usize,
    ) -> fmt::Result {
        f.write_str("func(")?;
        for (i, param) in sig.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            let last = i + 1 == sig.params.len();
            match (sig.variadic && last, self.slice_elem(*param)) {
                (true, Some(elem)) => {
                    f.write_str("...")?;
                    self.write_type(f, elem, depth)?;
                }
                _ => self.write_type(f, *param, depth)?,
            }
        }
        f.write_str(")")?;
        match sig.results.as_slice() {
            [] => Ok(()),
            [single] => {
                f.write_str(" ")?;
                self.write_type(f, *single, depth)
            }
            many => {
                f.write_str(" (")?;
                for (i, r) in many.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    self.write_type(f, *r, depth)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Display adapter returned by [`TypeTable::display`].
pub struct TypeDisplay<'a> {
    table: &'a TypeTable,
    id: TypeId,
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.table.write_type(f, self.id, 0)
    }
}

/// Returns true if a name is visible outside its module (starts upper-case).
#[must_use]
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Looks up `key` in a conventional tag string such as `json:"id,omitempty" db:"id"`.
///
/// Malformed tags yield `None` from the point where they stop parsing.
#[must_use]
pub fn lookup_tag(tag: &str, key: &str) -> Option<String> {
    let mut rest = tag;
    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }
        let name_end = rest.find(|c: char| c <= ' ' || c == ':' || c == '"')?;
        let name = &rest[..name_end];
        let after = rest[name_end..].strip_prefix(":\"")?;
        let (value, consumed) = read_quoted(after)?;
        if name == key {
            return Some(value);
        }
        rest = &after[consumed..];
    }
}

/// Reads a double-quoted value whose opening quote was already consumed.
/// Returns the unescaped value and the number of bytes consumed including the closing quote.
fn read_quoted(input: &str) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut chars = input.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((value, i + 1)),
            '\\' => {
                let (_, escaped) = chars.next()?;
                value.push(escaped);
            }
            other => value.push(other),
        }
    }
    None
}
