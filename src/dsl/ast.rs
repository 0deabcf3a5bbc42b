//! Abstract Syntax Tree types for the slab description language.

/// Complete AST representation of a parsed slab description.
#[derive(Debug, Clone, Default)]
pub struct SlabAst {
    /// Directives in source order
    pub directives: Vec<Directive>,
}

impl SlabAst {
    /// Create a new empty AST.
    pub fn new() -> Self {
        Self::default()
    }

    /// All directives of one kind, in source order.
    pub fn of_kind(&self, kind: DirectiveKind) -> impl Iterator<Item = &Directive> {
        self.directives.iter().filter(move |d| d.kind == kind)
    }
}

/// One directive line.
#[derive(Debug, Clone)]
pub struct Directive {
    /// Which directive
    pub kind: DirectiveKind,
    /// Positional arguments
    pub args: Vec<Value>,
    /// `name=value` parameters, names lowercased, in source order
    pub params: Vec<(String, Value)>,
    /// Source line number for error reporting
    pub line: usize,
}

impl Directive {
    /// Look up a named parameter.
    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

/// Directive types supported by the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Slab extents and resolution
    Grid,
    /// Thermal properties
    Material,
    /// Uniform initial temperature
    Initial,
    /// Per-edge boundary condition
    Boundary,
    /// Single-cell boundary override
    Pin,
    /// Time step, end time and tolerance
    Time,
    /// Integration scheme
    Scheme,
    /// Moving nozzle
    Source,
    /// Temperature probe
    Probe,
}

impl DirectiveKind {
    /// Parse a directive from its DSL name, including the leading '.'.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            ".grid" => Some(Self::Grid),
            ".material" => Some(Self::Material),
            ".initial" => Some(Self::Initial),
            ".bc" | ".boundary" => Some(Self::Boundary),
            ".pin" => Some(Self::Pin),
            ".time" => Some(Self::Time),
            ".scheme" => Some(Self::Scheme),
            ".source" | ".nozzle" => Some(Self::Source),
            ".probe" => Some(Self::Probe),
            _ => None,
        }
    }

    /// Canonical name, for error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grid => ".grid",
            Self::Material => ".material",
            Self::Initial => ".initial",
            Self::Boundary => ".bc",
            Self::Pin => ".pin",
            Self::Time => ".time",
            Self::Scheme => ".scheme",
            Self::Source => ".source",
            Self::Probe => ".probe",
        }
    }
}

/// An argument or parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Number with unit suffix already applied
    Number(f64),
    /// Bare word
    Word(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Word(_) => None,
        }
    }

    pub fn as_word(&self) -> Option<&str> {
        match self {
            Value::Word(w) => Some(w),
            Value::Number(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{}", v),
            Value::Word(w) => write!(f, "{}", w),
        }
    }
}
