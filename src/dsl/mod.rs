//! DSL (Domain Specific Language) parser for slab descriptions.
//!
//! A small line-oriented language describing one simulation: geometry,
//! material, boundary conditions, time stepping, an optional moving nozzle
//! and an optional probe. [`SlabConfig::from_ast`](crate::SlabConfig::from_ast)
//! turns the AST into a validated configuration.
//!
//! # Grammar Overview
//!
//! ```text
//! slab        = { line }
//! line        = comment | directive | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = '.' directive_name { argument | parameter }
//! parameter   = identifier '=' (value | identifier)
//! argument    = value | identifier
//!
//! value       = ['-'|'+'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+] [unit_suffix]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! identifier  = (letter | '_') { letter | digit | '_' }
//! ```
//!
//! Words are case-insensitive. Lengths are in meters, so `50m` is 50 mm.
//!
//! # Directives
//!
//! | Directive | Description | Syntax |
//! |-----------|-------------|--------|
//! | .grid | Extents and resolution (required) | `.grid nx=<n> nz=<n> lx=<m> lz=<m>` |
//! | .material | Thermal properties | `.material rho=<kg/m³> cp=<J/kgK> k=<W/mK>` or `.material pla` |
//! | .initial | Initial temperature | `.initial <°C>` |
//! | .bc | Edge condition | `.bc <edge> dirichlet <°C>` / `convective h=<W/m²K> ambient=<°C>` / `adiabatic` |
//! | .pin | Single edge cell | `.pin <edge> <index> <°C>` |
//! | .time | Time stepping (required) | `.time dt=<s>\|auto [max=<s>] end=<s> [tol=<°C>]` |
//! | .scheme | Integration | `.scheme implicit [sweeps=<n>]` or `.scheme explicit [unchecked]` |
//! | .source | Moving nozzle | `.source temp= radius= height= period= blend= window= path=triangle\|sawtooth` |
//! | .probe | Temperature probe | `.probe x=<m> z=<m> [every=<s>]` |
//!
//! Edges are `bottom` (or `bed`), `top`, `left` and `right`.
//!
//! # Example
//!
//! ```text
//! # Ten layers of PLA on a 60 °C bed
//! .grid nx=20 nz=10 lx=50m lz=5m
//! .material pla
//! .bc bottom dirichlet 60
//! .bc top convective h=50 ambient=20
//! .time dt=0.1 end=100 tol=16m
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a slab description string into an AST.
pub fn parse(input: &str) -> Result<SlabAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a slab description file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<SlabAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::SlabError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}
