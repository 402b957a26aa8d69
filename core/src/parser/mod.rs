mod parsed_program;
pub mod parser;
mod syntax;
pub mod error;

// Re-export the parser and rule enum for external use
pub use parser::ProgramParser;
pub use parser::Rule;
pub use parser::DEFAULT_MAX_DEPTH;
pub use parser::parse;
pub use parser::parse_with_max_depth;

pub use parsed_program::{Expr, Literal, ParsedProgram, Statement, WhenClause};
pub use syntax::AnnotatedSource;
pub use syntax::{BinaryOp, ComparisonOp, Location, Span};
pub use error::{ParseError, ParseErrorKind};

#[cfg(test)]
mod parse_test;
