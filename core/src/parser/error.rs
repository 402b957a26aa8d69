use crate::diagnostics::{Diagnostic, Severity};
use crate::parser::{Location, Rule, Span};

/// Parser error with its position in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub source: String,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Unexpected token
    UnexpectedToken { expected: String, found: String },
    /// Invalid number literal
    InvalidNumber { text: String },
    /// Variable used before any assignment to it
    UnboundVariable { name: String },
    /// Sink assigned by more than one statement
    DuplicateSink { name: String },
    /// Maximum nesting depth exceeded
    MaxDepthExceeded { depth: usize, max_depth: usize },
    /// Other parse errors (catch-all for Pest errors we don't specifically handle)
    Other { message: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, source: &str, span: Span) -> Self {
        Self {
            kind,
            source: source.to_string(),
            span,
        }
    }

    pub fn location(&self) -> Location {
        Location::of(&self.source, self.span.0.start)
    }

    /// Convert to a Diagnostic for rendering alongside evaluation diagnostics.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (message, code, help) = match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => (
                format!("Expected {}, found {}", expected, found),
                "P001",
                vec![],
            ),
            ParseErrorKind::InvalidNumber { text } => (
                format!("Invalid number literal '{}'", text),
                "P002",
                vec!["Number literals must be finite, like `42` or `2.5`".to_string()],
            ),
            ParseErrorKind::UnboundVariable { name } => (
                format!("Variable '{}' is used before it is assigned", name),
                "P003",
                vec![format!(
                    "Assign it first with `{} = ...`, or write `this.{}` for a source",
                    name, name
                )],
            ),
            ParseErrorKind::DuplicateSink { name } => (
                format!("Sink '{}' is assigned more than once", name),
                "P005",
                vec!["Each sink must be assigned exactly once".to_string()],
            ),
            ParseErrorKind::MaxDepthExceeded { max_depth, .. } => (
                format!(
                    "Expression nesting depth exceeds maximum of {} levels",
                    max_depth
                ),
                "P004",
                vec!["Reduce nesting or simplify the expression".to_string()],
            ),
            ParseErrorKind::Other { message } => (message.clone(), "P999", vec![]),
        };

        Diagnostic {
            severity: Severity::Error,
            message,
            span: self.span.clone(),
            location: self.location(),
            help,
            code,
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let diagnostic = self.to_diagnostic();
        write!(
            f,
            "{}: {} [{}]",
            diagnostic.severity, diagnostic, diagnostic.code
        )?;

        for help_msg in &diagnostic.help {
            write!(f, "\nhelp: {}", help_msg)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Messages pest uses when it runs out of recursion budget.
const PEST_LIMIT_MESSAGES: &[&str] = &["stack limit reached", "call limit reached"];

/// Convert Pest error to human-readable ParseError
///
/// Pest gives up on input nested too deeply for the native stack before the
/// tree builder can count levels; that is reported as `MaxDepthExceeded`.
pub fn convert_pest_error(
    err: pest::error::Error<Rule>,
    source: &str,
    max_depth: usize,
) -> ParseError {
    use pest::error::ErrorVariant;

    let span = match err.location {
        pest::error::InputLocation::Pos(pos) => Span(pos..pos),
        pest::error::InputLocation::Span((start, end)) => Span(start..end),
    };

    let kind = match err.variant {
        ErrorVariant::ParsingError {
            positives,
            negatives,
        } => ParseErrorKind::UnexpectedToken {
            expected: format_expected_rules(&positives),
            found: format_found(&negatives, source, span.0.start),
        },
        ErrorVariant::CustomError { message } if PEST_LIMIT_MESSAGES.contains(&message.as_str()) => {
            ParseErrorKind::MaxDepthExceeded {
                depth: max_depth + 1,
                max_depth,
            }
        }
        ErrorVariant::CustomError { message } => ParseErrorKind::Other { message },
    };

    ParseError::new(kind, source, span)
}

/// Format expected rules in a human-readable way
fn format_expected_rules(rules: &[Rule]) -> String {
    let mut concepts = Vec::new();

    for rule in rules {
        let concept = match rule {
            Rule::variable_assignment | Rule::sink_assignment => "statement",
            Rule::number | Rule::boolean => "literal",
            Rule::ident | Rule::variable_ref => "identifier",
            Rule::source_ref | Rule::kw_this => "source reference",
            Rule::add
            | Rule::sub
            | Rule::mul
            | Rule::div
            | Rule::lt
            | Rule::le
            | Rule::gt
            | Rule::ge
            | Rule::eq
            | Rule::ne => "operator",
            Rule::kw_when | Rule::when_clause => "`when`",
            Rule::kw_otherwise | Rule::otherwise_clause => "`otherwise`",
            Rule::EOI => "end of input",
            _ => "expression",
        };
        if !concepts.contains(&concept) {
            concepts.push(concept);
        }
    }

    match concepts.split_last() {
        None => "something else".to_string(),
        Some((only, [])) => only.to_string(),
        Some((last, rest)) => format!("{} or {}", rest.join(", "), last),
    }
}

/// Describe what was found at the error position.
fn format_found(rules: &[Rule], source: &str, pos: usize) -> String {
    if let Some(rule) = rules.first() {
        return match rule {
            Rule::keyword => "keyword".to_string(),
            Rule::EOI => "end of input".to_string(),
            other => format!("{:?}", other),
        };
    }

    let rest = source.get(pos..).unwrap_or("");
    let token: String = rest
        .chars()
        .take_while(|c| !c.is_whitespace())
        .take(16)
        .collect();
    if token.is_empty() {
        "end of input".to_string()
    } else {
        format!("'{}'", token)
    }
}
