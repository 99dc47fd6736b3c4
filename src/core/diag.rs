use std::fmt;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Severity {
    Error,
    Warning,
}

/// Closed taxonomy of grammar findings. Rendering is left to consumers;
/// the category is the contract surface.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Category {
    MalformedGraph,
    DuplicateSymbol,
    CircularProduction,
    MissingProduction,
    UnreachableNonterminal,
    NonTerminatingNonterminal,
    Ll1AlternativeOverlap,
    Ll1IterationOverlap,
    Ll1UnmatchableAny,
    Ll1DeletableStructure,
    ResolverNeverEvaluated,
    ResolverNoConflict,
    ResolverIllegalPosition,
    DeletableNonterminal,
    UnknownTraceOption,
}

#[derive(PartialEq, Eq, Clone, Debug)]
pub struct Diagnostic {
    pub severity: Severity,
    pub category: Category,
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn error(category: Category, line: usize, message: String) -> Diagnostic {
        Diagnostic {
            severity: Severity::Error,
            category,
            line,
            message,
        }
    }

    pub fn warning(category: Category, line: usize, message: String) -> Diagnostic {
        Diagnostic {
            severity: Severity::Warning,
            category,
            line,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{} (line {}): {}", prefix, self.line, self.message)
    }
}

/// External error-collection collaborator. The analysis core only ever
/// appends findings; it never inspects what a sink did with them.
pub trait ErrorSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Default accumulating sink, preserving report order.
pub struct DiagnosticLog {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new() -> DiagnosticLog {
        DiagnosticLog {
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    pub fn of_category(&self, category: Category) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.category == category)
            .collect()
    }
}

impl ErrorSink for DiagnosticLog {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_preserves_order() {
        //setup
        let mut log = DiagnosticLog::new();

        //exercise
        log.report(Diagnostic::error(
            Category::CircularProduction,
            4,
            "A --> B".to_string(),
        ));
        log.report(Diagnostic::warning(
            Category::UnreachableNonterminal,
            7,
            "C cannot be reached".to_string(),
        ));

        //verify
        assert_eq!(log.diagnostics().len(), 2);
        assert_eq!(log.error_count(), 1);
        assert_eq!(log.warning_count(), 1);
        assert_eq!(log.diagnostics()[0].category, Category::CircularProduction);
        assert_eq!(
            log.diagnostics()[1].category,
            Category::UnreachableNonterminal
        );
    }

    #[test]
    fn display_format() {
        //setup
        let diagnostic = Diagnostic::error(
            Category::MissingProduction,
            12,
            "expr has no production".to_string(),
        );

        //exercise/verify
        assert_eq!(
            format!("{}", diagnostic),
            "error (line 12): expr has no production"
        );
    }

    #[test]
    fn filter_by_category() {
        //setup
        let mut log = DiagnosticLog::new();
        log.report(Diagnostic::warning(
            Category::DeletableNonterminal,
            1,
            "A deletable".to_string(),
        ));
        log.report(Diagnostic::warning(
            Category::DeletableNonterminal,
            2,
            "B deletable".to_string(),
        ));
        log.report(Diagnostic::error(
            Category::MissingProduction,
            3,
            "C has no production".to_string(),
        ));

        //exercise
        let deletable = log.of_category(Category::DeletableNonterminal);

        //verify
        assert_eq!(deletable.len(), 2);
    }
}
