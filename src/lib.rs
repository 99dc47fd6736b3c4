#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate stopwatch;

use {
    core::xref,
    std::{error, fmt, io},
};

mod core;

pub use core::{
    analysis::{expected, expected0, first, AnalysisSets, SetComputation},
    check::GrammarChecker,
    data::set::SymbolSet,
    diag::{Category, Diagnostic, DiagnosticLog, ErrorSink, Severity},
    graph::{Graph, Node, NodeId, NodeKind, SyntaxGraph},
    sym::{
        class::{CharClass, CharClassRegistry, CharSet},
        Symbol, SymbolKind, SymbolTable, EOF_SYM, NO_SYM,
    },
    trace::{PassTimings, TraceOptions},
};

/// A grammar under construction: the symbol table, the syntax graph its
/// productions are built in, and the scanner-level character classes.
pub struct Grammar {
    pub symbols: SymbolTable,
    pub graph: SyntaxGraph,
    pub classes: CharClassRegistry,
}

impl Grammar {
    pub fn new() -> Grammar {
        Grammar {
            symbols: SymbolTable::new(),
            graph: SyntaxGraph::new(),
            classes: CharClassRegistry::new(),
        }
    }
}

/// Results of a full analysis run over a grammar.
pub struct Analysis {
    /// True when no check produced an error-severity diagnostic.
    pub grammar_ok: bool,
    /// Union of every Sync set, seeded with EOF.
    pub all_sync: SymbolSet,
    pub timings: PassTimings,
}

/// Conditions under which analysis cannot even start. Everything else is
/// reported through the sink and analysis runs to completion.
#[derive(Debug)]
pub enum AnalysisError {
    NoStartSymbol,
    NoProductions,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AnalysisError::NoStartSymbol => write!(f, "no start symbol designated"),
            AnalysisError::NoProductions => write!(f, "grammar contains no productions"),
        }
    }
}

impl error::Error for AnalysisError {
    fn cause(&self) -> Option<&error::Error> {
        None
    }
}

/// Runs the set-computation engine and the full validation suite over a
/// completely constructed grammar. Diagnostics go to `sink`; the verdict
/// and the computed artifacts come back in `Analysis`.
pub fn analyze(
    grammar: &mut Grammar,
    trace: &TraceOptions,
    sink: &mut dyn ErrorSink,
) -> Result<Analysis, AnalysisError> {
    if grammar.symbols.start().is_none() {
        return Err(AnalysisError::NoStartSymbol);
    }
    let has_production = grammar
        .symbols
        .symbols_of(SymbolKind::Nonterminal)
        .any(|sym| sym.graph.is_some());
    if !has_production {
        return Err(AnalysisError::NoProductions);
    }

    let sets =
        SetComputation::new(&mut grammar.symbols, &mut grammar.graph, trace).compute(sink);
    let grammar_ok = GrammarChecker::new(&mut grammar.symbols, &grammar.graph).check_all(sink);
    info!("grammar analysis finished (ok: {})", grammar_ok);

    Ok(Analysis {
        grammar_ok,
        all_sync: sets.all_sync,
        timings: sets.timings,
    })
}

/// Writes the listings selected by the trace options, in a fixed order.
pub fn write_listings(
    grammar: &Grammar,
    analysis: &Analysis,
    trace: &TraceOptions,
    out: &mut dyn io::Write,
) -> io::Result<()> {
    if trace.symbols {
        xref::print_symbol_table(out, &grammar.symbols)?;
    }
    if trace.graph {
        xref::print_nodes(out, &grammar.graph, &grammar.symbols, &grammar.classes)?;
        xref::print_char_classes(out, &grammar.classes)?;
    }
    if trace.sets {
        xref::print_sets(out, &grammar.symbols)?;
    }
    if trace.xref {
        xref::print_xref(out, &grammar.graph, &grammar.symbols)?;
    }
    if trace.stats {
        xref::print_statistics(
            out,
            &grammar.symbols,
            &grammar.graph,
            &grammar.classes,
            &analysis.timings,
        )?;
    }
    Ok(())
}
