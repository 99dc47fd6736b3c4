use {
    core::{
        data::set::SymbolSet,
        diag::{Category, Diagnostic, ErrorSink},
    },
    std::collections::HashMap,
};

pub mod class;

/// Index of the end-of-input terminal, registered at table construction.
pub const EOF_SYM: usize = 0;
/// Index of the error sentinel returned by failed lookups. It appears in
/// no production and its sets stay empty.
pub const NO_SYM: usize = 1;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum SymbolKind {
    Terminal,
    Nonterminal,
    Pragma,
}

pub struct Symbol {
    pub id: usize,
    pub kind: SymbolKind,
    pub name: String,
    pub line: usize,
    /// Head of the production subgraph, for nonterminals.
    pub graph: Option<usize>,
    pub deletable: bool,
    pub reached: bool,
    pub first: SymbolSet,
    pub follow: SymbolSet,
    /// Nonterminals whose Follow set this symbol's Follow must absorb.
    /// Written by the follow pass, consumed by its completion step.
    pub nts: SymbolSet,
}

impl Symbol {
    fn new(id: usize, kind: SymbolKind, name: String, line: usize) -> Symbol {
        Symbol {
            id,
            kind,
            name,
            line,
            graph: None,
            deletable: false,
            reached: false,
            first: SymbolSet::new(0),
            follow: SymbolSet::new(0),
            nts: SymbolSet::new(0),
        }
    }
}

/// Registry of terminals, nonterminals, and pragmas. Indices are dense,
/// global across kinds, and stable once allocated: index = bit position
/// in every analysis set.
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_name: HashMap<String, usize>,
    start: Option<usize>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        let mut table = SymbolTable {
            symbols: Vec::new(),
            by_name: HashMap::new(),
            start: None,
        };
        table.insert(SymbolKind::Terminal, "EOF".to_string(), 0);
        table.insert(SymbolKind::Terminal, "???".to_string(), 0);
        table
    }

    fn insert(&mut self, kind: SymbolKind, name: String, line: usize) -> usize {
        let id = self.symbols.len();
        self.symbols.push(Symbol::new(id, kind, name.clone(), line));
        self.by_name.entry(name).or_insert(id);
        id
    }

    /// Registers a symbol, allocating the next unused index. A terminal or
    /// nonterminal clashing with an existing non-pragma name is reported
    /// and the existing symbol is returned, so construction can continue.
    pub fn register(
        &mut self,
        kind: SymbolKind,
        name: &str,
        line: usize,
        sink: &mut dyn ErrorSink,
    ) -> usize {
        if kind != SymbolKind::Pragma {
            if let Some(&existing) = self.by_name.get(name) {
                if self.symbols[existing].kind != SymbolKind::Pragma {
                    sink.report(Diagnostic::error(
                        Category::DuplicateSymbol,
                        line,
                        format!("symbol '{}' is declared twice", name),
                    ));
                    return existing;
                }
            }
        }
        self.insert(kind, name.to_string(), line)
    }

    /// Name lookup; absent names resolve to the error sentinel so callers
    /// can continue analysis without failure paths.
    pub fn lookup(&self, name: &str) -> usize {
        match self.by_name.get(name) {
            Some(&id) => id,
            None => NO_SYM,
        }
    }

    pub fn get(&self, id: usize) -> &Symbol {
        &self.symbols[id]
    }

    pub fn get_mut(&mut self, id: usize) -> &mut Symbol {
        &mut self.symbols[id]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Symbols of one kind, in declaration order.
    pub fn symbols_of(&self, kind: SymbolKind) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(move |sym| sym.kind == kind)
    }

    pub fn ids_of(&self, kind: SymbolKind) -> Vec<usize> {
        self.symbols_of(kind).map(|sym| sym.id).collect()
    }

    pub fn set_start(&mut self, id: usize) {
        self.start = Some(id);
    }

    pub fn start(&self) -> Option<usize> {
        self.start
    }

    /// All terminal indices except the error sentinel, as a set over the
    /// full symbol universe. Seed for Any-set computation.
    pub fn terminal_universe(&self) -> SymbolSet {
        let mut universe = SymbolSet::new(self.len());
        for sym in self.symbols_of(SymbolKind::Terminal) {
            if sym.id != NO_SYM {
                universe.add(sym.id);
            }
        }
        universe
    }

    /// Sizes every per-symbol set to the final universe. Called once when
    /// analysis begins; symbol registration must be over by then.
    pub fn init_sets(&mut self) {
        let len = self.symbols.len();
        for sym in self.symbols.iter_mut() {
            sym.first = SymbolSet::new(len);
            sym.follow = SymbolSet::new(len);
            sym.nts = SymbolSet::new(len);
            sym.deletable = false;
            sym.reached = false;
        }
    }
}
