use {
    core::{
        data::set::SymbolSet,
        graph::{NodeKind, SyntaxGraph},
        sym::{class::CharClassRegistry, SymbolKind, SymbolTable, NO_SYM},
        trace::PassTimings,
    },
    std::{
        collections::BTreeMap,
        io::{self, Write},
    },
};

fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Terminal(_) => "t",
        NodeKind::WeakTerminal(_) => "wt",
        NodeKind::Nonterminal(_) => "nt",
        NodeKind::Pragma(_) => "pr",
        NodeKind::CharClass(_) => "clas",
        NodeKind::Any => "any",
        NodeKind::Sync => "sync",
        NodeKind::Alt => "alt",
        NodeKind::Iter => "iter",
        NodeKind::Opt => "opt",
        NodeKind::Sem => "sem",
        NodeKind::Resolver => "rslv",
        NodeKind::Eps => "eps",
        NodeKind::End => "end",
    }
}

fn symbol_kind_label(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Terminal => "terminal",
        SymbolKind::Nonterminal => "nonterminal",
        SymbolKind::Pragma => "pragma",
    }
}

fn referenced_symbol(kind: NodeKind) -> Option<usize> {
    match kind {
        NodeKind::Terminal(sym)
        | NodeKind::WeakTerminal(sym)
        | NodeKind::Nonterminal(sym)
        | NodeKind::Pragma(sym) => Some(sym),
        _ => None,
    }
}

fn edge(target: Option<usize>) -> String {
    match target {
        Some(id) => id.to_string(),
        None => "-".to_string(),
    }
}

fn set_names(table: &SymbolTable, set: &SymbolSet) -> String {
    let names: Vec<&str> = set.iter().map(|id| &table.get(id).name[..]).collect();
    format!("{{{}}}", names.join(" "))
}

pub fn print_symbol_table(out: &mut dyn Write, table: &SymbolTable) -> io::Result<()> {
    writeln!(out, "symbol table:")?;
    writeln!(
        out,
        "{:>4}  {:<16} {:<12} {:>4}  del",
        "id", "name", "kind", "line"
    )?;
    for sym in table.symbols() {
        writeln!(
            out,
            "{:>4}  {:<16} {:<12} {:>4}  {}",
            sym.id,
            sym.name,
            symbol_kind_label(sym.kind),
            sym.line,
            if sym.deletable { "+" } else { "-" }
        )?;
    }
    writeln!(out)
}

pub fn print_sets(out: &mut dyn Write, table: &SymbolTable) -> io::Result<()> {
    writeln!(out, "first / follow sets:")?;
    for sym in table.symbols_of(SymbolKind::Nonterminal) {
        writeln!(out, "{}", sym.name)?;
        writeln!(out, "  first:  {}", set_names(table, &sym.first))?;
        writeln!(out, "  follow: {}", set_names(table, &sym.follow))?;
    }
    writeln!(out)
}

pub fn print_nodes(
    out: &mut dyn Write,
    graph: &SyntaxGraph,
    table: &SymbolTable,
    classes: &CharClassRegistry,
) -> io::Result<()> {
    writeln!(out, "syntax graph:")?;
    writeln!(
        out,
        "{:>4}  {:<4} {:>4} {:>4} {:>4}  up {:>4}  ref",
        "id", "kind", "next", "down", "sub", "line"
    )?;
    for node in graph.nodes() {
        let detail = match node.kind {
            NodeKind::CharClass(class) => classes.get(class).name.clone(),
            NodeKind::Any | NodeKind::Sync => match node.set {
                Some(ref set) => set_names(table, set),
                None => String::new(),
            },
            _ => match referenced_symbol(node.kind) {
                Some(sym) => table.get(sym).name.clone(),
                None => String::new(),
            },
        };
        writeln!(
            out,
            "{:>4}  {:<4} {:>4} {:>4} {:>4}  {}  {:>4}  {}",
            node.id,
            kind_label(node.kind),
            edge(node.next),
            edge(node.down),
            edge(node.sub),
            if node.up { "+" } else { "-" },
            node.line,
            detail
        )?;
    }
    writeln!(out)
}

pub fn print_char_classes(out: &mut dyn Write, classes: &CharClassRegistry) -> io::Result<()> {
    writeln!(out, "character classes:")?;
    for class in classes.classes() {
        let chars: String = class.set.iter().collect();
        writeln!(out, "{:>4}  {:<16} [{}]", class.id, class.name, chars)?;
    }
    writeln!(out)
}

/// Cross reference of every symbol occurrence. The definition line of a
/// nonterminal is listed negated, distinguishing it from use sites.
pub fn print_xref(
    out: &mut dyn Write,
    graph: &SyntaxGraph,
    table: &SymbolTable,
) -> io::Result<()> {
    let mut occurrences: BTreeMap<&str, Vec<i64>> = BTreeMap::new();
    for sym in table.symbols() {
        if sym.id == NO_SYM {
            continue;
        }
        let lines = occurrences.entry(&sym.name).or_insert_with(Vec::new);
        if sym.kind == SymbolKind::Nonterminal && sym.graph.is_some() {
            lines.push(-(sym.line as i64));
        }
    }
    for node in graph.nodes() {
        if let Some(sym) = referenced_symbol(node.kind) {
            if sym != NO_SYM {
                occurrences
                    .entry(&table.get(sym).name)
                    .or_insert_with(Vec::new)
                    .push(node.line as i64);
            }
        }
    }

    writeln!(out, "cross reference:")?;
    for (name, lines) in occurrences.iter() {
        let rendered: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        writeln!(out, "{:<16} {}", name, rendered.join(" "))?;
    }
    writeln!(out)
}

pub fn print_statistics(
    out: &mut dyn Write,
    table: &SymbolTable,
    graph: &SyntaxGraph,
    classes: &CharClassRegistry,
    timings: &PassTimings,
) -> io::Result<()> {
    writeln!(out, "statistics:")?;
    writeln!(
        out,
        "{:>6} terminals",
        table.ids_of(SymbolKind::Terminal).len()
    )?;
    writeln!(
        out,
        "{:>6} nonterminals",
        table.ids_of(SymbolKind::Nonterminal).len()
    )?;
    writeln!(out, "{:>6} pragmas", table.ids_of(SymbolKind::Pragma).len())?;
    writeln!(out, "{:>6} nodes", graph.len())?;
    writeln!(out, "{:>6} character classes", classes.len())?;
    writeln!(
        out,
        "{:>6} deletability iterations",
        timings.deletability_iterations
    )?;
    writeln!(out, "{:>4}ms deletability", timings.deletability_ms)?;
    writeln!(out, "{:>4}ms first sets", timings.first_ms)?;
    writeln!(out, "{:>4}ms follow sets", timings.follow_ms)?;
    writeln!(out, "{:>4}ms any sets", timings.any_ms)?;
    writeln!(out, "{:>4}ms sync sets", timings.sync_ms)?;
    writeln!(out, "{:>4}ms total", timings.total_ms())?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use core::{diag::DiagnosticLog, graph::Graph};

    use super::*;

    struct Fixture {
        table: SymbolTable,
        graph: SyntaxGraph,
        classes: CharClassRegistry,
        log: DiagnosticLog,
    }

    // S = "x" .
    fn tiny_grammar() -> Fixture {
        let mut table = SymbolTable::new();
        let mut graph = SyntaxGraph::new();
        let mut log = DiagnosticLog::new();
        let x = table.register(SymbolKind::Terminal, "x", 2, &mut log);
        let s = table.register(SymbolKind::Nonterminal, "S", 3, &mut log);
        table.set_start(s);
        let body: Graph = graph.atom(NodeKind::Terminal(x), 3);
        let head = graph.finish(body);
        table.get_mut(s).graph = head;
        Fixture {
            table,
            graph,
            classes: CharClassRegistry::new(),
            log,
        }
    }

    fn render<F>(print: F) -> String
    where
        F: FnOnce(&mut dyn Write) -> io::Result<()>,
    {
        let mut buf: Vec<u8> = Vec::new();
        print(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn symbol_table_listing() {
        //setup
        let f = tiny_grammar();

        //exercise
        let text = render(|out| print_symbol_table(out, &f.table));

        //verify
        assert!(text.contains("EOF"));
        assert!(text.contains("S"));
        assert!(text.contains("nonterminal"));
        assert_eq!(f.log.error_count(), 0);
    }

    #[test]
    fn node_listing_names_references() {
        //setup
        let f = tiny_grammar();

        //exercise
        let text = render(|out| print_nodes(out, &f.graph, &f.table, &f.classes));

        //verify
        assert!(text.contains("end"));
        let terminal_row = text
            .lines()
            .find(|line| line.trim_start().starts_with('0'))
            .unwrap();
        assert!(terminal_row.contains("x"));
    }

    #[test]
    fn xref_negates_definition_lines() {
        //setup
        let f = tiny_grammar();

        //exercise
        let text = render(|out| print_xref(out, &f.graph, &f.table));

        //verify
        let s_row = text.lines().find(|line| line.starts_with("S")).unwrap();
        assert!(s_row.contains("-3"));
        let x_row = text.lines().find(|line| line.starts_with("x")).unwrap();
        assert!(x_row.contains("3"));
        assert!(!x_row.contains("-3"));
    }

    #[test]
    fn statistics_listing() {
        //setup
        let f = tiny_grammar();
        let timings = PassTimings::new();

        //exercise
        let text = render(|out| {
            print_statistics(out, &f.table, &f.graph, &f.classes, &timings)
        });

        //verify
        assert!(text.contains("nonterminals"));
        assert!(text.contains("nodes"));
        assert!(text.contains("total"));
    }
}
