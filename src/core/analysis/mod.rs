extern crate stopwatch;

use core::{
    data::set::SymbolSet,
    diag::{Category, Diagnostic, ErrorSink},
    graph::{NodeId, NodeKind, SyntaxGraph},
    sym::{SymbolKind, SymbolTable, EOF_SYM},
    trace::{PassTimings, TraceOptions},
};

use self::stopwatch::Stopwatch;

/// Results of the set-computation engine beyond what lands on symbols
/// and nodes directly.
pub struct AnalysisSets {
    /// Union of every Sync set in the grammar.
    pub all_sync: SymbolSet,
    pub timings: PassTimings,
}

/// Fixpoint engine computing deletability, First, Follow, Any, and Sync
/// sets over a fully constructed grammar. Sole mutator of derived sets
/// and flags; runs its passes in strict dependency order.
pub struct SetComputation<'a> {
    table: &'a mut SymbolTable,
    graph: &'a mut SyntaxGraph,
    trace: &'a TraceOptions,
}

impl<'a> SetComputation<'a> {
    pub fn new(
        table: &'a mut SymbolTable,
        graph: &'a mut SyntaxGraph,
        trace: &'a TraceOptions,
    ) -> SetComputation<'a> {
        SetComputation {
            table,
            graph,
            trace,
        }
    }

    /// Runs every pass in dependency order: deletability before First,
    /// Follow after First, Any/Sync last.
    pub fn compute(&mut self, sink: &mut dyn ErrorSink) -> AnalysisSets {
        let mut timings = PassTimings::new();

        self.table.init_sets();
        self.setup_anys();

        let sw = Stopwatch::start_new();
        timings.deletability_iterations = self.comp_deletable_symbols(sink);
        timings.deletability_ms = sw.elapsed_ms();

        let sw = Stopwatch::start_new();
        self.comp_first_sets();
        timings.first_ms = sw.elapsed_ms();

        let sw = Stopwatch::start_new();
        self.comp_follow_sets();
        timings.follow_ms = sw.elapsed_ms();

        let sw = Stopwatch::start_new();
        self.comp_any_sets();
        timings.any_ms = sw.elapsed_ms();

        let sw = Stopwatch::start_new();
        let all_sync = self.comp_sync_sets();
        timings.sync_ms = sw.elapsed_ms();

        debug!(
            "set computation finished in {}ms over {} symbols / {} nodes",
            timings.total_ms(),
            self.table.len(),
            self.graph.len()
        );

        AnalysisSets { all_sync, timings }
    }

    /// Seeds every Any node with the full terminal universe minus EOF;
    /// the Any pass then subtracts whatever the grammar structure proves
    /// is otherwise expected.
    fn setup_anys(&mut self) {
        let mut seed = self.table.terminal_universe();
        seed.remove(EOF_SYM);
        for id in 0..self.graph.len() {
            if self.graph.node(id).kind == NodeKind::Any {
                self.graph.node_mut(id).set = Some(seed.clone());
            }
        }
    }

    /// Deletability fixpoint over the nonterminal flags. A symbol still
    /// unresolved counts as non-deletable, so flags only ever flip from
    /// false to true and the loop is bounded by the nonterminal count.
    /// Returns the number of iterations until convergence.
    pub fn comp_deletable_symbols(&mut self, sink: &mut dyn ErrorSink) -> usize {
        let nts = self.table.ids_of(SymbolKind::Nonterminal);
        let mut iterations = 0;
        loop {
            iterations += 1;
            let mut changed = false;
            for &id in nts.iter() {
                let sym = self.table.get(id);
                if !sym.deletable {
                    if let Some(head) = sym.graph {
                        if self.graph.del_graph(self.table, Some(head)) {
                            self.table.get_mut(id).deletable = true;
                            changed = true;
                        }
                    }
                }
            }
            if self.trace.fixpoint {
                debug!("deletability iteration {} (changed: {})", iterations, changed);
            }
            if !changed {
                break;
            }
        }

        for &id in nts.iter() {
            let sym = self.table.get(id);
            if sym.deletable {
                sink.report(Diagnostic::warning(
                    Category::DeletableNonterminal,
                    sym.line,
                    format!("{} deletable", sym.name),
                ));
            }
        }
        iterations
    }

    /// First(symbol) for every nonterminal, in declaration order. Symbols
    /// not yet computed are entered recursively under the caller's mark,
    /// which also guards self- and mutually-recursive productions.
    pub fn comp_first_sets(&mut self) {
        let nts = self.table.ids_of(SymbolKind::Nonterminal);
        let mut ready = SymbolSet::new(self.table.len());
        for &id in nts.iter() {
            let fs = {
                let mut mark = SymbolSet::new(self.graph.len());
                first0(
                    self.graph,
                    self.table,
                    self.table.get(id).graph,
                    &mut mark,
                    Some(&ready),
                )
            };
            self.table.get_mut(id).first = fs;
            ready.add(id);
            if self.trace.fixpoint {
                debug!(
                    "first({}) = {}",
                    self.table.get(id).name,
                    self.table.get(id).first
                );
            }
        }
    }

    /// Follow sets: one marked traversal per production collects direct
    /// continuations plus the symbol-level dependency edges, then a
    /// completion pass folds dependent Follow sets transitively.
    pub fn comp_follow_sets(&mut self) {
        let nts = self.table.ids_of(SymbolKind::Nonterminal);

        if let Some(start) = self.table.start() {
            self.table.get_mut(start).follow.add(EOF_SYM);
        }

        // direct successors
        let mut visited = SymbolSet::new(self.graph.len());
        for &id in nts.iter() {
            let head = self.table.get(id).graph;
            self.comp_follow(head, id, &mut visited);
        }

        // indirect successors, transitively
        for &id in nts.iter() {
            let mut visited = SymbolSet::new(self.table.len());
            self.complete(id, &mut visited);
        }
    }

    fn comp_follow(&mut self, mut p: Option<NodeId>, cur: usize, visited: &mut SymbolSet) {
        while let Some(id) = p {
            if visited.contains(id) {
                break;
            }
            visited.add(id);
            let (kind, next, sub, down) = {
                let node = self.graph.node(id);
                (node.kind, node.next, node.sub, node.down)
            };
            match kind {
                NodeKind::Nonterminal(sym) => {
                    let fs = first(self.graph, self.table, next);
                    self.table.get_mut(sym).follow.or(&fs);
                    if self.graph.del_graph(self.table, next) {
                        self.table.get_mut(sym).nts.add(cur);
                    }
                }
                NodeKind::Opt | NodeKind::Iter => {
                    self.comp_follow(sub, cur, visited);
                }
                NodeKind::Alt => {
                    self.comp_follow(sub, cur, visited);
                    self.comp_follow(down, cur, visited);
                }
                _ => {}
            }
            p = next;
        }
    }

    fn complete(&mut self, sym: usize, visited: &mut SymbolSet) {
        if visited.contains(sym) {
            return;
        }
        visited.add(sym);
        let donors: Vec<usize> = self.table.get(sym).nts.iter().collect();
        for donor in donors {
            self.complete(donor, visited);
            let donor_follow = self.table.get(donor).follow.clone();
            self.table.get_mut(sym).follow.or(&donor_follow);
        }
    }

    /// Shrinks each Any set by everything the surrounding structure can
    /// already match: sibling alternatives, iteration/option exits, and
    /// continuations of deletable prefixes.
    pub fn comp_any_sets(&mut self) {
        let nts = self.table.ids_of(SymbolKind::Nonterminal);
        for &id in nts.iter() {
            let head = self.table.get(id).graph;
            self.find_any_sets(head);
        }
    }

    fn subtract_from_any(&mut self, any: NodeId, subtrahend: &SymbolSet) {
        if let Some(ref mut set) = self.graph.node_mut(any).set {
            set.subtract(subtrahend);
        }
    }

    fn find_any_sets(&mut self, mut p: Option<NodeId>) {
        while let Some(id) = p {
            let (kind, next, sub, up) = {
                let node = self.graph.node(id);
                (node.kind, node.next, node.sub, node.up)
            };
            match kind {
                NodeKind::Opt | NodeKind::Iter => {
                    self.find_any_sets(sub);
                    if let Some(any) = leading_any(self.graph, self.table, sub) {
                        let continuation = first(self.graph, self.table, next);
                        self.subtract_from_any(any, &continuation);
                    }
                }
                NodeKind::Alt => {
                    // earlier branches accumulate into s1 so that an Any in
                    // a later branch excludes everything already matchable
                    let mut s1 = SymbolSet::new(self.table.len());
                    let mut q = Some(id);
                    while let Some(branch) = q {
                        let (branch_sub, branch_down) = {
                            let node = self.graph.node(branch);
                            (node.sub, node.down)
                        };
                        self.find_any_sets(branch_sub);
                        match leading_any(self.graph, self.table, branch_sub) {
                            Some(any) => {
                                let mut rest = first(self.graph, self.table, branch_down);
                                rest.or(&s1);
                                self.subtract_from_any(any, &rest);
                            }
                            None => {
                                let fs = first(self.graph, self.table, branch_sub);
                                s1.or(&fs);
                            }
                        }
                        q = branch_down;
                    }
                }
                _ => {}
            }

            // a deletable node may be skipped, so an Any behind it must
            // exclude what the node itself could have matched
            if self.graph.del_node(self.table, id) {
                if let Some(any) = leading_any(self.graph, self.table, next) {
                    let q = match kind {
                        NodeKind::Nonterminal(sym) => self.table.get(sym).graph,
                        _ => sub,
                    };
                    let fs = first(self.graph, self.table, q);
                    self.subtract_from_any(any, &fs);
                }
            }

            if up {
                break;
            }
            p = next;
        }
    }

    /// Sync sets: every Sync placeholder receives the set expected at its
    /// continuation plus EOF. Returns the union of all Sync sets.
    pub fn comp_sync_sets(&mut self) -> SymbolSet {
        let mut all_sync = SymbolSet::new(self.table.len());
        all_sync.add(EOF_SYM);

        let nts = self.table.ids_of(SymbolKind::Nonterminal);
        let mut visited = SymbolSet::new(self.graph.len());
        for &id in nts.iter() {
            let head = self.table.get(id).graph;
            self.comp_sync(head, id, &mut visited, &mut all_sync);
        }
        all_sync
    }

    fn comp_sync(
        &mut self,
        mut p: Option<NodeId>,
        cur: usize,
        visited: &mut SymbolSet,
        all_sync: &mut SymbolSet,
    ) {
        while let Some(id) = p {
            if visited.contains(id) {
                break;
            }
            visited.add(id);
            let (kind, next, sub, down) = {
                let node = self.graph.node(id);
                (node.kind, node.next, node.sub, node.down)
            };
            match kind {
                NodeKind::Sync => {
                    let mut s = expected(self.graph, self.table, next, cur);
                    s.add(EOF_SYM);
                    all_sync.or(&s);
                    self.graph.node_mut(id).set = Some(s);
                }
                NodeKind::Alt => {
                    self.comp_sync(sub, cur, visited, all_sync);
                    self.comp_sync(down, cur, visited, all_sync);
                }
                NodeKind::Opt | NodeKind::Iter => {
                    self.comp_sync(sub, cur, visited, all_sync);
                }
                _ => {}
            }
            p = next;
        }
    }
}

//---------------------------------------------------------------------
//  Shared set queries, usable once the passes above have run
//---------------------------------------------------------------------

fn first0(
    graph: &SyntaxGraph,
    table: &SymbolTable,
    mut p: Option<NodeId>,
    mark: &mut SymbolSet,
    ready: Option<&SymbolSet>,
) -> SymbolSet {
    let mut fs = SymbolSet::new(table.len());
    while let Some(id) = p {
        if mark.contains(id) {
            break;
        }
        mark.add(id);
        let node = graph.node(id);
        match node.kind {
            NodeKind::Nonterminal(sym) => {
                let cached = match ready {
                    Some(ready) => ready.contains(sym),
                    None => true,
                };
                if cached {
                    fs.or(&table.get(sym).first);
                } else {
                    let sub_first = first0(graph, table, table.get(sym).graph, mark, ready);
                    fs.or(&sub_first);
                }
            }
            NodeKind::Terminal(sym) | NodeKind::WeakTerminal(sym) => {
                fs.add(sym);
            }
            NodeKind::Any => {
                if let Some(ref set) = node.set {
                    fs.or(set);
                }
            }
            NodeKind::Alt => {
                fs.or(&first0(graph, table, node.sub, mark, ready));
                fs.or(&first0(graph, table, node.down, mark, ready));
            }
            NodeKind::Iter | NodeKind::Opt => {
                fs.or(&first0(graph, table, node.sub, mark, ready));
            }
            _ => {}
        }
        // execution may skip a deletable node, so its successor's First
        // terminals can also begin a derivation here
        if !graph.del_node(table, id) {
            break;
        }
        p = node.next;
    }
    fs
}

/// First Any node reachable from `p` without consuming a symbol: directly,
/// inside an alternative/option/iteration head, or behind a deletable
/// node. Such a node competes with whatever the continuation expects.
fn leading_any(graph: &SyntaxGraph, table: &SymbolTable, p: Option<NodeId>) -> Option<NodeId> {
    let id = match p {
        Some(id) => id,
        None => return None,
    };
    let node = graph.node(id);
    let mut found = match node.kind {
        NodeKind::Any => Some(id),
        NodeKind::Alt => leading_any(graph, table, node.sub)
            .or_else(|| leading_any(graph, table, node.down)),
        NodeKind::Opt | NodeKind::Iter => leading_any(graph, table, node.sub),
        _ => None,
    };
    if found.is_none() && graph.del_node(table, id) && !node.up {
        found = leading_any(graph, table, node.next);
    }
    found
}

/// First set of the graph starting at `p`, using the computed per-symbol
/// First sets.
pub fn first(graph: &SyntaxGraph, table: &SymbolTable, p: Option<NodeId>) -> SymbolSet {
    let mut mark = SymbolSet::new(graph.len());
    first0(graph, table, p, &mut mark, None)
}

/// Terminals acceptable at `p` within the production of `cur`: First of
/// `p`, extended by Follow(cur) when everything from `p` on is deletable.
pub fn expected(
    graph: &SyntaxGraph,
    table: &SymbolTable,
    p: Option<NodeId>,
    cur: usize,
) -> SymbolSet {
    let mut s = first(graph, table, p);
    if graph.del_graph(table, p) {
        s.or(&table.get(cur).follow);
    }
    s
}

/// `expected`, except that a resolver head contributes nothing: the LL(1)
/// and resolver checks must not look behind resolvers.
pub fn expected0(
    graph: &SyntaxGraph,
    table: &SymbolTable,
    p: Option<NodeId>,
    cur: usize,
) -> SymbolSet {
    match p {
        Some(id) if graph.node(id).kind == NodeKind::Resolver => SymbolSet::new(table.len()),
        _ => expected(graph, table, p, cur),
    }
}
