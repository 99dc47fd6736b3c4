use core::{
    analysis::{expected, expected0, first},
    data::set::SymbolSet,
    diag::{Category, Diagnostic, ErrorSink},
    graph::{NodeId, NodeKind, SyntaxGraph},
    sym::{SymbolKind, SymbolTable},
};

/// Grammar validation suite. Every check runs unconditionally and reports
/// everything it finds; the verdict is the conjunction of all checks.
/// Read-only over the computed sets, apart from the `reached` flags.
pub struct GrammarChecker<'a> {
    table: &'a mut SymbolTable,
    graph: &'a SyntaxGraph,
    errors: usize,
}

impl<'a> GrammarChecker<'a> {
    pub fn new(table: &'a mut SymbolTable, graph: &'a SyntaxGraph) -> GrammarChecker<'a> {
        GrammarChecker {
            table,
            graph,
            errors: 0,
        }
    }

    /// Runs the full suite. True iff no error-severity finding surfaced;
    /// warnings are non-blocking.
    pub fn check_all(&mut self, sink: &mut dyn ErrorSink) -> bool {
        self.nts_complete(sink);
        self.all_nts_reached(sink);
        self.no_circular_productions(sink);
        self.all_nts_to_term(sink);
        self.check_resolvers(sink);
        self.check_ll1(sink);
        debug!("grammar checks finished with {} errors", self.errors);
        self.errors == 0
    }

    fn error(&mut self, sink: &mut dyn ErrorSink, category: Category, line: usize, msg: String) {
        self.errors += 1;
        sink.report(Diagnostic::error(category, line, msg));
    }

    //--------------- circular productions ----------------------

    /// Collects nonterminals `s` such that the current production can
    /// derive exactly `s` (possibly through deletable wrapping).
    fn get_singles(&self, p: Option<NodeId>, singles: &mut Vec<usize>) {
        let id = match p {
            Some(id) => id,
            None => return,
        };
        let node = self.graph.node(id);
        match node.kind {
            NodeKind::Nonterminal(sym) => {
                if node.up || self.graph.del_graph(self.table, node.next) {
                    singles.push(sym);
                }
            }
            NodeKind::Alt | NodeKind::Iter | NodeKind::Opt => {
                if node.up || self.graph.del_graph(self.table, node.next) {
                    self.get_singles(node.sub, singles);
                    if node.kind == NodeKind::Alt {
                        self.get_singles(node.down, singles);
                    }
                }
            }
            _ => {}
        }
        if !node.up && self.graph.del_node(self.table, id) {
            self.get_singles(node.next, singles);
        }
    }

    pub fn no_circular_productions(&mut self, sink: &mut dyn ErrorSink) -> bool {
        let mut pairs: Vec<(usize, usize)> = Vec::new();
        for id in self.table.ids_of(SymbolKind::Nonterminal) {
            let mut singles = Vec::new();
            self.get_singles(self.table.get(id).graph, &mut singles);
            for s in singles {
                pairs.push((id, s));
            }
        }

        // strip pairs that cannot be part of a cycle until stable
        loop {
            let mut changed = false;
            let mut index = 0;
            while index < pairs.len() {
                let (left, right) = pairs[index];
                let on_right = pairs.iter().any(|&(_, r)| r == left);
                let on_left = pairs.iter().any(|&(l, _)| l == right);
                if !on_left || !on_right {
                    pairs.remove(index);
                    changed = true;
                } else {
                    index += 1;
                }
            }
            if !changed {
                break;
            }
        }

        // one diagnostic per cycle, naming every symbol on it
        let mut reported = SymbolSet::new(self.table.len());
        let mut ok = true;
        for i in 0..pairs.len() {
            let (start, _) = pairs[i];
            if reported.contains(start) {
                continue;
            }
            ok = false;
            let mut chain = vec![start];
            reported.add(start);
            let mut cur = start;
            while let Some(&(_, right)) = pairs.iter().find(|&&(l, _)| l == cur) {
                chain.push(right);
                if right == start || reported.contains(right) {
                    break;
                }
                reported.add(right);
                cur = right;
            }
            let msg = {
                let names: Vec<&str> =
                    chain.iter().map(|&s| &self.table.get(s).name[..]).collect();
                format!("circular derivation: {}", names.join(" --> "))
            };
            let line = self.table.get(start).line;
            self.error(sink, Category::CircularProduction, line, msg);
        }
        ok
    }

    //--------------- LL(1) conflicts ----------------------

    fn check_overlap(
        &mut self,
        sink: &mut dyn ErrorSink,
        s1: &SymbolSet,
        s2: &SymbolSet,
        category: Category,
        cur: usize,
    ) {
        let overlapping: Vec<usize> = self
            .table
            .ids_of(SymbolKind::Terminal)
            .into_iter()
            .filter(|&t| s1.contains(t) && s2.contains(t))
            .collect();
        for t in overlapping {
            let (line, cur_name, term_name) = {
                let cur_sym = self.table.get(cur);
                (cur_sym.line, cur_sym.name.clone(), self.table.get(t).name.clone())
            };
            let msg = match category {
                Category::Ll1AlternativeOverlap => format!(
                    "LL(1) conflict in {}: '{}' is the start of several alternatives",
                    cur_name, term_name
                ),
                _ => format!(
                    "LL(1) conflict in {}: '{}' starts both a deletable structure and its continuation",
                    cur_name, term_name
                ),
            };
            self.error(sink, category, line, msg);
        }
    }

    fn check_alts(&mut self, sink: &mut dyn ErrorSink, mut p: Option<NodeId>, cur: usize) {
        while let Some(id) = p {
            let (kind, next, sub, up) = {
                let node = self.graph.node(id);
                (node.kind, node.next, node.sub, node.up)
            };
            match kind {
                NodeKind::Alt => {
                    let mut s1 = SymbolSet::new(self.table.len());
                    let mut q = Some(id);
                    while let Some(branch) = q {
                        let (branch_sub, branch_down) = {
                            let node = self.graph.node(branch);
                            (node.sub, node.down)
                        };
                        let s2 = expected0(self.graph, self.table, branch_sub, cur);
                        self.check_overlap(sink, &s1, &s2, Category::Ll1AlternativeOverlap, cur);
                        s1.or(&s2);
                        self.check_alts(sink, branch_sub, cur);
                        q = branch_down;
                    }
                }
                NodeKind::Opt | NodeKind::Iter => {
                    if self.graph.del_sub_graph(self.table, sub) {
                        let (line, name) = {
                            let sym = self.table.get(cur);
                            (sym.line, sym.name.clone())
                        };
                        self.error(
                            sink,
                            Category::Ll1DeletableStructure,
                            line,
                            format!(
                                "LL(1) conflict in {}: contents of an option or iteration must not be deletable",
                                name
                            ),
                        );
                    } else {
                        let s1 = expected0(self.graph, self.table, sub, cur);
                        let s2 = expected(self.graph, self.table, next, cur);
                        self.check_overlap(sink, &s1, &s2, Category::Ll1IterationOverlap, cur);
                    }
                    self.check_alts(sink, sub, cur);
                }
                NodeKind::Any => {
                    let empty = match self.graph.node(id).set {
                        Some(ref set) => set.is_empty(),
                        None => true,
                    };
                    // e.g. {ANY} ANY: the inner wildcard already consumed
                    // every terminal the outer one could match
                    if empty {
                        let (line, name) = {
                            let sym = self.table.get(cur);
                            (sym.line, sym.name.clone())
                        };
                        self.error(
                            sink,
                            Category::Ll1UnmatchableAny,
                            line,
                            format!("LL(1) conflict in {}: ANY node matches no symbol", name),
                        );
                    }
                }
                _ => {}
            }
            if up {
                break;
            }
            p = next;
        }
    }

    pub fn check_ll1(&mut self, sink: &mut dyn ErrorSink) -> bool {
        let before = self.errors;
        for id in self.table.ids_of(SymbolKind::Nonterminal) {
            let head = self.table.get(id).graph;
            self.check_alts(sink, head, id);
        }
        self.errors == before
    }

    //------------- resolver legality --------------------

    fn res_warning(&self, sink: &mut dyn ErrorSink, category: Category, id: NodeId, msg: &str) {
        sink.report(Diagnostic::warning(
            category,
            self.graph.node(id).line,
            msg.to_string(),
        ));
    }

    fn check_res(
        &mut self,
        sink: &mut dyn ErrorSink,
        mut p: Option<NodeId>,
        cur: usize,
        mut rslv_allowed: bool,
    ) {
        while let Some(id) = p {
            let (kind, next, sub, up) = {
                let node = self.graph.node(id);
                (node.kind, node.next, node.sub, node.up)
            };
            match kind {
                NodeKind::Alt => {
                    let mut all_expected = SymbolSet::new(self.table.len());
                    let mut q = Some(id);
                    while let Some(branch) = q {
                        let branch_sub = self.graph.node(branch).sub;
                        all_expected.or(&expected0(self.graph, self.table, branch_sub, cur));
                        q = self.graph.node(branch).down;
                    }

                    let mut so_far = SymbolSet::new(self.table.len());
                    let mut q = Some(id);
                    while let Some(branch) = q {
                        let branch_sub = self.graph.node(branch).sub;
                        let resolver = match branch_sub {
                            Some(s) if self.graph.node(s).kind == NodeKind::Resolver => Some(s),
                            _ => None,
                        };
                        match resolver {
                            Some(rslv) => {
                                let behind = self.graph.node(rslv).next;
                                let fs = expected(self.graph, self.table, behind, cur);
                                if fs.intersects(&so_far) {
                                    self.res_warning(
                                        sink,
                                        Category::ResolverNeverEvaluated,
                                        rslv,
                                        "resolver will never be evaluated; place it at the previous conflicting alternative",
                                    );
                                }
                                if !fs.intersects(&all_expected) {
                                    self.res_warning(
                                        sink,
                                        Category::ResolverNoConflict,
                                        rslv,
                                        "misplaced resolver: no LL(1) conflict",
                                    );
                                }
                            }
                            None => {
                                so_far.or(&expected(self.graph, self.table, branch_sub, cur));
                            }
                        }
                        self.check_res(sink, branch_sub, cur, true);
                        q = self.graph.node(branch).down;
                    }
                }
                NodeKind::Iter | NodeKind::Opt => {
                    if let Some(s) = sub {
                        if self.graph.node(s).kind == NodeKind::Resolver {
                            let behind = self.graph.node(s).next;
                            let fs = first(self.graph, self.table, behind);
                            let fs_next = expected(self.graph, self.table, next, cur);
                            if !fs.intersects(&fs_next) {
                                self.res_warning(
                                    sink,
                                    Category::ResolverNoConflict,
                                    s,
                                    "misplaced resolver: no LL(1) conflict",
                                );
                            }
                        }
                    }
                    self.check_res(sink, sub, cur, true);
                }
                NodeKind::Resolver => {
                    if !rslv_allowed {
                        self.res_warning(
                            sink,
                            Category::ResolverIllegalPosition,
                            id,
                            "resolver must be the first element of an alternative branch",
                        );
                    }
                }
                _ => {}
            }
            if up {
                break;
            }
            p = next;
            rslv_allowed = false;
        }
    }

    pub fn check_resolvers(&mut self, sink: &mut dyn ErrorSink) {
        for id in self.table.ids_of(SymbolKind::Nonterminal) {
            let head = self.table.get(id).graph;
            self.check_res(sink, head, id, false);
        }
    }

    //------------- completeness / reachability / termination ----------

    pub fn nts_complete(&mut self, sink: &mut dyn ErrorSink) -> bool {
        let mut ok = true;
        for id in self.table.ids_of(SymbolKind::Nonterminal) {
            if self.table.get(id).graph.is_none() {
                ok = false;
                let (line, name) = {
                    let sym = self.table.get(id);
                    (sym.line, sym.name.clone())
                };
                self.error(
                    sink,
                    Category::MissingProduction,
                    line,
                    format!("nonterminal {} has no production", name),
                );
            }
        }
        ok
    }

    fn mark_reached_nts(&mut self, mut p: Option<NodeId>) {
        while let Some(id) = p {
            let (kind, next, sub, down, up) = {
                let node = self.graph.node(id);
                (node.kind, node.next, node.sub, node.down, node.up)
            };
            match kind {
                NodeKind::Nonterminal(sym) => {
                    if !self.table.get(sym).reached {
                        self.table.get_mut(sym).reached = true;
                        let head = self.table.get(sym).graph;
                        self.mark_reached_nts(head);
                    }
                }
                NodeKind::Alt => {
                    self.mark_reached_nts(sub);
                    self.mark_reached_nts(down);
                }
                NodeKind::Iter | NodeKind::Opt => {
                    self.mark_reached_nts(sub);
                }
                _ => {}
            }
            if up {
                break;
            }
            p = next;
        }
    }

    pub fn all_nts_reached(&mut self, sink: &mut dyn ErrorSink) -> bool {
        let start = match self.table.start() {
            Some(start) => start,
            None => return false,
        };
        self.table.get_mut(start).reached = true;
        let head = self.table.get(start).graph;
        self.mark_reached_nts(head);

        let mut ok = true;
        for id in self.table.ids_of(SymbolKind::Nonterminal) {
            let sym = self.table.get(id);
            if !sym.reached {
                ok = false;
                sink.report(Diagnostic::warning(
                    Category::UnreachableNonterminal,
                    sym.line,
                    format!("nonterminal {} cannot be reached", sym.name),
                ));
            }
        }
        ok
    }

    /// True if the graph at `p` can derive a terminal-only string, given
    /// that the nonterminals in `mark` (still unresolved) cannot.
    fn is_term(&self, mut p: Option<NodeId>, mark: &SymbolSet) -> bool {
        while let Some(id) = p {
            let node = self.graph.node(id);
            if let NodeKind::Nonterminal(sym) = node.kind {
                if mark.contains(sym) {
                    return false;
                }
            }
            if node.kind == NodeKind::Alt
                && !self.is_term(node.sub, mark)
                && (node.down.is_none() || !self.is_term(node.down, mark))
            {
                return false;
            }
            if node.up {
                break;
            }
            p = node.next;
        }
        true
    }

    pub fn all_nts_to_term(&mut self, sink: &mut dyn ErrorSink) -> bool {
        let nts = self.table.ids_of(SymbolKind::Nonterminal);
        // mark holds the nonterminals not yet shown to terminate
        let mut mark = SymbolSet::new(self.table.len());
        for &id in nts.iter() {
            mark.add(id);
        }
        loop {
            let mut changed = false;
            for &id in nts.iter() {
                if mark.contains(id) && self.is_term(self.table.get(id).graph, &mark) {
                    mark.remove(id);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        let mut ok = true;
        for &id in nts.iter() {
            if mark.contains(id) {
                ok = false;
                let (line, name) = {
                    let sym = self.table.get(id);
                    (sym.line, sym.name.clone())
                };
                self.error(
                    sink,
                    Category::NonTerminatingNonterminal,
                    line,
                    format!("nonterminal {} cannot be derived to terminals", name),
                );
            }
        }
        ok
    }
}

#[cfg(test)]
mod tests {
    use core::{
        analysis::SetComputation,
        diag::DiagnosticLog,
        graph::Graph,
        trace::TraceOptions,
    };

    use super::*;

    struct Fixture {
        table: SymbolTable,
        graph: SyntaxGraph,
        log: DiagnosticLog,
    }

    impl Fixture {
        fn new() -> Fixture {
            Fixture {
                table: SymbolTable::new(),
                graph: SyntaxGraph::new(),
                log: DiagnosticLog::new(),
            }
        }

        fn terminal(&mut self, name: &str) -> usize {
            self.table
                .register(SymbolKind::Terminal, name, 1, &mut self.log)
        }

        fn nonterminal(&mut self, name: &str) -> usize {
            self.table
                .register(SymbolKind::Nonterminal, name, 1, &mut self.log)
        }

        fn t_ref(&mut self, sym: usize) -> Graph {
            self.graph.atom(NodeKind::Terminal(sym), 1)
        }

        fn nt_ref(&mut self, sym: usize) -> Graph {
            self.graph.atom(NodeKind::Nonterminal(sym), 1)
        }

        fn production(&mut self, sym: usize, g: Graph) {
            let head = self.graph.finish(g);
            self.table.get_mut(sym).graph = head;
        }

        fn analyze(&mut self) -> bool {
            let trace = TraceOptions::new();
            SetComputation::new(&mut self.table, &mut self.graph, &trace)
                .compute(&mut self.log);
            GrammarChecker::new(&mut self.table, &self.graph).check_all(&mut self.log)
        }
    }

    #[test]
    fn circular_productions_detected_once() {
        //setup
        // A = B .  B = A .
        let mut f = Fixture::new();
        let a = f.nonterminal("A");
        let b = f.nonterminal("B");
        f.table.set_start(a);
        let g = f.nt_ref(b);
        f.production(a, g);
        let g = f.nt_ref(a);
        f.production(b, g);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(!ok);
        let circular = f.log.of_category(Category::CircularProduction);
        assert_eq!(circular.len(), 1);
        assert!(circular[0].message.contains("A"));
        assert!(circular[0].message.contains("B"));
    }

    #[test]
    fn ll1_overlap_detected() {
        //setup
        // S = "x" A | "x" B .  A = "a" .  B = "b" .
        let mut f = Fixture::new();
        let x = f.terminal("x");
        let ta = f.terminal("a");
        let tb = f.terminal("b");
        let s = f.nonterminal("S");
        let a = f.nonterminal("A");
        let b = f.nonterminal("B");
        f.table.set_start(s);

        let g1 = f.t_ref(x);
        let g2 = f.nt_ref(a);
        let left = f.graph.make_sequence(g1, g2, &mut f.log);
        let alt = f.graph.make_first_alt(left);
        let g1 = f.t_ref(x);
        let g2 = f.nt_ref(b);
        let right = f.graph.make_sequence(g1, g2, &mut f.log);
        let body = f.graph.make_alternative(alt, right, &mut f.log);
        f.production(s, body);

        let g = f.t_ref(ta);
        f.production(a, g);
        let g = f.t_ref(tb);
        f.production(b, g);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(!ok);
        let overlaps = f.log.of_category(Category::Ll1AlternativeOverlap);
        assert_eq!(overlaps.len(), 1);
        assert!(overlaps[0].message.contains("'x'"));
    }

    #[test]
    fn resolver_suppresses_ll1_overlap() {
        //setup
        // S = IF(...) "x" A | "x" B .
        let mut f = Fixture::new();
        let x = f.terminal("x");
        let ta = f.terminal("a");
        let tb = f.terminal("b");
        let s = f.nonterminal("S");
        let a = f.nonterminal("A");
        let b = f.nonterminal("B");
        f.table.set_start(s);

        let rslv = f.graph.atom(NodeKind::Resolver, 1);
        let g1 = f.t_ref(x);
        let g2 = f.nt_ref(a);
        let tail = f.graph.make_sequence(g1, g2, &mut f.log);
        let left = f.graph.make_sequence(rslv, tail, &mut f.log);
        let alt = f.graph.make_first_alt(left);
        let g1 = f.t_ref(x);
        let g2 = f.nt_ref(b);
        let right = f.graph.make_sequence(g1, g2, &mut f.log);
        let body = f.graph.make_alternative(alt, right, &mut f.log);
        f.production(s, body);

        let g = f.t_ref(ta);
        f.production(a, g);
        let g = f.t_ref(tb);
        f.production(b, g);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(ok);
        assert_eq!(f.log.of_category(Category::Ll1AlternativeOverlap).len(), 0);
        assert_eq!(f.log.of_category(Category::ResolverNoConflict).len(), 0);
        assert_eq!(f.log.of_category(Category::ResolverNeverEvaluated).len(), 0);
    }

    #[test]
    fn resolver_without_conflict_warns() {
        //setup
        // S = IF(...) "x" | "y" .
        let mut f = Fixture::new();
        let x = f.terminal("x");
        let y = f.terminal("y");
        let s = f.nonterminal("S");
        f.table.set_start(s);

        let rslv = f.graph.atom(NodeKind::Resolver, 1);
        let g1 = f.t_ref(x);
        let left = f.graph.make_sequence(rslv, g1, &mut f.log);
        let alt = f.graph.make_first_alt(left);
        let right = f.t_ref(y);
        let body = f.graph.make_alternative(alt, right, &mut f.log);
        f.production(s, body);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(ok); // resolver findings are warnings
        assert_eq!(f.log.of_category(Category::ResolverNoConflict).len(), 1);
    }

    #[test]
    fn iteration_body_overlaps_continuation() {
        //setup
        // S = { "x" } "x" .
        let mut f = Fixture::new();
        let x = f.terminal("x");
        let s = f.nonterminal("S");
        f.table.set_start(s);
        let g = f.t_ref(x);
        let iter = f.graph.make_iteration(g);
        let tail = f.t_ref(x);
        let body = f.graph.make_sequence(iter, tail, &mut f.log);
        f.production(s, body);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(!ok);
        let overlaps = f.log.of_category(Category::Ll1IterationOverlap);
        assert_eq!(overlaps.len(), 1);
        assert!(overlaps[0].message.contains("'x'"));
    }

    #[test]
    fn wildcard_emptied_by_inner_wildcard() {
        //setup
        // S = { ANY } ANY .  The inner wildcard absorbs everything the
        // outer one could start with, leaving it unmatchable.
        let mut f = Fixture::new();
        f.terminal("x");
        let s = f.nonterminal("S");
        f.table.set_start(s);
        let inner = f.graph.atom(NodeKind::Any, 1);
        let iter = f.graph.make_iteration(inner);
        let outer = f.graph.atom(NodeKind::Any, 1);
        let body = f.graph.make_sequence(iter, outer, &mut f.log);
        f.production(s, body);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(!ok);
        assert_eq!(f.log.of_category(Category::Ll1UnmatchableAny).len(), 1);
    }

    #[test]
    fn resolver_after_conflicting_alternative_warns() {
        //setup
        // S = "x" "a" | IF(...) "x" "b" .  The first branch already
        // claims "x", so the resolver can never be asked.
        let mut f = Fixture::new();
        let x = f.terminal("x");
        let ta = f.terminal("a");
        let tb = f.terminal("b");
        let s = f.nonterminal("S");
        f.table.set_start(s);

        let g1 = f.t_ref(x);
        let g2 = f.t_ref(ta);
        let left = f.graph.make_sequence(g1, g2, &mut f.log);
        let alt = f.graph.make_first_alt(left);
        let rslv = f.graph.atom(NodeKind::Resolver, 1);
        let g1 = f.t_ref(x);
        let g2 = f.t_ref(tb);
        let tail = f.graph.make_sequence(g1, g2, &mut f.log);
        let right = f.graph.make_sequence(rslv, tail, &mut f.log);
        let body = f.graph.make_alternative(alt, right, &mut f.log);
        f.production(s, body);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(ok); // resolver findings are warnings
        let never = f.log.of_category(Category::ResolverNeverEvaluated);
        assert_eq!(never.len(), 1);
        assert_eq!(f.log.of_category(Category::Ll1AlternativeOverlap).len(), 0);
    }

    #[test]
    fn resolver_inside_sequence_warns() {
        //setup
        // S = "x" IF(...) "y" .
        let mut f = Fixture::new();
        let x = f.terminal("x");
        let y = f.terminal("y");
        let s = f.nonterminal("S");
        f.table.set_start(s);
        let rslv = f.graph.atom(NodeKind::Resolver, 1);
        let g2 = f.t_ref(y);
        let tail = f.graph.make_sequence(rslv, g2, &mut f.log);
        let g1 = f.t_ref(x);
        let body = f.graph.make_sequence(g1, tail, &mut f.log);
        f.production(s, body);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(ok);
        assert_eq!(
            f.log.of_category(Category::ResolverIllegalPosition).len(),
            1
        );
    }

    #[test]
    fn missing_production_reported() {
        //setup
        // S = A .  A never defined.
        let mut f = Fixture::new();
        let s = f.nonterminal("S");
        let a = f.nonterminal("A");
        f.table.set_start(s);
        let g = f.nt_ref(a);
        f.production(s, g);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(!ok);
        let missing = f.log.of_category(Category::MissingProduction);
        assert_eq!(missing.len(), 1);
        assert!(missing[0].message.contains("A"));
    }

    #[test]
    fn unreachable_nonterminal_warns_only() {
        //setup
        // S = "x" .  A = "y" . (A declared, never referenced)
        let mut f = Fixture::new();
        let x = f.terminal("x");
        let y = f.terminal("y");
        let s = f.nonterminal("S");
        let a = f.nonterminal("A");
        f.table.set_start(s);
        let g = f.t_ref(x);
        f.production(s, g);
        let g = f.t_ref(y);
        f.production(a, g);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(ok); // unreachable is a warning, not an error
        let unreachable = f.log.of_category(Category::UnreachableNonterminal);
        assert_eq!(unreachable.len(), 1);
        assert!(unreachable[0].message.contains("A"));
        assert_eq!(f.log.of_category(Category::MissingProduction).len(), 0);
        assert_eq!(f.log.of_category(Category::CircularProduction).len(), 0);
    }

    #[test]
    fn non_terminating_nonterminal_reported() {
        //setup
        // S = "x" A .  A = "y" A . (A never bottoms out)
        let mut f = Fixture::new();
        let x = f.terminal("x");
        let y = f.terminal("y");
        let s = f.nonterminal("S");
        let a = f.nonterminal("A");
        f.table.set_start(s);
        let g1 = f.t_ref(x);
        let g2 = f.nt_ref(a);
        let body = f.graph.make_sequence(g1, g2, &mut f.log);
        f.production(s, body);
        let g1 = f.t_ref(y);
        let g2 = f.nt_ref(a);
        let body = f.graph.make_sequence(g1, g2, &mut f.log);
        f.production(a, body);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(!ok);
        let non_term = f.log.of_category(Category::NonTerminatingNonterminal);
        assert_eq!(non_term.len(), 2);
    }

    #[test]
    fn deletable_iteration_body_reported() {
        //setup
        // S = { [ "x" ] } "y" .
        let mut f = Fixture::new();
        let x = f.terminal("x");
        let y = f.terminal("y");
        let s = f.nonterminal("S");
        f.table.set_start(s);
        let g = f.t_ref(x);
        let opt = f.graph.make_option(g);
        let iter = f.graph.make_iteration(opt);
        let tail = f.t_ref(y);
        let body = f.graph.make_sequence(iter, tail, &mut f.log);
        f.production(s, body);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(!ok);
        assert_eq!(f.log.of_category(Category::Ll1DeletableStructure).len(), 1);
    }

    #[test]
    fn clean_grammar_passes() {
        //setup
        // S = A "end" .  A = "x" B .  B = "y" | .
        let mut f = Fixture::new();
        let x = f.terminal("x");
        let y = f.terminal("y");
        let end = f.terminal("end");
        let s = f.nonterminal("S");
        let a = f.nonterminal("A");
        let b = f.nonterminal("B");
        f.table.set_start(s);

        let g1 = f.nt_ref(a);
        let g2 = f.t_ref(end);
        let body = f.graph.make_sequence(g1, g2, &mut f.log);
        f.production(s, body);

        let g1 = f.t_ref(x);
        let g2 = f.nt_ref(b);
        let body = f.graph.make_sequence(g1, g2, &mut f.log);
        f.production(a, body);

        let g1 = f.t_ref(y);
        let alt = f.graph.make_first_alt(g1);
        let eps = f.graph.atom(NodeKind::Eps, 1);
        let body = f.graph.make_alternative(alt, eps, &mut f.log);
        f.production(b, body);

        //exercise
        let ok = f.analyze();

        //verify
        assert!(ok);
        assert_eq!(f.log.error_count(), 0);
    }
}
