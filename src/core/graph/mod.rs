use core::{
    data::set::SymbolSet,
    diag::{Category, Diagnostic, ErrorSink},
    sym::{SymbolKind, SymbolTable, NO_SYM},
};

pub type NodeId = usize;

/// Closed set of syntax-graph constructs. Payloads are arena/table
/// indices, never pointers; see the `sub`/`down`/`next` edges on `Node`
/// for the graph structure itself.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum NodeKind {
    /// Terminal reference.
    Terminal(usize),
    /// Weak terminal: matched like a terminal but recoverable-over.
    WeakTerminal(usize),
    /// Nonterminal reference; recursion enters the symbol's own graph.
    Nonterminal(usize),
    /// Pragma reference.
    Pragma(usize),
    /// Character-class reference (scanner alphabet level).
    CharClass(usize),
    /// Wildcard placeholder; its set is filled in by analysis.
    Any,
    /// Error-recovery placeholder; its set is filled in by analysis.
    Sync,
    /// Alternative branch; `sub` is the branch body, `down` the next branch.
    Alt,
    /// Iteration; `sub` is the loop body.
    Iter,
    /// Option; `sub` is the optional body.
    Opt,
    /// Semantic action block.
    Sem,
    /// Semantic resolver predicate.
    Resolver,
    /// Empty derivation.
    Eps,
    /// End marker closing a finished production.
    End,
}

pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Successor in the same production chain.
    pub next: Option<NodeId>,
    /// True when `next` re-enters an enclosing construct (branch exits,
    /// iteration loopbacks). Subgraph traversals stop at `up` edges.
    pub up: bool,
    pub sub: Option<NodeId>,
    pub down: Option<NodeId>,
    /// Any/Sync contents, filled by the set-computation engine.
    pub set: Option<SymbolSet>,
    pub line: usize,
    /// Source span of semantic action / resolver text.
    pub span: Option<(usize, usize)>,
}

/// Builder-time value: a partially built subgraph, as its head node plus
/// the open `next` slots to wire up when a successor is attached.
#[derive(Clone, Debug)]
pub struct Graph {
    pub head: Option<NodeId>,
    open: Vec<Slot>,
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    node: NodeId,
    /// Whether the edge, once attached, leaves the enclosing construct.
    up: bool,
}

impl Graph {
    fn empty() -> Graph {
        Graph {
            head: None,
            open: Vec::new(),
        }
    }

    pub fn has_open_slots(&self) -> bool {
        !self.open.is_empty()
    }
}

/// Arena of syntax-graph nodes. Nodes are allocated once and owned
/// collectively; edges are indices into the arena.
pub struct SyntaxGraph {
    nodes: Vec<Node>,
}

impl SyntaxGraph {
    pub fn new() -> SyntaxGraph {
        SyntaxGraph { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn new_node(&mut self, kind: NodeKind, line: usize) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            kind,
            next: None,
            up: false,
            sub: None,
            down: None,
            set: None,
            line,
            span: None,
        });
        id
    }

    /// Single-node graph with one open slot.
    pub fn atom(&mut self, kind: NodeKind, line: usize) -> Graph {
        let id = self.new_node(kind, line);
        Graph {
            head: Some(id),
            open: vec![Slot { node: id, up: false }],
        }
    }

    fn attach(&mut self, slot: Slot, target: NodeId) {
        let node = &mut self.nodes[slot.node];
        node.next = Some(target);
        node.up = slot.up;
    }

    /// Wraps the first branch of an alternative chain in a branch node.
    pub fn make_first_alt(&mut self, g: Graph) -> Graph {
        let line = match g.head {
            Some(head) => self.nodes[head].line,
            None => 0,
        };
        let alt = self.new_node(NodeKind::Alt, line);
        self.nodes[alt].sub = g.head;
        let mut open: Vec<Slot> = g
            .open
            .iter()
            .map(|slot| Slot {
                node: slot.node,
                up: true,
            })
            .collect();
        open.push(Slot {
            node: alt,
            up: false,
        });
        Graph {
            head: Some(alt),
            open,
        }
    }

    /// g1 | g2: appends g2 as a new branch to g1's branch chain. Chaining
    /// right-associatively builds an n-way choice as a list of binary
    /// branch nodes; the validator treats the chain as one decision point.
    pub fn make_alternative(
        &mut self,
        g1: Graph,
        g2: Graph,
        sink: &mut dyn ErrorSink,
    ) -> Graph {
        let g1 = match g1.head {
            Some(head) if self.nodes[head].kind == NodeKind::Alt => g1,
            _ => {
                sink.report(Diagnostic::error(
                    Category::MalformedGraph,
                    g1.head.map(|h| self.nodes[h].line).unwrap_or(0),
                    "alternative chained onto a non-alternative graph".to_string(),
                ));
                self.make_first_alt(g1)
            }
        };

        let line = match g2.head {
            Some(head) => self.nodes[head].line,
            None => 0,
        };
        let alt = self.new_node(NodeKind::Alt, line);
        self.nodes[alt].sub = g2.head;

        // last branch node of g1's down chain
        if let Some(mut branch) = g1.head {
            while let Some(down) = self.nodes[branch].down {
                branch = down;
            }
            self.nodes[branch].down = Some(alt);
        }

        let mut open = g1.open;
        for slot in g2.open.iter() {
            open.push(Slot {
                node: slot.node,
                up: true,
            });
        }
        open.push(Slot { node: alt, up: true });
        Graph {
            head: g1.head,
            open,
        }
    }

    /// g1 g2: attaches g2's head at every open slot of g1. A left operand
    /// with no open slots is constructing unreachable code; this is
    /// reported and construction continues best-effort.
    pub fn make_sequence(&mut self, g1: Graph, g2: Graph, sink: &mut dyn ErrorSink) -> Graph {
        if g1.open.is_empty() {
            sink.report(Diagnostic::error(
                Category::MalformedGraph,
                g1.head.map(|h| self.nodes[h].line).unwrap_or(0),
                "sequence continues a graph with no open slots".to_string(),
            ));
            return Graph {
                head: g1.head.or(g2.head),
                open: g2.open,
            };
        }
        if let Some(target) = g2.head {
            for slot in g1.open.iter() {
                self.attach(*slot, target);
            }
        }
        Graph {
            head: g1.head,
            open: g2.open,
        }
    }

    /// { g }: the body's open slots loop back up to the iteration node;
    /// the iteration node itself is the exit slot. This loopback is the
    /// one legitimate cyclic `next` edge outside nonterminal recursion.
    pub fn make_iteration(&mut self, g: Graph) -> Graph {
        let line = match g.head {
            Some(head) => self.nodes[head].line,
            None => 0,
        };
        let iter = self.new_node(NodeKind::Iter, line);
        self.nodes[iter].sub = g.head;
        for slot in g.open.iter() {
            self.attach(
                Slot {
                    node: slot.node,
                    up: true,
                },
                iter,
            );
        }
        Graph {
            head: Some(iter),
            open: vec![Slot {
                node: iter,
                up: false,
            }],
        }
    }

    /// [ g ]: deletable by construction; both the option node and the
    /// body's open slots continue to the successor.
    pub fn make_option(&mut self, g: Graph) -> Graph {
        let line = match g.head {
            Some(head) => self.nodes[head].line,
            None => 0,
        };
        let opt = self.new_node(NodeKind::Opt, line);
        self.nodes[opt].sub = g.head;
        let mut open: Vec<Slot> = g
            .open
            .iter()
            .map(|slot| Slot {
                node: slot.node,
                up: true,
            })
            .collect();
        open.push(Slot {
            node: opt,
            up: false,
        });
        Graph {
            head: Some(opt),
            open,
        }
    }

    /// Terminates every open slot with an end marker and returns the
    /// production head. Used once per production body.
    pub fn finish(&mut self, g: Graph) -> Option<NodeId> {
        let line = match g.head {
            Some(head) => self.nodes[head].line,
            None => 0,
        };
        let end = self.new_node(NodeKind::End, line);
        for slot in g.open.iter() {
            self.attach(*slot, end);
        }
        g.head
    }

    /// Expands a literal token string into a sequence of single-character
    /// terminal nodes, registering the character terminals as needed.
    pub fn str_to_graph(
        &mut self,
        text: &str,
        line: usize,
        table: &mut SymbolTable,
        sink: &mut dyn ErrorSink,
    ) -> Graph {
        let mut graph = Graph::empty();
        for ch in text.chars() {
            let name = ch.to_string();
            let sym = match table.lookup(&name) {
                NO_SYM => table.register(SymbolKind::Terminal, &name, line, sink),
                id => id,
            };
            let atom = self.atom(NodeKind::Terminal(sym), line);
            graph = if graph.head.is_none() {
                atom
            } else {
                self.make_sequence(graph, atom, sink)
            };
        }
        graph
    }

    //------------ graph deletability checks -----------------

    /// True if the whole graph from `p` on can derive the empty string.
    pub fn del_graph(&self, table: &SymbolTable, p: Option<NodeId>) -> bool {
        match p {
            None => true,
            Some(id) => {
                self.del_node(table, id)
                    && (self.nodes[id].kind == NodeKind::End
                        || self.del_graph(table, self.nodes[id].next))
            }
        }
    }

    /// Like `del_graph`, but confined to the enclosing construct: stops
    /// at `up` edges.
    pub fn del_sub_graph(&self, table: &SymbolTable, p: Option<NodeId>) -> bool {
        match p {
            None => true,
            Some(id) => {
                self.del_node(table, id)
                    && (self.nodes[id].up || self.del_sub_graph(table, self.nodes[id].next))
            }
        }
    }

    /// Single-node deletability. Nonterminals defer to the symbol flag
    /// computed by the deletability fixpoint; until that pass resolves a
    /// symbol, it counts as non-deletable.
    pub fn del_node(&self, table: &SymbolTable, p: NodeId) -> bool {
        match self.nodes[p].kind {
            NodeKind::Nonterminal(sym) => table.get(sym).deletable,
            NodeKind::Alt => {
                self.del_sub_graph(table, self.nodes[p].sub)
                    || match self.nodes[p].down {
                        Some(down) => self.del_sub_graph(table, Some(down)),
                        None => false,
                    }
            }
            NodeKind::Iter
            | NodeKind::Opt
            | NodeKind::Sem
            | NodeKind::Eps
            | NodeKind::Sync
            | NodeKind::Resolver
            | NodeKind::End => true,
            NodeKind::Terminal(_)
            | NodeKind::WeakTerminal(_)
            | NodeKind::Pragma(_)
            | NodeKind::CharClass(_)
            | NodeKind::Any => false,
        }
    }
}
