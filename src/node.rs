//! Per-search node records. Records live in an arena indexed by `y * width + x`; instead of
//! clearing the arena between searches, each search bumps a generation counter and records from
//! an older generation read as neutral.

/// Which frontier of a search discovered a node. Unidirectional searches only use
/// [Frontier::ByStart].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Frontier {
    ByStart,
    ByEnd,
}

impl Frontier {
    pub fn opposite(self) -> Frontier {
        match self {
            Frontier::ByStart => Frontier::ByEnd,
            Frontier::ByEnd => Frontier::ByStart,
        }
    }
}

/// Transient search state of a single cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    /// Cost from the root of the frontier that reached this node.
    pub g: f64,
    /// Cached (weighted) heuristic estimate, computed the first time the node is reached.
    pub h: Option<f64>,
    pub f: f64,
    pub opened: Option<Frontier>,
    pub closed: bool,
    /// Arena index of the node this one was reached from.
    pub parent: Option<usize>,
    generation: u32,
}

impl Default for Node {
    fn default() -> Self {
        Node {
            g: 0.0,
            h: None,
            f: 0.0,
            opened: None,
            closed: false,
            parent: None,
            generation: 0,
        }
    }
}

impl Node {
    pub fn is_opened(&self) -> bool {
        self.opened.is_some()
    }
}

/// Generation-stamped arena of [Node] records.
#[derive(Debug, Default)]
pub struct SearchNodes {
    nodes: Vec<Node>,
    generation: u32,
}

impl SearchNodes {
    pub fn new(len: usize) -> SearchNodes {
        SearchNodes {
            nodes: vec![Node::default(); len],
            generation: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Starts a new search: every existing record becomes stale.
    pub fn begin(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped around, stale records could collide with the new generation.
            self.nodes.fill(Node::default());
            self.generation = 1;
        }
    }

    /// Returns the record at `ix`, neutral if it belongs to an earlier search.
    pub fn get(&self, ix: usize) -> Node {
        let node = self.nodes[ix];
        if node.generation == self.generation {
            node
        } else {
            Node {
                generation: self.generation,
                ..Node::default()
            }
        }
    }

    /// Mutable access to the record at `ix`, resetting it first if it is stale.
    pub fn get_mut(&mut self, ix: usize) -> &mut Node {
        let generation = self.generation;
        let node = &mut self.nodes[ix];
        if node.generation != generation {
            *node = Node {
                generation,
                ..Node::default()
            };
        }
        node
    }

    pub fn parent(&self, ix: usize) -> Option<usize> {
        self.get(ix).parent
    }
}
