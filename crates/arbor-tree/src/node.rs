use std::fmt;

/// Zero-based nominal attribute index (the class attribute is not counted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttributeIndex(usize);

impl AttributeIndex {
    /// Create a new attribute index from a zero-based column position.
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based attribute index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for AttributeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Index into a `Vec<Node>` arena, identifying a specific node in a decision tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Index of the root node in every tree arena.
    pub const ROOT: NodeIndex = NodeIndex(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Return the zero-based arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Criterion-agnostic impurity value (Gini or Entropy).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Impurity(f64);

impl Impurity {
    /// Impurity of a single-class population.
    pub const PURE: Impurity = Impurity(0.0);

    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw impurity value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Return `true` when the population is perfectly classified.
    #[must_use]
    pub fn is_pure(self) -> bool {
        self.0 == 0.0
    }
}

impl fmt::Display for Impurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}

/// A node in a decision tree arena.
///
/// Trees are stored as `Vec<Node>` where children are referenced by
/// [`NodeIndex`] rather than pointers. The tree owns every node; a split
/// owns its children only through the indices in its slot vector.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An interior node testing one nominal attribute.
    Split {
        /// Attribute tested at this node.
        attribute: AttributeIndex,
        /// One slot per value of `attribute`; `None` when no training
        /// record carried that value.
        children: Vec<Option<NodeIndex>>,
        /// Majority class, used when classification stops here.
        prediction: usize,
        /// Class distribution of the training records at this node.
        distribution: Vec<f64>,
        /// Impurity at this node before splitting.
        impurity: Impurity,
        /// Number of training records that reached this node.
        n_records: usize,
        /// Distance from the root.
        depth: usize,
    },
    /// A terminal leaf node.
    Leaf {
        /// Majority class.
        prediction: usize,
        /// Class distribution of the training records at this leaf.
        distribution: Vec<f64>,
        /// Impurity at this leaf.
        impurity: Impurity,
        /// Number of training records in this leaf.
        n_records: usize,
        /// Distance from the root.
        depth: usize,
    },
}

impl Node {
    /// Return the class predicted when classification stops at this node.
    #[must_use]
    pub fn prediction(&self) -> usize {
        match self {
            Node::Split { prediction, .. } | Node::Leaf { prediction, .. } => *prediction,
        }
    }

    /// Return the class distribution of the training records at this node.
    #[must_use]
    pub fn distribution(&self) -> &[f64] {
        match self {
            Node::Split { distribution, .. } | Node::Leaf { distribution, .. } => distribution,
        }
    }

    /// Return the impurity at this node (before splitting for interior nodes).
    #[must_use]
    pub fn impurity(&self) -> Impurity {
        match self {
            Node::Split { impurity, .. } | Node::Leaf { impurity, .. } => *impurity,
        }
    }

    /// Return the number of training records that reached this node.
    #[must_use]
    pub fn n_records(&self) -> usize {
        match self {
            Node::Split { n_records, .. } | Node::Leaf { n_records, .. } => *n_records,
        }
    }

    /// Return the distance of this node from the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Node::Split { depth, .. } | Node::Leaf { depth, .. } => *depth,
        }
    }

    /// Return the tested attribute, or `None` for a leaf.
    #[must_use]
    pub fn attribute(&self) -> Option<AttributeIndex> {
        match self {
            Node::Split { attribute, .. } => Some(*attribute),
            Node::Leaf { .. } => None,
        }
    }

    /// Return the child slots, or `None` for a leaf.
    #[must_use]
    pub fn children(&self) -> Option<&[Option<NodeIndex>]> {
        match self {
            Node::Split { children, .. } => Some(children),
            Node::Leaf { .. } => None,
        }
    }

    /// Return `true` if this node is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}
