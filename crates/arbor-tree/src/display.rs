//! Indented text dump of a fitted tree.
//!
//! ```text
//! Root
//! Returning value: 0
//! If attribute 0 = 0
//! 	Leaf. Returning value: 0
//! If attribute 0 = 1
//! 	Leaf. Returning value: 1
//! ```

use std::fmt;

use crate::node::{AttributeIndex, Node, NodeIndex};
use crate::tree::DecisionTree;

/// Names for attributes, attribute values, and class values in a dump.
pub trait Vocabulary {
    /// Name of an attribute.
    fn attribute_name(&self, attribute: AttributeIndex) -> String;

    /// Name of value `value` of `attribute`.
    fn value_name(&self, attribute: AttributeIndex, value: usize) -> String;

    /// Name of class value `class`.
    fn class_name(&self, class: usize) -> String;
}

/// Renders raw indices.
#[derive(Debug, Clone, Copy, Default)]
pub struct IndexVocabulary;

impl Vocabulary for IndexVocabulary {
    fn attribute_name(&self, attribute: AttributeIndex) -> String {
        attribute.index().to_string()
    }

    fn value_name(&self, _attribute: AttributeIndex, value: usize) -> String {
        value.to_string()
    }

    fn class_name(&self, class: usize) -> String {
        class.to_string()
    }
}

/// A [`DecisionTree`] paired with a [`Vocabulary`], ready to print.
///
/// Created by [`DecisionTree::display_with`].
#[derive(Debug)]
pub struct TreeDisplay<'a, V> {
    tree: &'a DecisionTree,
    vocabulary: &'a V,
}

impl<V: Vocabulary> TreeDisplay<'_, V> {
    fn write_node(&self, f: &mut fmt::Formatter<'_>, idx: NodeIndex, tabs: usize) -> fmt::Result {
        let indent = "\t".repeat(tabs);
        match self.tree.node(idx) {
            Node::Leaf { prediction, .. } => writeln!(
                f,
                "{indent}Leaf. Returning value: {}",
                self.vocabulary.class_name(*prediction)
            ),
            Node::Split {
                attribute,
                children,
                prediction,
                ..
            } => {
                writeln!(
                    f,
                    "{indent}Returning value: {}",
                    self.vocabulary.class_name(*prediction)
                )?;
                for (value, child) in children.iter().enumerate() {
                    if let Some(child) = child {
                        writeln!(
                            f,
                            "{indent}If attribute {} = {}",
                            self.vocabulary.attribute_name(*attribute),
                            self.vocabulary.value_name(*attribute, value)
                        )?;
                        self.write_node(f, *child, tabs + 1)?;
                    }
                }
                Ok(())
            }
        }
    }
}

impl<V: Vocabulary> fmt::Display for TreeDisplay<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Root")?;
        self.write_node(f, NodeIndex::ROOT, 0)
    }
}

impl DecisionTree {
    /// Dump the tree using names from `vocabulary`.
    #[must_use]
    pub fn display_with<'a, V: Vocabulary>(&'a self, vocabulary: &'a V) -> TreeDisplay<'a, V> {
        TreeDisplay {
            tree: self,
            vocabulary,
        }
    }
}

impl fmt::Display for DecisionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display_with(&IndexVocabulary), f)
    }
}
