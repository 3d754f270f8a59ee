pub mod document;
pub mod style;

pub use document::{Attribute, Document, Element, Namespace, Node, QName, SVG_NS};
pub use style::Style;
