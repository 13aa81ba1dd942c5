pub mod attribute;
pub mod fact;
pub mod ids;

pub use attribute::{AttributeTree, Element, ElementValue, Tag, TagParseError};
pub use fact::{Fact, FactObject};
pub use ids::{ClassIri, EntityId, PropertyIri};
