pub mod error;
pub mod linked_list;

pub use error::{ListError, Result};
pub use linked_list::{IntoIter, Iter, LinkedList, Node, Nodes, Slice, SliceSpec, Subscript};
