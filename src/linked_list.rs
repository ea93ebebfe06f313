use std::any::Any;
use std::fmt::{self, Debug, Display};
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use tracing::{debug, trace};

use crate::error::{ListError, Result};

type Link<T> = Option<Box<Node<T>>>;

pub struct Node<T> {
    value: T,
    link: Link<T>,
}

impl<T> Node<T> {
    fn new(value: T) -> Self {
        Self { value, link: None }
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn link(&self) -> Option<&Node<T>> {
        self.link.as_deref()
    }
}

// Never follows `link`, so printing a single node stays bounded.
impl<T: Debug> Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({:?}, <\"link\">)", self.value)
    }
}

/// No length is cached: `len`, `get` and `index_of` walk the chain on every
/// call.
pub struct LinkedList<T> {
    head: Link<T>,
}

impl<T> LinkedList<T> {
    pub fn new() -> Self {
        Self { head: None }
    }

    pub fn head(&self) -> Option<&Node<T>> {
        self.head.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Every call starts a fresh walk from `head`.
    pub fn nodes(&self) -> Nodes<'_, T> {
        Nodes {
            next: self.head.as_deref(),
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            nodes: self.nodes(),
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn get(&self, index: usize) -> Result<&T> {
        self.iter().nth(index).ok_or_else(|| {
            debug!(index, "index past the end of linked list");
            ListError::OutOfRange { op: "index" }
        })
    }

    /// Negative bounds and a zero step would need backward traversal, so they
    /// produce an empty view.
    pub fn get_range(
        &self,
        start: Option<isize>,
        stop: Option<isize>,
        step: Option<isize>,
    ) -> Slice<'_, T> {
        self.slice(SliceSpec { start, stop, step })
    }

    pub fn slice(&self, spec: SliceSpec) -> Slice<'_, T> {
        Slice::new(self.iter(), spec)
    }

    /// Integers select one value, [`SliceSpec`] and integer ranges select a
    /// [`Slice`]. Anything else is an invalid index type error.
    pub fn subscript<I: Any>(&self, index: I) -> Result<Subscript<'_, T>> {
        let index: &dyn Any = &index;
        if let Some(position) = as_integer(index) {
            return match usize::try_from(position) {
                Ok(position) => self.get(position).map(Subscript::Item),
                Err(_) => {
                    debug!(?position, "index not reachable in linked list");
                    Err(ListError::OutOfRange { op: "index" })
                }
            };
        }
        if let Some(spec) = as_slice_spec(index) {
            return Ok(Subscript::Slice(self.slice(spec)));
        }
        let type_name = short_type_name(std::any::type_name::<I>());
        debug!(%type_name, "unsupported linked list index type");
        Err(ListError::InvalidIndexType { type_name })
    }

    pub fn pop(&mut self) -> Result<T> {
        match self.head.take() {
            Some(node) => {
                self.head = node.link;
                trace!("popped linked list head");
                Ok(node.value)
            }
            None => {
                debug!("pop from empty linked list");
                Err(ListError::OutOfRange { op: "pop" })
            }
        }
    }

    pub fn push(&mut self, value: T) {
        let mut node = Box::new(Node::new(value));
        node.link = self.head.take();
        self.head = Some(node);
        trace!("pushed linked list head");
    }

    /// Positions count from the head whatever `from` is. Positions past `to`
    /// are excluded from matching but the walk still runs to the end.
    pub fn index_of(&self, x: &T, from: usize, to: Option<usize>) -> Result<usize>
    where
        T: PartialEq + Debug,
    {
        self.iter()
            .enumerate()
            .filter(|&(position, _)| position >= from && to.map_or(true, |to| position <= to))
            .find(|&(_, value)| value == x)
            .map(|(position, _)| position)
            .ok_or_else(|| {
                debug!(from, ?to, "value not found in linked list");
                ListError::ValueNotFound {
                    value: format!("{:?}", x),
                }
            })
    }

    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|value| value == x)
    }
}

fn as_integer(index: &dyn Any) -> Option<i128> {
    macro_rules! downcast_integer {
        ($($ty:ty),*) => {
            $(
                if let Some(i) = index.downcast_ref::<$ty>() {
                    return Some(widen(*i));
                }
            )*
        };
    }
    downcast_integer!(i32, usize, isize, i64, u64, u32, i16, u16, i8, u8, i128, u128);
    None
}

// `u128` values past `i128::MAX` are out of range anyway.
fn widen<N>(n: N) -> i128
where
    i128: TryFrom<N>,
{
    i128::try_from(n).unwrap_or(i128::MAX)
}

fn narrow(n: i128) -> isize {
    isize::try_from(n).unwrap_or(if n < 0 { isize::MIN } else { isize::MAX })
}

fn as_slice_spec(index: &dyn Any) -> Option<SliceSpec> {
    if let Some(spec) = index.downcast_ref::<SliceSpec>() {
        return Some(*spec);
    }
    if index.is::<RangeFull>() {
        return Some(SliceSpec::default());
    }
    macro_rules! downcast_range {
        ($($ty:ty),*) => {
            $(
                if let Some(range) = index.downcast_ref::<Range<$ty>>() {
                    let start = narrow(widen(range.start));
                    return Some(SliceSpec::new(Some(start), Some(narrow(widen(range.end)))));
                }
                if let Some(range) = index.downcast_ref::<RangeInclusive<$ty>>() {
                    let start = narrow(widen(*range.start()));
                    let stop = narrow(widen(*range.end()).saturating_add(1));
                    return Some(SliceSpec::new(Some(start), Some(stop)));
                }
                if let Some(range) = index.downcast_ref::<RangeFrom<$ty>>() {
                    return Some(SliceSpec::new(Some(narrow(widen(range.start))), None));
                }
                if let Some(range) = index.downcast_ref::<RangeTo<$ty>>() {
                    return Some(SliceSpec::new(None, Some(narrow(widen(range.end)))));
                }
                if let Some(range) = index.downcast_ref::<RangeToInclusive<$ty>>() {
                    let stop = narrow(widen(range.end).saturating_add(1));
                    return Some(SliceSpec::new(None, Some(stop)));
                }
            )*
        };
    }
    downcast_range!(i32, usize, isize, i64, u64, u32, i16, u16, i8, u8, i128, u128);
    None
}

// `alloc::string::String` -> `String`, keeping leading `&` and generic arguments.
fn short_type_name(name: &str) -> String {
    let path = name.trim_start_matches('&');
    let refs = &name[..name.len() - path.len()];
    let path_end = path.find('<').unwrap_or(path.len());
    let short = match path[..path_end].rfind("::") {
        Some(sep) => &path[sep + 2..],
        None => path,
    };
    format!("{}{}", refs, short)
}

impl<T> Default for LinkedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for LinkedList<T> {
    // Unlink one node at a time instead of letting the boxes drop recursively.
    fn drop(&mut self) {
        let mut link = self.head.take();
        while let Some(mut node) = link {
            link = node.link.take();
        }
    }
}

impl<T> FromIterator<T> for LinkedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        let mut tail = &mut list.head;
        let mut count = 0usize;
        for value in iter {
            tail = &mut tail.insert(Box::new(Node::new(value))).link;
            count += 1;
        }
        debug!(count, "built linked list");
        list
    }
}

impl<T> From<Vec<T>> for LinkedList<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<T, const N: usize> From<[T; N]> for LinkedList<T> {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

impl<T: Clone> Clone for LinkedList<T> {
    fn clone(&self) -> Self {
        self.iter().cloned().collect()
    }
}

impl<T: PartialEq> PartialEq for LinkedList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for LinkedList<T> {}

impl<T: Debug> Debug for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LinkedList(")?;
        f.debug_list().entries(self.iter()).finish()?;
        f.write_str(")")
    }
}

impl<T: Display> Display for LinkedList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LinkedList([")?;
        for (position, value) in self.iter().enumerate() {
            if position > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("])")
    }
}

impl<'a, T> IntoIterator for &'a LinkedList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for LinkedList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter(self)
    }
}

pub struct Nodes<'a, T> {
    next: Option<&'a Node<T>>,
}

impl<T> Clone for Nodes<'_, T> {
    fn clone(&self) -> Self {
        Self { next: self.next }
    }
}

impl<'a, T> Iterator for Nodes<'a, T> {
    type Item = &'a Node<T>;

    fn next(&mut self) -> Option<&'a Node<T>> {
        self.next.map(|node| {
            self.next = node.link.as_deref();
            node
        })
    }
}

pub struct Iter<'a, T> {
    nodes: Nodes<'a, T>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.nodes.next().map(|node| &node.value)
    }
}

pub struct IntoIter<T>(LinkedList<T>);

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.0.head.take().map(|node| {
            self.0.head = node.link;
            node.value
        })
    }
}

/// `None` bounds default to start `0`, end of list and step `1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceSpec {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl SliceSpec {
    pub fn new(start: Option<isize>, stop: Option<isize>) -> Self {
        Self {
            start,
            stop,
            step: None,
        }
    }

    pub fn with_step(self, step: isize) -> Self {
        Self {
            step: Some(step),
            ..self
        }
    }
}

impl From<Range<usize>> for SliceSpec {
    fn from(range: Range<usize>) -> Self {
        Self::new(Some(narrow(widen(range.start))), Some(narrow(widen(range.end))))
    }
}

impl From<RangeFrom<usize>> for SliceSpec {
    fn from(range: RangeFrom<usize>) -> Self {
        Self::new(Some(narrow(widen(range.start))), None)
    }
}

impl From<RangeTo<usize>> for SliceSpec {
    fn from(range: RangeTo<usize>) -> Self {
        Self::new(None, Some(narrow(widen(range.end))))
    }
}

impl From<RangeFull> for SliceSpec {
    fn from(_: RangeFull) -> Self {
        Self::default()
    }
}

pub struct Slice<'a, T> {
    values: Iter<'a, T>,
    // Position of the next value `values` would yield.
    position: usize,
    pick: usize,
    stop: Option<usize>,
    step: usize,
    done: bool,
}

impl<'a, T> Slice<'a, T> {
    fn new(values: Iter<'a, T>, spec: SliceSpec) -> Self {
        let start = usize::try_from(spec.start.unwrap_or(0)).ok();
        let stop = spec.stop.map(usize::try_from).transpose().ok();
        let step = usize::try_from(spec.step.unwrap_or(1))
            .ok()
            .filter(|step| *step > 0);
        match (start, stop, step) {
            (Some(start), Some(stop), Some(step)) => Self {
                values,
                position: 0,
                pick: start,
                stop,
                step,
                done: false,
            },
            _ => {
                debug!(?spec, "slice needs backward traversal, yielding nothing");
                Self {
                    values,
                    position: 0,
                    pick: 0,
                    stop: None,
                    step: 1,
                    done: true,
                }
            }
        }
    }
}

impl<T> Clone for Slice<'_, T> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            position: self.position,
            pick: self.pick,
            stop: self.stop,
            step: self.step,
            done: self.done,
        }
    }
}

impl<'a, T> Iterator for Slice<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.done || self.stop.is_some_and(|stop| self.pick >= stop) {
            self.done = true;
            return None;
        }
        let Some(value) = self.values.nth(self.pick - self.position) else {
            self.done = true;
            return None;
        };
        self.position = self.pick + 1;
        match self.pick.checked_add(self.step) {
            Some(pick) => self.pick = pick,
            None => self.done = true,
        }
        Some(value)
    }
}

pub enum Subscript<'a, T> {
    Item(&'a T),
    Slice(Slice<'a, T>),
}

impl<'a, T> Subscript<'a, T> {
    pub fn item(self) -> Option<&'a T> {
        match self {
            Subscript::Item(value) => Some(value),
            Subscript::Slice(_) => None,
        }
    }

    pub fn slice(self) -> Option<Slice<'a, T>> {
        match self {
            Subscript::Item(_) => None,
            Subscript::Slice(slice) => Some(slice),
        }
    }
}

impl<T: Debug> Debug for Subscript<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subscript::Item(value) => f.debug_tuple("Item").field(value).finish(),
            Subscript::Slice(slice) => f
                .debug_tuple("Slice")
                .field(&slice.clone().collect::<Vec<_>>())
                .finish(),
        }
    }
}
