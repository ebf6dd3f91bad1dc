use std::cmp::Ordering;
use std::fmt;
use std::ops::{Bound, Range, RangeBounds};

use log::{debug, trace};

use super::cow::{CowClone, CowPtr};
use crate::error::{Error, Result};
use crate::model::Partial;

impl CowClone for Vec<Partial> {
    fn cow_clone(&self) -> Self {
        debug!("cloning list of {} partials", self.len());
        self.clone()
    }
}

/// Ordered collection of partials with copy-on-write sharing.
///
/// Cloning an `EnvelopeList` is cheap: both lists point at the same backing
/// sequence until one of them calls a `&mut self` method, at which point
/// that one takes a private copy. Iterators borrow the list, so a clone
/// event can never invalidate a live iterator.
#[derive(Clone)]
pub struct EnvelopeList {
    list: CowPtr<Vec<Partial>>,
}

impl EnvelopeList {
    pub fn new() -> Self {
        Self {
            list: CowPtr::new(Vec::new()),
        }
    }

    /// Deep-copy `partials` into a brand-new, unshared list.
    pub fn from_partials(partials: &[Partial]) -> Self {
        Self {
            list: CowPtr::new(partials.to_vec()),
        }
    }

    pub fn as_slice(&self) -> &[Partial] {
        self.list.get().map(Vec::as_slice).unwrap_or_default()
    }

    // Every `&mut self` operation goes through here, which is where a shared
    // backing sequence gets copied.
    fn partials_mut(&mut self) -> &mut Vec<Partial> {
        self.list.get_or_insert_with(Vec::new)
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// True while another list still shares this one's backing sequence.
    pub fn is_shared(&self) -> bool {
        self.list.use_count() > 1
    }

    /// True when both lists currently read the same backing sequence.
    pub fn shares_storage_with(&self, other: &EnvelopeList) -> bool {
        self.list.ptr_eq(&other.list)
    }

    pub fn front(&self) -> Option<&Partial> {
        self.as_slice().first()
    }

    pub fn back(&self) -> Option<&Partial> {
        self.as_slice().last()
    }

    pub fn front_mut(&mut self) -> Option<&mut Partial> {
        self.partials_mut().first_mut()
    }

    pub fn back_mut(&mut self) -> Option<&mut Partial> {
        self.partials_mut().last_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Partial> {
        self.as_slice().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Partial> {
        self.partials_mut().get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Partial> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Partial> {
        self.partials_mut().iter_mut()
    }

    pub fn push_back(&mut self, partial: Partial) {
        self.partials_mut().push(partial);
    }

    pub fn push_front(&mut self, partial: Partial) {
        self.partials_mut().insert(0, partial);
    }

    /// Insert before `index`.
    ///
    /// # Panics
    /// If `index > len`.
    pub fn insert(&mut self, index: usize, partial: Partial) {
        self.partials_mut().insert(index, partial);
    }

    /// Insert every partial from `partials` before `index`, in order.
    ///
    /// # Panics
    /// If `index > len`.
    pub fn insert_range<I: IntoIterator<Item = Partial>>(&mut self, index: usize, partials: I) {
        self.partials_mut().splice(index..index, partials);
    }

    /// Remove and return the partial at `index`.
    ///
    /// # Panics
    /// If `index >= len`.
    pub fn erase(&mut self, index: usize) -> Partial {
        self.partials_mut().remove(index)
    }

    /// Remove the partials in `range`.
    ///
    /// # Panics
    /// If the range is out of bounds.
    pub fn erase_range<R: RangeBounds<usize>>(&mut self, range: R) {
        self.partials_mut().drain(range);
    }

    /// Forget every partial by rebinding to a fresh empty sequence. A shared
    /// sequence is left to its other owners, never copied.
    pub fn clear(&mut self) {
        trace!("clear: releasing {} partials", self.len());
        self.list.rebind(Vec::new());
    }

    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&Partial, &Partial) -> Ordering,
    {
        self.partials_mut().sort_by(compare);
    }

    /// Keep only the partials for which `keep` returns true, in order.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Partial) -> bool,
    {
        self.partials_mut().retain(keep);
    }

    /// Move the partials in `range` out of this list into a new one.
    ///
    /// Partials are moved, not copied, and keep their relative order. An
    /// out-of-bounds or reversed range is rejected before anything changes.
    ///
    /// The backing sequence is contiguous, so the partials after `range`
    /// shift down: O(len) moves, not a constant-time relink. Each move is a
    /// partial's header only; breakpoint data stays where it is.
    pub fn extract<R: RangeBounds<usize>>(&mut self, range: R) -> Result<EnvelopeList> {
        let range = checked_range(&range, self.len())?;
        trace!("extract: moving partials {}..{}", range.start, range.end);

        let moved: Vec<Partial> = self.partials_mut().drain(range).collect();
        Ok(Self {
            list: CowPtr::new(moved),
        })
    }

    /// Move every partial of `other` into this list before `index`.
    pub fn splice_all(&mut self, index: usize, other: &mut EnvelopeList) -> Result<()> {
        checked_position(index, self.len())?;
        let taken = std::mem::replace(&mut other.list, CowPtr::new(Vec::new()));
        let moved = taken.into_owned().unwrap_or_default();
        trace!("splice: moving {} partials to {index}", moved.len());

        self.partials_mut().splice(index..index, moved);
        Ok(())
    }

    /// Move the partial at `from` in `other` into this list before `index`.
    pub fn splice_one(&mut self, index: usize, other: &mut EnvelopeList, from: usize) -> Result<()> {
        checked_position(index, self.len())?;
        checked_range(&(from..=from), other.len())?;
        trace!("splice: moving partial {from} to {index}");

        let partial = other.partials_mut().remove(from);
        self.partials_mut().insert(index, partial);
        Ok(())
    }

    /// Move the partials in `range` of `other` into this list before `index`.
    pub fn splice_range<R: RangeBounds<usize>>(
        &mut self,
        index: usize,
        other: &mut EnvelopeList,
        range: R,
    ) -> Result<()> {
        checked_position(index, self.len())?;
        let mut moved = other.extract(range)?;
        self.splice_all(index, &mut moved)
    }
}

fn checked_position(index: usize, len: usize) -> Result<()> {
    if index > len {
        return Err(Error::invalid_range(index, index, len));
    }
    Ok(())
}

fn checked_range<R: RangeBounds<usize>>(range: &R, len: usize) -> Result<Range<usize>> {
    let start = match range.start_bound() {
        Bound::Included(&s) => s,
        Bound::Excluded(&s) => s.checked_add(1).ok_or(Error::invalid_range(s, s, len))?,
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&e) => e.checked_add(1).ok_or(Error::invalid_range(start, e, len))?,
        Bound::Excluded(&e) => e,
        Bound::Unbounded => len,
    };

    if start > end || end > len {
        return Err(Error::invalid_range(start, end, len));
    }
    Ok(start..end)
}

impl Default for EnvelopeList {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for EnvelopeList {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl fmt::Debug for EnvelopeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl FromIterator<Partial> for EnvelopeList {
    fn from_iter<I: IntoIterator<Item = Partial>>(iter: I) -> Self {
        Self {
            list: CowPtr::new(iter.into_iter().collect()),
        }
    }
}

impl Extend<Partial> for EnvelopeList {
    fn extend<I: IntoIterator<Item = Partial>>(&mut self, iter: I) {
        self.partials_mut().extend(iter);
    }
}

impl<'a> IntoIterator for &'a EnvelopeList {
    type Item = &'a Partial;
    type IntoIter = std::slice::Iter<'a, Partial>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &'a mut EnvelopeList {
    type Item = &'a mut Partial;
    type IntoIter = std::slice::IterMut<'a, Partial>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl IntoIterator for EnvelopeList {
    type Item = Partial;
    type IntoIter = std::vec::IntoIter<Partial>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_owned().unwrap_or_default().into_iter()
    }
}
