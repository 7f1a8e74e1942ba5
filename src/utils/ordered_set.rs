// Copyright 2019 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{collections::HashMap, fmt::Debug, hash::Hash, ops::Index};

/// A sequence of unique values that remembers insertion order.
///
/// Iteration (and indexing) always follows the order in which values were
/// first inserted. Inserting a value that is already present is a no-op.
#[derive(Clone)]
pub struct OrderedSet<T> {
  index_map: HashMap<T, usize>,
  data: Vec<T>,
}

impl<T> OrderedSet<T> {
  pub fn new() -> Self {
    OrderedSet {
      index_map: HashMap::new(),
      data: Vec::new(),
    }
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  /// Returns the value at the given insertion index.
  pub fn get(&self, index: usize) -> Option<&T> {
    self.data.get(index)
  }

  pub fn iter(&self) -> std::slice::Iter<T> {
    self.data.iter()
  }

  pub fn as_slice(&self) -> &[T] {
    &self.data
  }
}

impl<T> OrderedSet<T>
where
  T: Hash + Eq + Clone,
{
  /// Appends a value to the end of the set. Returns false if the value was
  /// already present, in which case the set is unchanged.
  pub fn insert(&mut self, value: T) -> bool {
    if self.index_map.contains_key(&value) {
      return false;
    }
    self.index_map.insert(value.clone(), self.data.len());
    self.data.push(value);
    true
  }

  pub fn contains(&self, value: &T) -> bool {
    self.index_map.contains_key(value)
  }

  /// Returns the insertion index of the value, if present.
  pub fn index_of(&self, value: &T) -> Option<usize> {
    self.index_map.get(value).copied()
  }

  /// Removes a value, preserving the relative order of the remaining values.
  /// Returns false if the value was not present.
  pub fn remove(&mut self, value: &T) -> bool {
    match self.index_map.remove(value) {
      Some(index) => {
        self.data.remove(index);
        for shifted in &self.data[index..] {
          if let Some(i) = self.index_map.get_mut(shifted) {
            *i -= 1;
          }
        }
        true
      }
      None => false,
    }
  }
}

impl<T> Default for OrderedSet<T> {
  fn default() -> Self {
    OrderedSet::new()
  }
}

impl<T> Index<usize> for OrderedSet<T> {
  type Output = T;

  fn index(&self, index: usize) -> &T {
    &self.data[index]
  }
}

impl<T> PartialEq for OrderedSet<T>
where
  T: PartialEq,
{
  fn eq(&self, other: &Self) -> bool {
    self.data == other.data
  }
}

impl<T> Eq for OrderedSet<T> where T: Eq {}

impl<T> std::iter::FromIterator<T> for OrderedSet<T>
where
  T: Hash + Eq + Clone,
{
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut set = OrderedSet::new();
    for value in iter {
      set.insert(value);
    }
    set
  }
}

impl<'a, T> IntoIterator for &'a OrderedSet<T> {
  type Item = &'a T;
  type IntoIter = std::slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.data.iter()
  }
}

impl<T> Debug for OrderedSet<T>
where
  T: Debug,
{
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    f.debug_set().entries(self.data.iter()).finish()
  }
}
