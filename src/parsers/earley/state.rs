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

use {
  crate::utils::OrderedSet,
  im::Vector,
  std::collections::{hash_map, HashMap},
};

/// The production an Earley item is working through.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ProdRef {
  /// The pseudo-production `Start -> S` that seeds the chart.
  Start,
  /// The grammar rule with the given index.
  Rule(usize),
}

impl ProdRef {
  pub fn rule_index(&self) -> Option<usize> {
    match self {
      ProdRef::Start => None,
      ProdRef::Rule(i) => Some(*i),
    }
  }
}

/// Identifies an Earley item: the symbols `[0, dot)` of `prod` have matched
/// the input between `origin` and `end`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateKey {
  prod: ProdRef,
  dot: usize,
  origin: usize,
  end: usize,
}

impl StateKey {
  pub fn from_prod_start(prod: ProdRef, index: usize) -> Self {
    StateKey {
      prod,
      dot: 0,
      origin: index,
      end: index,
    }
  }

  /// The completed start item for an input of `len` positions.
  pub fn accepting(len: usize) -> Self {
    StateKey {
      prod: ProdRef::Start,
      dot: 1,
      origin: 0,
      end: len,
    }
  }

  pub fn prod(&self) -> ProdRef {
    self.prod
  }

  pub fn dot(&self) -> usize {
    self.dot
  }

  pub fn origin(&self) -> usize {
    self.origin
  }

  pub fn end(&self) -> usize {
    self.end
  }

  fn advance_to(&self, end: usize) -> Self {
    StateKey {
      dot: self.dot + 1,
      end,
      ..*self
    }
  }
}

/// An Earley item together with its justification: one completed item per
/// variable consumed so far, left to right.
#[derive(Clone, Debug)]
pub struct EarleyState {
  key: StateKey,
  value: Vector<StateKey>,
}

impl EarleyState {
  pub fn from_prod_start(prod: ProdRef, index: usize) -> Self {
    EarleyState {
      key: StateKey::from_prod_start(prod, index),
      value: Vector::new(),
    }
  }

  pub fn key(&self) -> &StateKey {
    &self.key
  }

  pub fn value(&self) -> &Vector<StateKey> {
    &self.value
  }

  /// Moves the dot past a terminal ending at `end`.
  pub fn scan_to(&self, end: usize) -> Self {
    EarleyState {
      key: self.key.advance_to(end),
      value: self.value.clone(),
    }
  }

  /// Moves the dot past a variable, justified by the completed item
  /// `completed`.
  pub fn complete_with(&self, completed: &StateKey) -> Self {
    EarleyState {
      key: self.key.advance_to(completed.end),
      value: self.create_next_value(*completed),
    }
  }

  fn create_next_value(&self, completed: StateKey) -> Vector<StateKey> {
    let mut value = self.value.clone();
    value.push_back(completed);
    value
  }
}

/// The items ending at one input position, in insertion order.
#[derive(Derivative, Default)]
#[derivative(Debug)]
pub struct EarleyStateSet {
  keys: OrderedSet<StateKey>,
  #[derivative(Debug = "ignore")]
  values: HashMap<StateKey, Vector<StateKey>>,
}

impl EarleyStateSet {
  pub fn new() -> Self {
    EarleyStateSet::default()
  }

  pub fn len(&self) -> usize {
    self.keys.len()
  }

  pub fn is_empty(&self) -> bool {
    self.keys.is_empty()
  }

  pub fn contains(&self, key: &StateKey) -> bool {
    self.keys.contains(key)
  }

  /// Returns the item inserted `index`-th.
  pub fn get(&self, index: usize) -> Option<EarleyState> {
    let key = self.keys.get(index)?;
    self.values.get(key).map(|value| EarleyState {
      key: *key,
      value: value.clone(),
    })
  }

  pub fn keys(&self) -> impl Iterator<Item = &StateKey> {
    self.keys.iter()
  }

  pub fn value_of(&self, key: &StateKey) -> Option<&Vector<StateKey>> {
    self.values.get(key)
  }

  /// Adds an item. Returns false if an item with the same key is already
  /// present; the justification recorded first is kept.
  pub fn insert(&mut self, state: EarleyState) -> bool {
    match self.values.entry(state.key) {
      hash_map::Entry::Vacant(vac) => {
        vac.insert(state.value);
        self.keys.insert(state.key);
        true
      }
      hash_map::Entry::Occupied(_) => false,
    }
  }
}
