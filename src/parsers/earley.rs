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

//! An Earley parser for any grammar.
//!
//! Input positions are extended grapheme clusters. A terminal matches when
//! its own graphemes are the next graphemes of the input, and the scanned
//! item ends after all of them, so multi-character terminals such as `'let'`
//! consume their whole length. An empty terminal matches without consuming
//! anything.
//!
//! Each item records, for every variable it has moved past, the completed
//! item that justified it. Only the first justification found is kept, so
//! for an ambiguous input the derivation returned is the one the rule order
//! of the grammar reaches first.

mod graph;
mod state;

pub use self::state::{EarleyState, EarleyStateSet, ProdRef, StateKey};

use {
  crate::{
    grammar::{Expr, Grammar, Symbol, Terminal, Variable},
    parsers::{ParseError, Parser},
    utils::graphemes,
  },
  std::fmt::Write,
};

#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub struct EarleyParser<'g> {
  #[derivative(Debug = "ignore")]
  grammar: &'g Grammar,
}

impl<'g> EarleyParser<'g> {
  pub fn new(grammar: &'g Grammar) -> Self {
    EarleyParser { grammar }
  }

  /// Fills the chart for `input`. The chart can be inspected whether or not
  /// the input was accepted.
  pub fn chart(&self, input: &str) -> Chart<'g> {
    let input = graphemes(input);
    let mut chart = Chart::new(self.grammar, input.len());
    log::debug!("earley: parsing {} positions", input.len());
    chart.fill(&input);
    if chart.is_accepted() {
      log::debug!("earley: accepted");
    } else {
      log::debug!(
        "earley: rejected at {} of {}",
        chart.furthest_position(),
        chart.input_len()
      );
    }
    chart
  }
}

impl<'g> Parser for EarleyParser<'g> {
  fn parse(&self, input: &str) -> Result<Vec<usize>, ParseError> {
    self.chart(input).derivation()
  }
}

/// The Earley item sets for one input, one per position.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct Chart<'g> {
  #[derivative(Debug = "ignore")]
  grammar: &'g Grammar,
  start_expr: Expr,
  input_len: usize,
  sets: Vec<EarleyStateSet>,
}

impl<'g> Chart<'g> {
  fn new(grammar: &'g Grammar, input_len: usize) -> Self {
    let start_expr =
      Expr::new(vec![Symbol::NonTerm(grammar.start_variable().clone())]);
    let mut start_set = EarleyStateSet::new();
    start_set.insert(EarleyState::from_prod_start(ProdRef::Start, 0));

    Chart {
      grammar,
      start_expr,
      input_len,
      sets: vec![start_set],
    }
  }

  pub fn grammar(&self) -> &'g Grammar {
    self.grammar
  }

  /// The number of chart positions reached. An accepted chart has one more
  /// position than the input has graphemes.
  pub fn len(&self) -> usize {
    self.sets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.sets.is_empty()
  }

  /// The input length in graphemes.
  pub fn input_len(&self) -> usize {
    self.input_len
  }

  pub fn set(&self, position: usize) -> Option<&EarleyStateSet> {
    self.sets.get(position)
  }

  /// The right-hand side of `prod`.
  pub fn expr(&self, prod: ProdRef) -> &Expr {
    match prod {
      ProdRef::Start => &self.start_expr,
      ProdRef::Rule(i) => self.grammar.rules()[i].expr(),
    }
  }

  /// The variable `prod` recognizes. `None` for the start pseudo-production.
  pub fn head(&self, prod: ProdRef) -> Option<&'g Variable> {
    prod
      .rule_index()
      .map(|i| self.grammar.rules()[i].variable())
  }

  pub fn next_symbol(&self, key: &StateKey) -> Option<&Symbol> {
    self.expr(key.prod()).get(key.dot())
  }

  pub fn is_complete(&self, key: &StateKey) -> bool {
    key.dot() == self.expr(key.prod()).len()
  }

  /// The completed start item covering the whole input.
  pub fn accepted_key(&self) -> StateKey {
    StateKey::accepting(self.input_len)
  }

  pub fn is_accepted(&self) -> bool {
    self.sets.len() == self.input_len + 1
      && self
        .sets
        .last()
        .map_or(false, |set| set.contains(&self.accepted_key()))
  }

  /// The last position holding any item.
  pub fn furthest_position(&self) -> usize {
    self
      .sets
      .iter()
      .rposition(|set| !set.is_empty())
      .unwrap_or(0)
  }

  fn rejection(&self) -> ParseError {
    ParseError::Rejected {
      reached: self.furthest_position(),
      length: self.input_len,
    }
  }

  fn insert(&mut self, position: usize, state: EarleyState) {
    while self.sets.len() <= position {
      self.sets.push(EarleyStateSet::new());
    }
    let key = *state.key();
    if self.sets[position].insert(state) {
      log::trace!("earley: add at {}: {}", position, self.describe(&key));
    }
  }

  /// Sweeps positions left to right. Each position's set is walked by index
  /// so that items added to it while walking are processed too.
  fn fill(&mut self, input: &[&str]) {
    let mut k = 0;
    while k < self.sets.len() {
      let mut i = 0;
      loop {
        let state = match self.sets[k].get(i) {
          Some(state) => state,
          None => break,
        };
        i += 1;
        match self.next_symbol(state.key()).cloned() {
          None => self.complete(k, &state),
          Some(Symbol::Term(term)) => self.scan(input, k, &state, &term),
          Some(Symbol::NonTerm(var)) => self.predict(k, &state, &var),
        }
      }
      k += 1;
    }
  }

  fn predict(&mut self, k: usize, state: &EarleyState, var: &Variable) {
    for &rule in self.grammar.production_indices(var) {
      self.insert(k, EarleyState::from_prod_start(ProdRef::Rule(rule), k));
    }

    // A variable that already completed empty at this position will not
    // complete again, so advance over it now.
    let empty_completions: Vec<StateKey> = self.sets[k]
      .keys()
      .filter(|key| key.origin() == k && self.is_complete(key))
      .filter(|key| self.head(key.prod()) == Some(var))
      .cloned()
      .collect();
    for completed in empty_completions {
      self.insert(k, state.complete_with(&completed));
    }
  }

  fn scan(
    &mut self,
    input: &[&str],
    k: usize,
    state: &EarleyState,
    term: &Terminal,
  ) {
    let term_graphemes = graphemes(term.text());
    if input[k..].starts_with(&term_graphemes) {
      let end = k + term_graphemes.len();
      self.insert(end, state.scan_to(end));
    }
  }

  fn complete(&mut self, k: usize, state: &EarleyState) {
    let head = match self.head(state.key().prod()) {
      Some(head) => head,
      None => return,
    };

    let origin = state.key().origin();
    let waiting: Vec<EarleyState> = (0..self.sets[origin].len())
      .filter_map(|i| self.sets[origin].get(i))
      .filter(|waiting| match self.next_symbol(waiting.key()) {
        Some(Symbol::NonTerm(var)) => var == head,
        _ => false,
      })
      .collect();

    for waiting in waiting {
      self.insert(k, waiting.complete_with(state.key()));
    }
  }

  fn value_of(
    &self,
    key: &StateKey,
  ) -> Result<&im::Vector<StateKey>, ParseError> {
    self
      .sets
      .get(key.end())
      .and_then(|set| set.value_of(key))
      .ok_or_else(|| {
        ParseError::CorruptChart(format!(
          "no item {} at {}",
          self.describe(key),
          key.end()
        ))
      })
  }

  /// The justifications of `key`, checked to cover every variable of its
  /// production.
  pub fn children(
    &self,
    key: &StateKey,
  ) -> Result<Vec<StateKey>, ParseError> {
    let value = self.value_of(key)?;
    let expected = self.expr(key.prod()).nonterms().count();
    if value.len() != expected {
      return Err(ParseError::CorruptChart(format!(
        "{} has {} justifications for {} variables",
        self.describe(key),
        value.len(),
        expected
      )));
    }
    Ok(value.iter().cloned().collect())
  }

  /// Extracts the leftmost derivation of an accepted chart.
  ///
  /// Walks the justification graph from the accepted item in pre-order:
  /// an item's rule comes before the rules of the items that justify its
  /// variables, which are visited left to right.
  pub fn derivation(&self) -> Result<Vec<usize>, ParseError> {
    if !self.is_accepted() {
      return Err(self.rejection());
    }

    let mut derivation = Vec::new();
    let mut stack = vec![self.accepted_key()];
    while let Some(key) = stack.pop() {
      derivation.extend(key.prod().rule_index());
      stack.extend(self.children(&key)?.into_iter().rev());
    }

    Ok(derivation)
  }

  /// Describes an item as a dotted rule with its span.
  pub fn describe(&self, key: &StateKey) -> String {
    let mut out = String::new();
    match self.head(key.prod()) {
      Some(head) => out.push_str(head.name()),
      None => out.push_str("Start"),
    }
    out.push_str(" ->");
    let expr = self.expr(key.prod());
    for (i, sym) in expr.iter().enumerate() {
      if i == key.dot() {
        out.push_str(" •");
      }
      let _ = write!(out, " {}", sym);
    }
    if key.dot() == expr.len() {
      out.push_str(" •");
    }
    let _ = write!(out, " [{}, {}]", key.origin(), key.end());
    out
  }
}
