// Copyright 2018 Google LLC
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

pub mod builder;
mod element_types;

use {
  crate::utils::{OrderedSet, ToDoc},
  std::{collections::BTreeMap, fmt::Debug},
};

pub use element_types::{Terminal, Variable};

/// A single symbol (terminal or variable reference).
#[derive(Clone, Ord, PartialOrd, Eq, PartialEq, Hash)]
pub enum Symbol {
  Term(Terminal),
  NonTerm(Variable),
}

impl Symbol {
  /// Shorthand for a terminal symbol with the given text.
  pub fn term(text: &str) -> Self {
    Symbol::Term(Terminal::new(text))
  }

  /// Shorthand for a reference to the given variable.
  pub fn nonterm(name: &str) -> Self {
    Symbol::NonTerm(Variable::new(name))
  }

  /// If this symbol is a terminal, returns a `Some` value containing the
  /// terminal. Returns `None` otherwise.
  pub fn as_term(&self) -> Option<&Terminal> {
    match self {
      Symbol::NonTerm(_) => None,
      Symbol::Term(t) => Some(t),
    }
  }

  /// Gets a symbol as a variable reference. Returns a `None` value otherwise.
  pub fn as_nonterm(&self) -> Option<&Variable> {
    match self {
      Symbol::NonTerm(v) => Some(v),
      Symbol::Term(_) => None,
    }
  }
}

impl ToDoc for Symbol {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    match self {
      Symbol::NonTerm(v) => v.to_doc(da),
      Symbol::Term(t) => t.to_doc(da),
    }
  }
}

impl std::fmt::Display for Symbol {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Symbol::Term(t) => std::fmt::Display::fmt(t, fmt),
      Symbol::NonTerm(v) => std::fmt::Display::fmt(v, fmt),
    }
  }
}

impl Debug for Symbol {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    match self {
      Symbol::Term(t) => write!(fmt, "{}", t),
      Symbol::NonTerm(v) => write!(fmt, "<{}>", v),
    }
  }
}

impl From<Terminal> for Symbol {
  fn from(t: Terminal) -> Symbol {
    Symbol::Term(t)
  }
}

impl From<Variable> for Symbol {
  fn from(v: Variable) -> Symbol {
    Symbol::NonTerm(v)
  }
}

/// The right-hand side of a rule: an ordered, possibly empty, sequence of
/// symbols.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Expr(Vec<Symbol>);

impl Expr {
  pub fn new(symbols: Vec<Symbol>) -> Self {
    Expr(symbols)
  }

  /// The empty (epsilon) expression.
  pub fn empty() -> Self {
    Expr(Vec::new())
  }

  pub fn symbols(&self) -> &[Symbol] {
    &self.0
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&Symbol> {
    self.0.get(index)
  }

  pub fn iter(&self) -> std::slice::Iter<Symbol> {
    self.0.iter()
  }

  pub fn terms(&self) -> impl Iterator<Item = &Terminal> {
    self.0.iter().filter_map(Symbol::as_term)
  }

  pub fn nonterms(&self) -> impl Iterator<Item = &Variable> {
    self.0.iter().filter_map(Symbol::as_nonterm)
  }

  /// Returns the position and name of the leftmost variable reference.
  pub fn leftmost_variable(&self) -> Option<(usize, &Variable)> {
    self
      .0
      .iter()
      .enumerate()
      .find_map(|(i, sym)| sym.as_nonterm().map(|v| (i, v)))
  }

  /// Expands the leftmost variable reference with the body of `rule`.
  ///
  /// The rule must be a rule for that variable. The reference is replaced in
  /// place by the rule's symbols. On failure the expression is unchanged.
  pub fn apply_rule_leftmost(
    &mut self,
    rule: &Rule,
  ) -> Result<(), DerivationError> {
    let index = match self.leftmost_variable() {
      Some((index, v)) if v == rule.variable() => index,
      found => {
        return Err(DerivationError::RuleMismatch {
          step: 0,
          expected: rule.variable().clone(),
          found: found.map(|(_, v)| v.clone()),
        })
      }
    };

    self
      .0
      .splice(index..index + 1, rule.expr().iter().cloned());
    Ok(())
  }
}

impl From<Vec<Symbol>> for Expr {
  fn from(symbols: Vec<Symbol>) -> Expr {
    Expr(symbols)
  }
}

impl std::iter::FromIterator<Symbol> for Expr {
  fn from_iter<I: IntoIterator<Item = Symbol>>(iter: I) -> Self {
    Expr(iter.into_iter().collect())
  }
}

impl<'a> IntoIterator for &'a Expr {
  type Item = &'a Symbol;
  type IntoIter = std::slice::Iter<'a, Symbol>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.iter()
  }
}

impl ToDoc for Expr {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    if self.0.is_empty() {
      da.text("ε")
    } else {
      da.intersperse(self.0.iter().map(|e| e.to_doc(da)), da.softline())
    }
  }
}

impl std::fmt::Display for Expr {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    if self.0.is_empty() {
      return fmt.write_str("ε");
    }
    for (i, sym) in self.0.iter().enumerate() {
      if i > 0 {
        fmt.write_str(" ")?;
      }
      write!(fmt, "{}", sym)?;
    }
    Ok(())
  }
}

impl Debug for Expr {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    fmt.debug_list().entries(self.0.iter()).finish()
  }
}

/// A single production: a variable and the expression it may be replaced
/// with.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rule {
  variable: Variable,
  expr: Expr,
}

impl Rule {
  pub fn new(variable: impl Into<Variable>, expr: impl Into<Expr>) -> Self {
    Rule {
      variable: variable.into(),
      expr: expr.into(),
    }
  }

  /// Returns the head variable.
  pub fn variable(&self) -> &Variable {
    &self.variable
  }

  /// Returns the right-hand side.
  pub fn expr(&self) -> &Expr {
    &self.expr
  }

  pub fn is_empty(&self) -> bool {
    self.expr.is_empty()
  }
}

impl std::fmt::Display for Rule {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(fmt, "{} -> {}", self.variable, self.expr)
  }
}

impl Debug for Rule {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    let mut dbg_struct = fmt.debug_struct("Rule");
    dbg_struct.field("variable", &self.variable);
    dbg_struct.field("expr", &self.expr);
    dbg_struct.finish()
  }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
  #[error("a grammar needs at least one rule")]
  NoRules,
  #[error("variable `{0}` is referenced but has no rules")]
  UndefinedVariable(Variable),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DerivationError {
  #[error("rule index {index} is out of range for a grammar of {len} rules")]
  IndexOutOfRange { index: usize, len: usize },
  #[error(
    "step {step}: rule expands `{expected}` but the leftmost variable is {}",
    describe_found(.found)
  )]
  RuleMismatch {
    step: usize,
    expected: Variable,
    found: Option<Variable>,
  },
  #[error("derivation leaves {remaining} variable(s) unexpanded")]
  IncompleteDerivation { remaining: usize },
}

impl DerivationError {
  fn at_step(self, step: usize) -> Self {
    match self {
      DerivationError::RuleMismatch {
        expected, found, ..
      } => DerivationError::RuleMismatch {
        step,
        expected,
        found,
      },
      other => other,
    }
  }
}

fn describe_found(found: &Option<Variable>) -> String {
  match found {
    Some(v) => format!("`{}`", v),
    None => "missing".to_string(),
  }
}

/// A context-free grammar.
///
/// A grammar is an ordered list of rules. The position of a rule in that
/// list is its index, which is what leftmost derivations are written in. The
/// variable of rule 0 is the start variable.
///
/// The productions of each variable are kept in rule order. Earley
/// prediction walks them in that order, so the rule order given at
/// construction decides which derivation is found for an ambiguous input.
///
/// Grammars are read-only once built; transforms produce new grammars.
#[derive(Clone, PartialEq, Eq)]
pub struct Grammar {
  rules: Vec<Rule>,
  productions: BTreeMap<Variable, Vec<usize>>,
  variables: OrderedSet<Variable>,
  terminals: OrderedSet<Terminal>,
}

impl Debug for Grammar {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    let mut dbg_struct = f.debug_struct("Grammar");
    dbg_struct.field("Terms", &self.terminals);
    dbg_struct.field("Vars", &self.variables);
    dbg_struct.field("Rules", &self.rules);
    dbg_struct.finish()
  }
}

impl Grammar {
  /// Builds a grammar from a list of rules.
  ///
  /// Fails if the list is empty, or if a rule refers to a variable that has
  /// no rule of its own.
  pub fn new(
    rules: impl IntoIterator<Item = Rule>,
  ) -> Result<Self, GrammarError> {
    let rules: Vec<Rule> = rules.into_iter().collect();
    if rules.is_empty() {
      return Err(GrammarError::NoRules);
    }

    let mut productions: BTreeMap<Variable, Vec<usize>> = BTreeMap::new();
    let mut variables = OrderedSet::new();
    let mut terminals = OrderedSet::new();

    for (index, rule) in rules.iter().enumerate() {
      productions
        .entry(rule.variable.clone())
        .or_insert_with(Vec::new)
        .push(index);
      variables.insert(rule.variable.clone());
      for sym in rule.expr.iter() {
        match sym {
          Symbol::Term(t) => {
            terminals.insert(t.clone());
          }
          Symbol::NonTerm(v) => {
            variables.insert(v.clone());
          }
        }
      }
    }

    let g = Grammar {
      rules,
      productions,
      variables,
      terminals,
    };

    g.check_grammar().map(|_| g)
  }

  fn check_grammar(&self) -> Result<(), GrammarError> {
    match self
      .variables
      .iter()
      .find(|v| !self.productions.contains_key(*v))
    {
      Some(v) => Err(GrammarError::UndefinedVariable(v.clone())),
      None => Ok(()),
    }
  }

  /// Returns the start variable (the variable of rule 0).
  pub fn start_variable(&self) -> &Variable {
    &self.rules[0].variable
  }

  /// Returns all rules in index order.
  pub fn rules(&self) -> &[Rule] {
    &self.rules
  }

  pub fn rule_count(&self) -> usize {
    self.rules.len()
  }

  /// Returns the rule at the given index.
  pub fn rule_at(&self, index: usize) -> Result<&Rule, DerivationError> {
    self
      .rules
      .get(index)
      .ok_or(DerivationError::IndexOutOfRange {
        index,
        len: self.rules.len(),
      })
  }

  /// Returns the indices of the rules for `variable`, in rule order. Empty
  /// for an unknown variable.
  pub fn production_indices(&self, variable: &Variable) -> &[usize] {
    self
      .productions
      .get(variable)
      .map(Vec::as_slice)
      .unwrap_or(&[])
  }

  /// Returns the right-hand sides defined for `variable`, in rule order.
  /// Empty for an unknown variable; check `variables()` first if that
  /// matters.
  pub fn productions_of<'a>(
    &'a self,
    variable: &Variable,
  ) -> impl Iterator<Item = &'a Expr> + 'a {
    self
      .production_indices(variable)
      .iter()
      .map(move |&i| &self.rules[i].expr)
  }

  /// All variables, heads and references alike, in order of first
  /// appearance.
  pub fn variables(&self) -> &OrderedSet<Variable> {
    &self.variables
  }

  /// All terminals in order of first appearance.
  pub fn terminals(&self) -> &OrderedSet<Terminal> {
    &self.terminals
  }

  /// Replays a leftmost derivation and returns the string it produces.
  ///
  /// Starting from the start variable, each index names the rule used to
  /// expand the leftmost remaining variable. A parser's derivation is
  /// correct exactly when replaying it gives back the parsed input.
  pub fn evaluate_leftmost_derivation(
    &self,
    indices: &[usize],
  ) -> Result<String, DerivationError> {
    let mut sentential =
      Expr::new(vec![Symbol::NonTerm(self.start_variable().clone())]);

    for (step, &index) in indices.iter().enumerate() {
      let rule = self.rule_at(index)?;
      sentential
        .apply_rule_leftmost(rule)
        .map_err(|e| e.at_step(step))?;
    }

    let remaining = sentential.nonterms().count();
    if remaining > 0 {
      return Err(DerivationError::IncompleteDerivation { remaining });
    }

    Ok(sentential.terms().map(Terminal::text).collect())
  }

  pub fn to_pretty(&self) -> String {
    let arena = pretty::Arena::new();
    format!("{}", self.to_doc(&arena).into_doc().pretty(80))
  }
}

impl ToDoc for Grammar {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA>
  where
    DA::Doc: Clone,
  {
    let start_entry = da
      .text("Start =")
      .group()
      .append(da.softline())
      .append(self.start_variable().to_doc(da));

    let rule_docs = self
      .variables
      .iter()
      .filter(|v| self.productions.contains_key(*v))
      .map(|v| {
        v.to_doc(da)
          .append(da.text(" ->"))
          .append(da.softline())
          .append(da.intersperse(
            self.productions_of(v).map(|expr| expr.to_doc(da)),
            da.text(" |").append(da.softline()),
          ))
          .append(da.text(";"))
          .append(da.softline())
      });

    let rules_entry = da
      .text("Rules ")
      .append(da.softline().append(da.concat(rule_docs).nest(2)).braces());

    da.concat(
      vec![start_entry, rules_entry]
        .into_iter()
        .map(|doc| doc.append(da.text(",")).append(da.softline())),
    )
  }
}

#[cfg(test)]
mod test {
  use super::*;

  fn abc_grammar() -> Grammar {
    Grammar::new(vec![
      Rule::new(
        "S",
        vec![Symbol::term("a"), Symbol::nonterm("B"), Symbol::nonterm("C")],
      ),
      Rule::new("B", vec![Symbol::term("b")]),
      Rule::new("C", vec![Symbol::term("c")]),
    ])
    .unwrap()
  }

  #[test]
  fn test_simple_grammar() {
    let g = Grammar::new(vec![Rule::new("A", vec![Symbol::term("a")])])
      .unwrap();
    assert_eq!(g.rule_count(), 1);
    assert_eq!(g.start_variable(), &Variable::new("A"));
    assert_eq!(g.terminals().as_slice(), &[Terminal::new("a")]);
  }

  #[test]
  fn test_undefined_variable() {
    let err = Grammar::new(vec![Rule::new("A", vec![Symbol::nonterm("B")])])
      .unwrap_err();
    assert_eq!(err, GrammarError::UndefinedVariable(Variable::new("B")));
  }

  #[test]
  fn test_self_reference_is_defined() {
    let g = Grammar::new(vec![Rule::new("A", vec![Symbol::nonterm("A")])]);
    assert!(g.is_ok());
  }

  #[test]
  fn test_no_rules() {
    assert_eq!(Grammar::new(vec![]).unwrap_err(), GrammarError::NoRules);
  }

  #[test]
  fn test_production_order() {
    let g = Grammar::new(vec![
      Rule::new("S", vec![Symbol::nonterm("T")]),
      Rule::new("T", vec![Symbol::term("x")]),
      Rule::new("S", vec![Symbol::term("y")]),
    ])
    .unwrap();
    let s = Variable::new("S");
    assert_eq!(g.production_indices(&s), &[0, 2]);
    let exprs: Vec<_> = g.productions_of(&s).map(|e| e.to_string()).collect();
    assert_eq!(exprs, vec!["T", "'y'"]);
    assert_eq!(g.productions_of(&Variable::new("Q")).count(), 0);
    assert_eq!(
      g.variables().as_slice(),
      &[Variable::new("S"), Variable::new("T")]
    );
  }

  #[test]
  fn test_rule_at() {
    let g = abc_grammar();
    assert_eq!(g.rule_at(1).unwrap().variable(), &Variable::new("B"));
    assert_eq!(
      g.rule_at(3).unwrap_err(),
      DerivationError::IndexOutOfRange { index: 3, len: 3 }
    );
  }

  #[test]
  fn test_eval_valid_left_parse() {
    let g = abc_grammar();
    assert_eq!(g.evaluate_leftmost_derivation(&[0, 1, 2]).unwrap(), "abc");
  }

  #[test]
  fn test_eval_unknown_rule() {
    let g = abc_grammar();
    assert!(matches!(
      g.evaluate_leftmost_derivation(&[3]),
      Err(DerivationError::IndexOutOfRange { .. })
    ));
  }

  #[test]
  fn test_eval_not_leftmost() {
    let g = abc_grammar();
    assert_eq!(
      g.evaluate_leftmost_derivation(&[0, 2, 1]).unwrap_err(),
      DerivationError::RuleMismatch {
        step: 1,
        expected: Variable::new("C"),
        found: Some(Variable::new("B")),
      }
    );
  }

  #[test]
  fn test_eval_incomplete() {
    let g = abc_grammar();
    assert_eq!(
      g.evaluate_leftmost_derivation(&[0]).unwrap_err(),
      DerivationError::IncompleteDerivation { remaining: 2 }
    );
    assert_eq!(
      g.evaluate_leftmost_derivation(&[]).unwrap_err(),
      DerivationError::IncompleteDerivation { remaining: 1 }
    );
  }

  #[test]
  fn test_apply_rule_leftmost() {
    let mut expr = Expr::new(vec![
      Symbol::term("a"),
      Symbol::nonterm("B"),
      Symbol::term("c"),
    ]);
    let rule = Rule::new("B", vec![Symbol::term("b1"), Symbol::term("b2")]);
    expr.apply_rule_leftmost(&rule).unwrap();
    assert_eq!(
      expr,
      Expr::new(vec![
        Symbol::term("a"),
        Symbol::term("b1"),
        Symbol::term("b2"),
        Symbol::term("c"),
      ])
    );
  }

  #[test]
  fn test_apply_rule_leftmost_mismatch() {
    let rule = Rule::new("B", vec![Symbol::term("b")]);

    let mut not_found =
      Expr::new(vec![Symbol::term("a"), Symbol::nonterm("C")]);
    assert!(not_found.apply_rule_leftmost(&rule).is_err());

    let mut not_leftmost = Expr::new(vec![
      Symbol::term("a"),
      Symbol::nonterm("C"),
      Symbol::nonterm("B"),
    ]);
    let before = not_leftmost.clone();
    assert!(not_leftmost.apply_rule_leftmost(&rule).is_err());
    assert_eq!(not_leftmost, before);

    let mut no_refs = Expr::new(vec![Symbol::term("a"), Symbol::term("b")]);
    assert!(matches!(
      no_refs.apply_rule_leftmost(&rule),
      Err(DerivationError::RuleMismatch { found: None, .. })
    ));
  }

  #[test]
  fn test_symbol_display() {
    assert_eq!(Symbol::term("+").to_string(), "'+'");
    assert_eq!(Symbol::nonterm("Sum").to_string(), "Sum");
    assert_eq!(Expr::empty().to_string(), "ε");
    assert_eq!(
      Rule::new("S", vec![Symbol::nonterm("S"), Symbol::term("+")]).to_string(),
      "S -> S '+'"
    );
  }

  #[test]
  fn test_pretty_lists_every_variable() {
    let text = abc_grammar().to_pretty();
    assert!(text.contains("Start"));
    assert!(text.contains("B ->"));
    assert!(text.contains("'b'"));
    assert!(text.contains("C ->"));
  }
}
