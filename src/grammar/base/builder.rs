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

use super::{Expr, Grammar, GrammarError, Rule, Symbol, Terminal, Variable};

/// A helper trait to allow builder methods to either take a type `T`, or a
/// reference to `T` if it is clonable.
pub trait BuilderInto<T> {
  /// Consumes self and produces a value of type `T`.
  fn builder_into(self) -> T;
}

impl<T> BuilderInto<T> for T {
  fn builder_into(self) -> T {
    self
  }
}

impl<'a, T> BuilderInto<T> for &'a T
where
  T: Clone,
{
  fn builder_into(self) -> T {
    self.clone()
  }
}

impl BuilderInto<Variable> for &'_ str {
  fn builder_into(self) -> Variable {
    Variable::new(self)
  }
}

impl BuilderInto<Terminal> for &'_ str {
  fn builder_into(self) -> Terminal {
    Terminal::new(self)
  }
}

pub struct ProductionBuilder {
  elems: Vec<Symbol>,
}

impl ProductionBuilder {
  fn new() -> Self {
    ProductionBuilder { elems: Vec::new() }
  }

  fn build(self) -> Expr {
    Expr::new(self.elems)
  }

  pub fn add_term(&mut self, term: impl BuilderInto<Terminal>) -> &mut Self {
    self.elems.push(Symbol::Term(term.builder_into()));
    self
  }

  pub fn add_nonterm(
    &mut self,
    nonterm: impl BuilderInto<Variable>,
  ) -> &mut Self {
    self.elems.push(Symbol::NonTerm(nonterm.builder_into()));
    self
  }

  pub fn add_symbol(&mut self, symbol: impl BuilderInto<Symbol>) -> &mut Self {
    self.elems.push(symbol.builder_into());
    self
  }
}

// ----------------

pub struct RuleBuilder {
  head: Variable,
  prods: Vec<Expr>,
}

impl RuleBuilder {
  fn new(head: Variable) -> Self {
    RuleBuilder {
      head,
      prods: Vec::new(),
    }
  }

  fn build(self) -> impl Iterator<Item = Rule> {
    let RuleBuilder { head, prods } = self;
    prods.into_iter().map(move |expr| Rule::new(head.clone(), expr))
  }

  /// Adds one production. Each production becomes its own indexed rule.
  pub fn add_prod(
    &mut self,
    build_fn: impl FnOnce(&mut ProductionBuilder),
  ) -> &mut Self {
    let mut builder = ProductionBuilder::new();
    build_fn(&mut builder);
    self.prods.push(builder.build());
    self
  }

  pub fn add_prod_with_elems(
    &mut self,
    elems: impl BuilderInto<Vec<Symbol>>,
  ) -> &mut Self {
    self.prods.push(Expr::new(elems.builder_into()));
    self
  }

  /// Adds an epsilon production.
  pub fn add_empty_prod(&mut self) -> &mut Self {
    self.prods.push(Expr::empty());
    self
  }
}

// ----------------

pub struct GrammarBuilder {
  rules: Vec<Rule>,
}

impl GrammarBuilder {
  fn new() -> Self {
    GrammarBuilder { rules: Vec::new() }
  }

  fn build(self) -> Result<Grammar, GrammarError> {
    Grammar::new(self.rules)
  }

  pub fn add_rule<F>(
    &mut self,
    head: impl BuilderInto<Variable>,
    build_fn: F,
  ) -> &mut Self
  where
    F: FnOnce(&mut RuleBuilder),
  {
    let mut rule_builder = RuleBuilder::new(head.builder_into());
    build_fn(&mut rule_builder);
    self.rules.extend(rule_builder.build());
    self
  }
}

/// Builds a grammar using a builder function.
///
/// Rules are indexed in the order their productions are added, and the head
/// of the first production is the start variable.
///
/// Example:
///
/// ```rust
/// # use cfgparse::grammar::{build, Grammar};
/// let g: Grammar = build(|gb| {
///   gb.add_rule("x", |rb| {
///     rb.add_prod(|pb| {
///       pb.add_term("A").add_nonterm("x").add_term("A");
///     })
///     .add_empty_prod();
///   });
/// })
/// .unwrap();
/// assert_eq!(g.evaluate_leftmost_derivation(&[0, 1]).unwrap(), "AA");
/// ```
///
/// Arguments that take a `Terminal` or `Variable` also accept a `&str`, the
/// value itself, or a cloneable reference to it.
pub fn build(
  build_fn: impl FnOnce(&mut GrammarBuilder),
) -> Result<Grammar, GrammarError> {
  let mut builder = GrammarBuilder::new();
  build_fn(&mut builder);
  builder.build()
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_prods_become_indexed_rules() {
    let g = build(|gb| {
      gb.add_rule("S", |rb| {
        rb.add_prod(|pb| {
          pb.add_nonterm("T").add_term("+");
        })
        .add_empty_prod();
      })
      .add_rule("T", |rb| {
        rb.add_prod_with_elems(vec![Symbol::term("t")]);
      });
    })
    .unwrap();

    assert_eq!(g.rule_count(), 3);
    assert_eq!(g.rule_at(0).unwrap().to_string(), "S -> T '+'");
    assert_eq!(g.rule_at(1).unwrap().to_string(), "S -> ε");
    assert_eq!(g.rule_at(2).unwrap().to_string(), "T -> 't'");
  }

  #[test]
  fn test_builder_reports_undefined() {
    let err = build(|gb| {
      gb.add_rule("S", |rb| {
        rb.add_prod(|pb| {
          pb.add_nonterm(&Variable::new("Missing"));
        });
      });
    })
    .unwrap_err();
    assert_eq!(err, GrammarError::UndefinedVariable(Variable::new("Missing")));
  }

  #[test]
  fn test_rule_without_prods_adds_nothing() {
    let err = build(|gb| {
      gb.add_rule("S", |_rb| {});
    })
    .unwrap_err();
    assert_eq!(err, GrammarError::NoRules);
  }
}
