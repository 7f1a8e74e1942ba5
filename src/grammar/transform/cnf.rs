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

//! A Grammar transform into Chomsky normal form.
//!
//! Every rule of the result is either `A -> B C` with two variables, or
//! `A -> 't'` with a single terminal. The transform runs five rewrites in
//! order:
//!
//! 1. START: a fresh start variable `S0` with the rule `S0 -> _S`.
//! 2. TERM: a rule `N<t> -> 't'` for every terminal `t`.
//! 3. BIN: every rule is rewritten over the indirection variables, and right
//!    hand sides longer than two are split into a chain of binary rules.
//! 4. DEL: empty rules are removed, adding variants of the rules that used
//!    the nullable variable.
//! 5. UNIT: rules of the form `A -> B` are replaced by copies of the rules of
//!    `B`.
//!
//! Rules left referring to a variable with no rules are then pruned, and the
//! rules of `S0` are moved to the front so that `S0` is the start variable.
//!
//! Example: For the grammar:
//!
//! ```text
//! S -> 'a' S 'b'
//! S -> ε
//! ```
//!
//! This is transformed into:
//!
//! ```text
//! S0 -> Na A0_2
//! Na -> 'a'
//! Nb -> 'b'
//! _S -> Na A0_2
//! A0_2 -> _S Nb
//! A0_2 -> 'b'
//! ```
//!
//! Variables of the source grammar are renamed `_<name>`, so none of the
//! generated names can collide with them. The empty string cannot be derived
//! in this form; when the source language contains it, the result derives
//! everything else.

use {
  crate::{
    grammar::{Expr, Grammar, Rule, Symbol, Terminal, Variable},
    utils::{fixed_point, OrderedSet},
  },
  std::collections::HashSet,
};

/// The name of the start variable of a normalized grammar.
pub const START_VARIABLE: &str = "S0";

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CnfError {
  #[error("grammar derives no non-empty string, so it has no normal form")]
  EmptyLanguage,
}

impl Grammar {
  /// Returns an equivalent grammar in Chomsky normal form. See
  /// [`transform_to_cnf`].
  pub fn to_cnf(&self) -> anyhow::Result<Grammar> {
    transform_to_cnf(self)
  }
}

/// Transforms `g` into Chomsky normal form.
///
/// Fails with [`CnfError::EmptyLanguage`] if nothing but the empty string
/// can be derived.
pub fn transform_to_cnf(g: &Grammar) -> anyhow::Result<Grammar> {
  let mut rules = OrderedSet::new();
  add_start_rule(g, &mut rules);
  log::debug!("cnf START: {} rules", rules.len());
  add_terminal_rules(g, &mut rules);
  log::debug!("cnf TERM: {} rules", rules.len());
  add_binary_rules(g, &mut rules);
  log::debug!("cnf BIN: {} rules", rules.len());
  let rules = remove_empty_rules(rules);
  log::debug!("cnf DEL: {} rules", rules.len());
  let rules = remove_unit_rules(rules);
  log::debug!("cnf UNIT: {} rules", rules.len());
  let rules = start_rules_first(prune_undefined(rules));
  log::debug!("cnf prune: {} rules", rules.len());

  let start = Variable::new(START_VARIABLE);
  if !rules.iter().any(|r| r.variable() == &start) {
    return Err(CnfError::EmptyLanguage.into());
  }

  Ok(Grammar::new(rules)?)
}

fn term_variable(term: &Terminal) -> Variable {
  Variable::new(&format!("N{}", term.text()))
}

fn nonterm_variable(var: &Variable) -> Variable {
  Variable::new(&format!("_{}", var.name()))
}

/// The intermediate variable standing for the tail of rule `rule_index`
/// starting at symbol `pos`.
fn chain_variable(rule_index: usize, pos: usize) -> Variable {
  Variable::new(&format!("A{}_{}", rule_index, pos))
}

fn symbol_variable(sym: &Symbol) -> Variable {
  match sym {
    Symbol::Term(t) => term_variable(t),
    Symbol::NonTerm(v) => nonterm_variable(v),
  }
}

fn binary(head: Variable, left: Variable, right: Variable) -> Rule {
  Rule::new(head, vec![Symbol::NonTerm(left), Symbol::NonTerm(right)])
}

fn add_start_rule(g: &Grammar, rules: &mut OrderedSet<Rule>) {
  rules.insert(Rule::new(
    Variable::new(START_VARIABLE),
    vec![Symbol::NonTerm(nonterm_variable(g.start_variable()))],
  ));
}

fn add_terminal_rules(g: &Grammar, rules: &mut OrderedSet<Rule>) {
  for term in g.terminals() {
    rules.insert(Rule::new(
      term_variable(term),
      vec![Symbol::Term(term.clone())],
    ));
  }
}

fn add_binary_rules(g: &Grammar, rules: &mut OrderedSet<Rule>) {
  for (rule_index, rule) in g.rules().iter().enumerate() {
    let head = nonterm_variable(rule.variable());
    let vars: Vec<Variable> = rule.expr().iter().map(symbol_variable).collect();

    if vars.len() <= 2 {
      rules.insert(Rule::new(
        head,
        vars.into_iter().map(Symbol::NonTerm).collect::<Expr>(),
      ));
      continue;
    }

    let last = vars.len() - 1;
    for pos in 1..=last {
      let rule_head = if pos == 1 {
        head.clone()
      } else {
        chain_variable(rule_index, pos)
      };
      let tail = if pos == last {
        vars[pos].clone()
      } else {
        chain_variable(rule_index, pos + 1)
      };
      let new_rule = binary(rule_head, vars[pos - 1].clone(), tail);
      log::trace!("cnf BIN: {} => {}", rule, new_rule);
      rules.insert(new_rule);
    }
  }
}

/// Every way of dropping at least one occurrence of `target` from `expr`.
///
/// Each occurrence doubles the set of partial builds: one copy keeps it, the
/// other drops it. The variant that keeps every occurrence is left out.
fn removal_variants(expr: &Expr, target: &Variable) -> Vec<Expr> {
  // (symbols so far, whether an occurrence was dropped)
  let mut builds: Vec<(Vec<Symbol>, bool)> = vec![(Vec::new(), false)];

  for sym in expr {
    if sym.as_nonterm() == Some(target) {
      let mut dropped: Vec<_> = builds
        .iter()
        .map(|(syms, _)| (syms.clone(), true))
        .collect();
      for (syms, _) in &mut builds {
        syms.push(sym.clone());
      }
      builds.append(&mut dropped);
    } else {
      for (syms, _) in &mut builds {
        syms.push(sym.clone());
      }
    }
  }

  builds
    .into_iter()
    .filter(|(_, dropped_any)| *dropped_any)
    .map(|(syms, _)| Expr::new(syms))
    .collect()
}

fn without_occurrences(rule: &Rule, target: &Variable) -> Rule {
  Rule::new(
    rule.variable().clone(),
    rule
      .expr()
      .iter()
      .filter(|sym| sym.as_nonterm() != Some(target))
      .cloned()
      .collect::<Expr>(),
  )
}

fn remove_empty_rules(mut rules: OrderedSet<Rule>) -> OrderedSet<Rule> {
  let mut handled = HashSet::new();

  loop {
    let empty_rule = match rules.iter().find(|r| r.is_empty()) {
      Some(rule) => rule.clone(),
      None => break,
    };
    rules.remove(&empty_rule);
    let target = empty_rule.variable().clone();

    // The variants generated the first time already cover this variable
    // deriving nothing.
    if !handled.insert(target.clone()) {
      log::trace!("cnf DEL: dropping repeated {}", empty_rule);
      continue;
    }

    if rules.iter().any(|r| r.variable() == &target) {
      let users: Vec<Rule> = rules
        .iter()
        .filter(|r| r.expr().nonterms().any(|v| v == &target))
        .cloned()
        .collect();
      for user in users {
        for expr in removal_variants(user.expr(), &target) {
          let variant = Rule::new(user.variable().clone(), expr);
          log::trace!("cnf DEL: {} => {}", user, variant);
          rules.insert(variant);
        }
      }
    } else {
      log::trace!("cnf DEL: deleting every `{}`", target);
      rules = rules
        .iter()
        .map(|r| without_occurrences(r, &target))
        .collect();
    }
  }

  rules
}

fn unit_target(rule: &Rule) -> Option<&Variable> {
  match rule.expr().symbols() {
    [Symbol::NonTerm(v)] => Some(v),
    _ => None,
  }
}

fn remove_unit_rules(mut rules: OrderedSet<Rule>) -> Vec<Rule> {
  // The set itself is the seen set: a copy that already exists is not added
  // again, so unit cycles end.
  let mut i = 0;
  while i < rules.len() {
    let rule = rules[i].clone();
    i += 1;

    let target = match unit_target(&rule) {
      Some(target) if target != rule.variable() => target.clone(),
      _ => continue,
    };

    let copies: Vec<Rule> = rules
      .iter()
      .filter(|r| r.variable() == &target)
      .map(|r| Rule::new(rule.variable().clone(), r.expr().clone()))
      .collect();
    for copy in copies {
      if rules.insert(copy.clone()) {
        log::trace!("cnf UNIT: {} => {}", rule, copy);
      }
    }
  }

  rules
    .iter()
    .filter(|r| unit_target(r).is_none())
    .cloned()
    .collect()
}

/// Removes rules that mention a variable with no rules, until none are left.
fn prune_undefined(rules: Vec<Rule>) -> Vec<Rule> {
  fixed_point(rules, |rules| {
    let heads: HashSet<&Variable> = rules.iter().map(Rule::variable).collect();
    rules
      .iter()
      .filter(|r| r.expr().nonterms().all(|v| heads.contains(v)))
      .cloned()
      .collect()
  })
}

fn start_rules_first(rules: Vec<Rule>) -> Vec<Rule> {
  let start = Variable::new(START_VARIABLE);
  let (mut front, back): (Vec<_>, Vec<_>) =
    rules.into_iter().partition(|r| r.variable() == &start);
  front.extend(back);
  front
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    grammar::{build, examples},
    parsers::{EarleyParser, Parser},
  };

  fn is_cnf_rule(rule: &Rule) -> bool {
    match rule.expr().symbols() {
      [Symbol::Term(_)] => true,
      [Symbol::NonTerm(_), Symbol::NonTerm(_)] => true,
      _ => false,
    }
  }

  fn assert_cnf(g: &Grammar) {
    assert_eq!(g.start_variable().name(), START_VARIABLE);
    for rule in g.rules() {
      assert!(is_cnf_rule(rule), "not in normal form: {}", rule);
      assert!(
        rule.expr().nonterms().all(|v| v.name() != START_VARIABLE),
        "start variable on a right hand side: {}",
        rule
      );
    }
  }

  fn accepts(g: &Grammar, input: &str) -> bool {
    match EarleyParser::new(g).parse(input) {
      Ok(derivation) => {
        assert_eq!(g.evaluate_leftmost_derivation(&derivation).unwrap(), input);
        true
      }
      Err(_) => false,
    }
  }

  #[test]
  fn test_shape_on_fixtures() {
    let fixtures = vec![
      examples::make_arithmetic(),
      examples::make_right_recursive_epsilon(),
      examples::make_palindrome(),
      examples::make_nullable_pair(),
      examples::make_three_symbol(),
      examples::make_ambiguous(),
      examples::make_unit_cycle(),
      examples::make_keywords(),
    ];
    for g in fixtures {
      assert_cnf(&g.unwrap().to_cnf().unwrap());
    }
  }

  #[test]
  fn test_three_symbol_chain() {
    let g = examples::make_three_symbol().unwrap();
    let cnf = g.to_cnf().unwrap();
    assert_cnf(&cnf);

    let shown: Vec<String> =
      cnf.rules().iter().map(ToString::to_string).collect();
    assert!(shown.contains(&"S0 -> _X A1_2".to_string()));
    assert!(shown.contains(&"A1_2 -> _Y _Z".to_string()));
    assert!(shown.contains(&"S0 -> 'a'".to_string()));

    let derivation = EarleyParser::new(&cnf).parse("xyz").unwrap();
    assert_eq!(cnf.evaluate_leftmost_derivation(&derivation).unwrap(), "xyz");
    let source = EarleyParser::new(&g).parse("xyz").unwrap();
    assert_eq!(g.evaluate_leftmost_derivation(&source).unwrap(), "xyz");
  }

  #[test]
  fn test_same_language_arithmetic() {
    let g = examples::make_arithmetic().unwrap();
    let cnf = g.to_cnf().unwrap();
    for input in &["1", "2+3*4", "1*2*3+4+1"] {
      assert!(accepts(&cnf, input), "{}", input);
    }
    for input in &["", "+", "2*3+", "12"] {
      assert!(!accepts(&cnf, input), "{}", input);
    }
  }

  #[test]
  fn test_unit_cycle_terminates() {
    let cnf = examples::make_unit_cycle().unwrap().to_cnf().unwrap();
    assert_cnf(&cnf);
    assert!(accepts(&cnf, "a"));
    assert!(accepts(&cnf, "bc"));
    assert!(!accepts(&cnf, "b"));
  }

  #[test]
  fn test_nullable_variants() {
    let cnf = examples::make_nullable_pair().unwrap().to_cnf().unwrap();
    assert!(accepts(&cnf, "a"));
    assert!(accepts(&cnf, "aa"));
    assert!(!accepts(&cnf, ""));
    assert!(!accepts(&cnf, "aaa"));
  }

  #[test]
  fn test_palindromes_without_empty() {
    let cnf = examples::make_palindrome().unwrap().to_cnf().unwrap();
    for input in &["a", "b", "aa", "aba", "abba", "babbab"] {
      assert!(accepts(&cnf, input), "{}", input);
    }
    assert!(!accepts(&cnf, ""));
    assert!(!accepts(&cnf, "ab"));
  }

  #[test]
  fn test_only_empty_string() {
    let g = build(|gb| {
      gb.add_rule("S", |rb| {
        rb.add_empty_prod();
      });
    })
    .unwrap();
    let err = g.to_cnf().unwrap_err();
    assert_eq!(err.downcast_ref::<CnfError>(), Some(&CnfError::EmptyLanguage));
  }

  #[test]
  fn test_deterministic() {
    let g = examples::make_palindrome().unwrap();
    assert_eq!(g.to_cnf().unwrap(), g.to_cnf().unwrap());
  }

  #[test]
  fn test_removal_variants() {
    let a = Variable::new("A");
    let expr = Expr::new(vec![
      Symbol::nonterm("A"),
      Symbol::term("x"),
      Symbol::nonterm("A"),
    ]);
    let shown: Vec<String> = removal_variants(&expr, &a)
      .iter()
      .map(ToString::to_string)
      .collect();
    assert_eq!(shown, vec!["'x' A", "A 'x'", "'x'"]);
  }
}
