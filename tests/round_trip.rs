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

use cfgparse::{
  grammar::{
    examples, transform::CnfError, Expr, Grammar, GrammarError, Rule, Symbol,
    Variable,
  },
  parsers::{EarleyParser, ParseError, Parser},
};

fn assert_round_trip(g: &Grammar, input: &str) {
  let derivation = EarleyParser::new(g)
    .parse(input)
    .unwrap_or_else(|e| panic!("{:?} rejected: {}", input, e));
  assert_eq!(g.evaluate_leftmost_derivation(&derivation).unwrap(), input);
}

#[test]
fn test_arithmetic_round_trips() {
  let g = examples::make_arithmetic().unwrap();
  for input in &["1", "2+3*4", "4*4*4", "1+2+3+4", "3*1+2*4"] {
    assert_round_trip(&g, input);
  }
}

#[test]
fn test_arithmetic_rejections() {
  let g = examples::make_arithmetic().unwrap();
  let parser = EarleyParser::new(&g);
  for input in &["", "2*3+", "+1", "5", "1++2"] {
    match parser.parse(input) {
      Err(ParseError::Rejected { length, .. }) => {
        assert_eq!(length, input.len())
      }
      other => panic!("{:?} gave {:?}", input, other),
    }
  }
}

#[test]
fn test_epsilon_grammar() {
  let g = examples::make_right_recursive_epsilon().unwrap();
  assert_round_trip(&g, "aa");
  assert_round_trip(&g, "");
  assert!(EarleyParser::new(&g).parse("ab").is_err());
}

#[test]
fn test_undefined_variable() {
  let err = Grammar::new(vec![Rule::new("A", vec![Symbol::nonterm("B")])])
    .unwrap_err();
  assert_eq!(err, GrammarError::UndefinedVariable(Variable::new("B")));
}

#[test]
fn test_parse_is_deterministic() {
  let g = examples::make_ambiguous().unwrap();
  let parser = EarleyParser::new(&g);
  let runs: Vec<_> = (0..3).map(|_| parser.parse("nnnnn").unwrap()).collect();
  assert!(runs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_cnf_then_parse() {
  let g = examples::make_three_symbol().unwrap();
  let cnf = g.to_cnf().unwrap();
  for rule in cnf.rules() {
    let shape_ok = match rule.expr().symbols() {
      [Symbol::Term(_)] => true,
      [Symbol::NonTerm(_), Symbol::NonTerm(_)] => true,
      _ => false,
    };
    assert!(shape_ok, "{}", rule);
  }
  assert_round_trip(&cnf, "xyz");
  assert_round_trip(&cnf, "a");
  assert_round_trip(&g, "xyz");
}

#[test]
fn test_cnf_agrees_with_source() {
  let g = examples::make_arithmetic().unwrap();
  let cnf = g.to_cnf().unwrap();
  let source = EarleyParser::new(&g);
  let normalized = EarleyParser::new(&cnf);
  for input in &["1", "2+3", "2*3+", "1*2+3*4", "x", "12"] {
    assert_eq!(
      source.parse(input).is_ok(),
      normalized.parse(input).is_ok(),
      "{}",
      input
    );
  }
}

#[test]
fn test_cnf_of_empty_language() {
  let g = Grammar::new(vec![
    Rule::new("S", vec![Symbol::nonterm("E"), Symbol::nonterm("E")]),
    Rule::new("E", Expr::empty()),
  ]);
  let err = g.unwrap().to_cnf().unwrap_err();
  assert_eq!(err.downcast_ref::<CnfError>(), Some(&CnfError::EmptyLanguage));
}

#[test]
fn test_grammar_shared_between_threads() {
  let g = std::sync::Arc::new(examples::make_arithmetic().unwrap());
  let handles: Vec<_> = ["1+2", "3*4"]
    .iter()
    .map(|input| {
      let g = g.clone();
      let input = input.to_string();
      std::thread::spawn(move || {
        let derivation = EarleyParser::new(&g).parse(&input).unwrap();
        g.evaluate_leftmost_derivation(&derivation).unwrap() == input
      })
    })
    .collect();
  for handle in handles {
    assert!(handle.join().unwrap());
  }
}
