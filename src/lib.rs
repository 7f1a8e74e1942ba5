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

//! General context-free grammars: an Earley parser that returns leftmost
//! derivations, and a transform into Chomsky normal form.
//!
//! ```rust
//! use cfgparse::{
//!   grammar::{Expr, Grammar, Rule, Symbol},
//!   parsers::{EarleyParser, Parser},
//! };
//!
//! let g = Grammar::new(vec![
//!   Rule::new(
//!     "S",
//!     vec![Symbol::term("("), Symbol::nonterm("S"), Symbol::term(")")],
//!   ),
//!   Rule::new("S", Expr::empty()),
//! ])
//! .unwrap();
//!
//! let derivation = EarleyParser::new(&g).parse("(())").unwrap();
//! assert_eq!(derivation, vec![0, 0, 1]);
//! assert_eq!(g.evaluate_leftmost_derivation(&derivation).unwrap(), "(())");
//! ```

#[macro_use]
extern crate derivative;

pub mod grammar;
pub mod parsers;
pub mod utils;
