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

pub mod earley;

pub use earley::{Chart, EarleyParser};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
  #[error("input rejected: parsing reached position {reached} of {length}")]
  Rejected { reached: usize, length: usize },
  #[error("chart is inconsistent: {0}")]
  CorruptChart(String),
}

/// The contract shared by parsing engines.
///
/// A successful parse returns a leftmost derivation: rule indices that,
/// replayed with `Grammar::evaluate_leftmost_derivation`, give back the
/// input.
pub trait Parser {
  fn parse(&self, input: &str) -> Result<Vec<usize>, ParseError>;
}
