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

use std::sync::Arc;

use unicode_segmentation::UnicodeSegmentation;

mod ordered_set;

pub use ordered_set::OrderedSet;

/// Repeatedly applies `apply` until the value stops changing.
pub fn fixed_point<T: Eq>(start: T, mut apply: impl FnMut(&T) -> T) -> T {
  let mut curr = start;
  loop {
    let next = apply(&curr);
    if next == curr {
      break curr;
    }
    curr = next;
  }
}

pub trait ToDoc {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA, ()>
  where
    DA::Doc: Clone;
}

/// Splits text into extended grapheme clusters. Chart positions and terminal
/// lengths are both measured in these units.
pub fn graphemes(text: &str) -> Vec<&str> {
  text.graphemes(true).collect()
}

/// A refcounted name type, used to avoid duplicating common string values
/// throughout a grammar.
///
/// Names are atomically refcounted so that a finished grammar can be shared
/// between threads.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(Arc<str>);

impl Name {
  /// Creates a new Name containing the given string.
  pub fn new(s: &(impl AsRef<str> + ?Sized)) -> Self {
    Name(Arc::from(s.as_ref()))
  }

  /// Returns a reference to the internal string.
  pub fn str(&self) -> &str {
    &self.0
  }
}

impl AsRef<str> for Name {
  fn as_ref(&self) -> &str {
    self.str()
  }
}

impl std::fmt::Debug for Name {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    fmt.write_str(&self.0)
  }
}

impl std::fmt::Display for Name {
  fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
    fmt.write_str(&self.0)
  }
}

impl ToDoc for Name {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA> {
    da.text(self.str().to_string())
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_fixed_point_stops_when_stable() {
    let result = fixed_point(0, |v| if *v < 5 { v + 1 } else { *v });
    assert_eq!(result, 5);
  }

  #[test]
  fn test_graphemes_ascii() {
    assert_eq!(graphemes("2+3"), vec!["2", "+", "3"]);
    assert!(graphemes("").is_empty());
  }

  #[test]
  fn test_graphemes_combining_marks() {
    // "e" followed by a combining acute accent is a single position.
    let text = "e\u{301}x";
    assert_eq!(graphemes(text), vec!["e\u{301}", "x"]);
  }

  #[test]
  fn test_name_equality() {
    assert_eq!(Name::new("abc"), Name::new(&"abc".to_string()));
    assert_eq!(Name::new("abc").str(), "abc");
    assert_eq!(format!("{}", Name::new("abc")), "abc");
  }
}
