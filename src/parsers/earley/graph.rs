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

//! Graphviz output for the justification graph of an accepted parse.

use {
  super::{Chart, StateKey},
  std::{borrow::Cow, collections::HashMap},
};

type Edge = (usize, usize);

/// The items reachable from the accepted item, with an edge from each item
/// to every item justifying it.
struct DerivationGraph {
  name: dot::Id<'static>,
  ids: Vec<dot::Id<'static>>,
  labels: Vec<String>,
  edges: Vec<Edge>,
}

fn make_id(name: String) -> anyhow::Result<dot::Id<'static>> {
  dot::Id::new(name.clone())
    .map_err(|_| anyhow::anyhow!("`{}` is not a valid graphviz id", name))
}

impl DerivationGraph {
  fn from_chart(chart: &Chart) -> anyhow::Result<Self> {
    if !chart.is_accepted() {
      return Err(chart.rejection().into());
    }
    let root = chart.accepted_key();

    let mut graph = DerivationGraph {
      name: make_id("derivation".to_string())?,
      ids: Vec::new(),
      labels: Vec::new(),
      edges: Vec::new(),
    };
    let mut indices: HashMap<StateKey, usize> = HashMap::new();
    let mut stack = vec![root];
    graph.add_node(chart, &mut indices, root)?;

    while let Some(key) = stack.pop() {
      let parent = indices[&key];
      for child in chart.children(&key)? {
        let child_index = match indices.get(&child) {
          Some(&index) => index,
          None => {
            stack.push(child);
            graph.add_node(chart, &mut indices, child)?
          }
        };
        graph.edges.push((parent, child_index));
      }
    }

    Ok(graph)
  }

  fn add_node(
    &mut self,
    chart: &Chart,
    indices: &mut HashMap<StateKey, usize>,
    key: StateKey,
  ) -> anyhow::Result<usize> {
    let index = self.ids.len();
    self.ids.push(make_id(format!("n{}", index))?);
    self.labels.push(chart.describe(&key));
    indices.insert(key, index);
    Ok(index)
  }
}

impl<'a> dot::Labeller<'a, usize, Edge> for DerivationGraph {
  fn graph_id(&'a self) -> dot::Id<'a> {
    dot::Id::new(self.name.as_slice()).expect("validated by make_id")
  }

  fn node_id(&'a self, n: &usize) -> dot::Id<'a> {
    dot::Id::new(self.ids[*n].as_slice()).expect("validated by make_id")
  }

  fn node_label(&'a self, n: &usize) -> dot::LabelText<'a> {
    dot::LabelText::LabelStr(Cow::Borrowed(self.labels[*n].as_str()))
  }
}

impl<'a> dot::GraphWalk<'a, usize, Edge> for DerivationGraph {
  fn nodes(&'a self) -> dot::Nodes<'a, usize> {
    (0..self.ids.len()).collect::<Vec<_>>().into()
  }

  fn edges(&'a self) -> dot::Edges<'a, Edge> {
    Cow::Borrowed(&self.edges[..])
  }

  fn source(&'a self, edge: &Edge) -> usize {
    edge.0
  }

  fn target(&'a self, edge: &Edge) -> usize {
    edge.1
  }
}

impl<'g> Chart<'g> {
  /// Renders the justification graph of an accepted chart in Graphviz dot
  /// format. Fails for a rejected chart.
  pub fn to_dot(&self) -> anyhow::Result<String> {
    let graph = DerivationGraph::from_chart(self)?;
    let mut out = Vec::new();
    dot::render(&graph, &mut out)?;
    Ok(String::from_utf8(out)?)
  }
}

#[cfg(test)]
mod test {
  use crate::{
    grammar::examples,
    parsers::{EarleyParser, ParseError},
  };

  #[test]
  fn test_dot_for_accepted() {
    let g = examples::make_arithmetic().unwrap();
    let text = EarleyParser::new(&g).chart("1+2").to_dot().unwrap();
    assert!(text.starts_with("digraph derivation"));
    assert!(text.contains("Start -> S"));
    assert!(text.contains("n0 -> n1"));
  }

  #[test]
  fn test_dot_for_rejected() {
    let g = examples::make_arithmetic().unwrap();
    let err = EarleyParser::new(&g).chart("1+").to_dot().unwrap_err();
    assert_eq!(
      err.downcast_ref::<ParseError>(),
      Some(&ParseError::Rejected {
        reached: 2,
        length: 2
      })
    );
  }
}
