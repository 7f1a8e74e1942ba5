use crate::utils::{Name, ToDoc};

/// A terminal element: literal text matched verbatim against the input.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Terminal(Name);

impl Terminal {
  pub fn new(s: &str) -> Self {
    Terminal(Name::new(s))
  }

  pub fn text(&self) -> &str {
    self.0.str()
  }
}

impl std::fmt::Display for Terminal {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "'{}'", self.0)
  }
}

impl ToDoc for Terminal {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA> {
    da.text(format!("'{}'", self.0.str()))
  }
}

/// A variable (non-terminal), expanded through its productions.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Variable(Name);

impl Variable {
  pub fn new(s: &str) -> Self {
    Variable(Name::new(s))
  }

  pub fn name(&self) -> &str {
    self.0.str()
  }
}

impl std::fmt::Display for Variable {
  fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl ToDoc for Variable {
  fn to_doc<'a, DA: pretty::DocAllocator<'a>>(
    &self,
    da: &'a DA,
  ) -> pretty::DocBuilder<'a, DA> {
    da.text(self.0.str().to_string())
  }
}

impl From<&str> for Terminal {
  fn from(s: &str) -> Self {
    Terminal::new(s)
  }
}

impl From<&str> for Variable {
  fn from(s: &str) -> Self {
    Variable::new(s)
  }
}
