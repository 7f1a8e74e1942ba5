//! Small grammars used across the crate's tests.

use crate::grammar::{build, Grammar, GrammarError};

/// Sums and products over the digits 1 to 4, left recursive:
///
/// ```text
/// S -> S '+' M | M
/// M -> M '*' T | T
/// T -> '1' | '2' | '3' | '4'
/// ```
pub fn make_arithmetic() -> Result<Grammar, GrammarError> {
  build(|gb| {
    gb.add_rule("S", |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm("S").add_term("+").add_nonterm("M");
      })
      .add_prod(|pb| {
        pb.add_nonterm("M");
      });
    })
    .add_rule("M", |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm("M").add_term("*").add_nonterm("T");
      })
      .add_prod(|pb| {
        pb.add_nonterm("T");
      });
    })
    .add_rule("T", |rb| {
      for digit in &["1", "2", "3", "4"] {
        rb.add_prod(|pb| {
          pb.add_term(*digit);
        });
      }
    });
  })
}

/// `a -> 'a' a | ε`
pub fn make_right_recursive_epsilon() -> Result<Grammar, GrammarError> {
  build(|gb| {
    gb.add_rule("a", |rb| {
      rb.add_prod(|pb| {
        pb.add_term("a").add_nonterm("a");
      })
      .add_empty_prod();
    });
  })
}

/// Odd and even palindromes over `a` and `b`, including the empty string.
pub fn make_palindrome() -> Result<Grammar, GrammarError> {
  build(|gb| {
    gb.add_rule("S", |rb| {
      rb.add_prod(|pb| {
        pb.add_term("a").add_nonterm("S").add_term("a");
      })
      .add_prod(|pb| {
        pb.add_term("b").add_nonterm("S").add_term("b");
      })
      .add_empty_prod()
      .add_prod(|pb| {
        pb.add_term("a");
      })
      .add_prod(|pb| {
        pb.add_term("b");
      });
    });
  })
}

/// `S -> A A`, `A -> ε | 'a'`. Needs the second `A` to complete empty after
/// the first one already did.
pub fn make_nullable_pair() -> Result<Grammar, GrammarError> {
  build(|gb| {
    gb.add_rule("S", |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm("A").add_nonterm("A");
      });
    })
    .add_rule("A", |rb| {
      rb.add_empty_prod().add_prod(|pb| {
        pb.add_term("a");
      });
    });
  })
}

/// A start rule with a three symbol body next to a single terminal body.
pub fn make_three_symbol() -> Result<Grammar, GrammarError> {
  build(|gb| {
    gb.add_rule("S0", |rb| {
      rb.add_prod(|pb| {
        pb.add_term("a");
      })
      .add_prod(|pb| {
        pb.add_nonterm("X").add_nonterm("Y").add_nonterm("Z");
      });
    })
    .add_rule("X", |rb| {
      rb.add_prod(|pb| {
        pb.add_term("x");
      });
    })
    .add_rule("Y", |rb| {
      rb.add_prod(|pb| {
        pb.add_term("y");
      });
    })
    .add_rule("Z", |rb| {
      rb.add_prod(|pb| {
        pb.add_term("z");
      });
    });
  })
}

/// `E -> E E | 'n'`, ambiguous for three or more `n`s.
pub fn make_ambiguous() -> Result<Grammar, GrammarError> {
  build(|gb| {
    gb.add_rule("E", |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm("E").add_nonterm("E");
      })
      .add_prod(|pb| {
        pb.add_term("n");
      });
    });
  })
}

/// A unit cycle between `A` and `B`, reached through a unit start rule.
pub fn make_unit_cycle() -> Result<Grammar, GrammarError> {
  build(|gb| {
    gb.add_rule("S", |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm("A");
      });
    })
    .add_rule("A", |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm("B");
      })
      .add_prod(|pb| {
        pb.add_term("a");
      });
    })
    .add_rule("B", |rb| {
      rb.add_prod(|pb| {
        pb.add_nonterm("A");
      })
      .add_prod(|pb| {
        pb.add_term("b").add_term("c");
      });
    });
  })
}

/// Multi-character terminals: `Stmt -> 'let' Name '=' Name`.
pub fn make_keywords() -> Result<Grammar, GrammarError> {
  build(|gb| {
    gb.add_rule("Stmt", |rb| {
      rb.add_prod(|pb| {
        pb.add_term("let ")
          .add_nonterm("Name")
          .add_term(" = ")
          .add_nonterm("Name");
      });
    })
    .add_rule("Name", |rb| {
      rb.add_prod(|pb| {
        pb.add_term("x");
      })
      .add_prod(|pb| {
        pb.add_term("yy");
      });
    });
  })
}
