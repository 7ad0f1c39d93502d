use std::fmt;

/// A term is either a variable or a constant (symbol or integer).
///
/// The textual convention is the one the parser enforces: an identifier
/// starting with an uppercase letter or underscore is a variable, anything
/// else is a constant symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Var(String),
    Str(String),
    Int(i64),
}

impl Term {
    /// Classify a bare identifier into a variable or a constant symbol.
    pub fn symbol(name: &str) -> Term {
        if is_variable_name(name) {
            Term::Var(name.to_string())
        } else {
            Term::Str(name.to_string())
        }
    }

    pub fn is_var(&self) -> bool {
        matches!(self, Term::Var(_))
    }
}

/// True iff `name` matches `^[A-Z_][A-Za-z0-9_]*$`.
pub fn is_variable_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// A predicate applied to an ordered argument list.
/// Facts are ground atoms; rule heads are atoms that may contain variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub pred: String,
    pub args: Vec<Term>,
}

/// An atom with a negation flag, as used in rule bodies and queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub pred: String,
    pub args: Vec<Term>,
    pub negated: bool,
}

impl Literal {
    /// Distinct variable names, in order of first appearance.
    pub fn variables(&self) -> Vec<String> {
        let mut vars = Vec::new();
        for term in &self.args {
            if let Term::Var(v) = term {
                if !vars.contains(v) {
                    vars.push(v.clone());
                }
            }
        }
        vars
    }
}

/// A Horn rule `head :- body`, the body a conjunction of literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub head: Atom,
    pub body: Vec<Literal>,
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Var(v) => write!(f, "{v}"),
            Term::Str(s) => write!(f, "{s}"),
            Term::Int(i) => write!(f, "{i}"),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.pred)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "not ")?;
        }
        write!(f, "{}(", self.pred)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :- ", self.head)?;
        for (i, lit) in self.body.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{lit}")?;
        }
        Ok(())
    }
}
