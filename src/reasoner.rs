use std::cell::Cell;
use std::collections::HashMap;

use crate::ast::{Atom, Literal, Rule, Term};

/// Binding environment built up during proof search.
/// A variable may be bound to another variable, forming a chain.
pub type Subst = HashMap<String, Term>;

/// One query answer: every query variable mapped to its fully
/// dereferenced value.
pub type Solution = HashMap<String, Term>;

const MAX_DEPTH: usize = 512;

//
// ------------------------- Substitutions -------------------------
//

/// Follow the binding chain until a constant or an unbound variable.
/// The occurs check keeps the binding graph acyclic, so the chain is finite.
pub fn resolve(term: &Term, subst: &Subst) -> Term {
    let mut cur = term;
    while let Term::Var(v) = cur {
        match subst.get(v) {
            Some(next) => cur = next,
            None => break,
        }
    }
    cur.clone()
}

pub fn resolve_args(args: &[Term], subst: &Subst) -> Vec<Term> {
    args.iter().map(|a| resolve(a, subst)).collect()
}

/// True if `var` occurs in `term`, chasing bindings through `subst`.
/// Guards every fresh binding in `unify_var`.
fn occurs(var: &str, term: &Term, subst: &Subst) -> bool {
    match term {
        Term::Var(v) if v == var => true,
        Term::Var(v) => subst
            .get(v)
            .map_or(false, |bound| occurs(var, bound, subst)),
        _ => false,
    }
}

/// Combine two substitutions into one that behaves like applying
/// `first`, then `second`. The prover threads one evolving substitution
/// instead; this is for composing independently derived bindings.
pub fn compose(first: &Subst, second: &Subst) -> Subst {
    let mut out = Subst::new();
    for (var, val) in first {
        let resolved = match val {
            Term::Var(v) => second.get(v).cloned().unwrap_or_else(|| val.clone()),
            _ => val.clone(),
        };
        out.insert(var.clone(), resolved);
    }
    for (var, val) in second {
        out.entry(var.clone()).or_insert_with(|| val.clone());
    }
    out
}

//
// ------------------------- Unification -------------------------
//

/// Unify two terms under `subst`. Never mutates the caller's
/// substitution; success returns an extended copy.
pub fn unify(x: &Term, y: &Term, subst: &Subst) -> Option<Subst> {
    if x == y {
        return Some(subst.clone());
    }
    if let Term::Var(v) = x {
        return unify_var(v, y, subst);
    }
    if let Term::Var(v) = y {
        return unify_var(v, x, subst);
    }
    None
}

/// Unify two argument lists elementwise, left to right.
/// Lists of unequal length never unify.
pub fn unify_args(xs: &[Term], ys: &[Term], subst: &Subst) -> Option<Subst> {
    if xs.len() != ys.len() {
        return None;
    }
    let mut theta = subst.clone();
    for (x, y) in xs.iter().zip(ys) {
        theta = unify(x, y, &theta)?;
    }
    Some(theta)
}

fn unify_var(var: &str, term: &Term, subst: &Subst) -> Option<Subst> {
    if let Some(bound) = subst.get(var) {
        return unify(bound, term, subst);
    }
    // Bind against the other side's value first, so X=Y, Y=a resolves
    // correctly regardless of bind order.
    if let Term::Var(v) = term {
        if let Some(bound) = subst.get(v) {
            return unify(&Term::Var(var.to_string()), bound, subst);
        }
    }
    if occurs(var, term, subst) {
        return None;
    }
    let mut theta = subst.clone();
    theta.insert(var.to_string(), term.clone());
    Some(theta)
}

//
// ------------------------- Rule freshening -------------------------
//

/// Copy of `rule` with every distinct variable `V` renamed to `V__<uid>`.
/// Called once per rule application so bindings from one application of a
/// recursive or reused rule never leak into another.
pub fn rename_rule(rule: &Rule, uid: usize) -> Rule {
    let mut map: HashMap<String, String> = HashMap::new();
    let mut fresh_term = |t: &Term| match t {
        Term::Var(v) => {
            let nv = map
                .entry(v.clone())
                .or_insert_with(|| format!("{v}__{uid}"))
                .clone();
            Term::Var(nv)
        }
        _ => t.clone(),
    };

    let head = Atom {
        pred: rule.head.pred.clone(),
        args: rule.head.args.iter().map(&mut fresh_term).collect(),
    };
    let body = rule
        .body
        .iter()
        .map(|lit| Literal {
            pred: lit.pred.clone(),
            args: lit.args.iter().map(&mut fresh_term).collect(),
            negated: lit.negated,
        })
        .collect();

    Rule { head, body }
}

//
// ------------------------- Builtins -------------------------
//

pub fn is_builtin(pred: &str) -> bool {
    matches!(pred, "GreaterThan" | "LessThan")
}

fn int_value(term: &Term) -> Option<i64> {
    match term {
        Term::Int(i) => Some(*i),
        Term::Str(s) => s.parse().ok(),
        Term::Var(_) => None,
    }
}

/// Evaluate a comparison builtin against the resolved arguments.
/// Builtins are tests, not generators: an unbound argument, a missing
/// argument, an incomparable pair, or an unknown predicate all evaluate
/// to false rather than erroring.
pub fn eval_builtin(pred: &str, args: &[Term], subst: &Subst) -> bool {
    let resolved = resolve_args(args, subst);
    let (a, b) = match resolved.as_slice() {
        [a, b, ..] => (a, b),
        _ => return false,
    };
    if a.is_var() || b.is_var() {
        return false;
    }

    let ord = match (int_value(a), int_value(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (None, None) => match (a, b) {
            (Term::Str(x), Term::Str(y)) => x.cmp(y),
            _ => return false,
        },
        _ => return false,
    };

    match pred {
        "GreaterThan" => ord == std::cmp::Ordering::Greater,
        "LessThan" => ord == std::cmp::Ordering::Less,
        _ => false,
    }
}

//
// ------------------------- Backward chaining -------------------------
//

/// Goal-directed prover over a fixed fact and rule base.
///
/// Proof search is depth-first and left to right; each satisfying
/// substitution is handed to an `emit` callback whose boolean return
/// aborts the remaining search, which is what lets negation as failure
/// stop at the first positive proof.
pub struct Prover<'a> {
    facts: &'a [Atom],
    rules: &'a [Rule],
    fresh: Cell<usize>,
}

impl<'a> Prover<'a> {
    pub fn new(facts: &'a [Atom], rules: &'a [Rule]) -> Self {
        Prover {
            facts,
            rules,
            fresh: Cell::new(0),
        }
    }

    /// All solutions for a single query literal, in discovery order:
    /// facts before rules, both in stored order, depth-first over
    /// conjunctions.
    pub fn solve(&self, query: &Literal) -> Vec<Solution> {
        let mut out = Vec::new();
        let root = Subst::new();
        self.prove_literal(query, &root, 0, &mut |theta| {
            out.push(normalize(query, theta));
            true
        });
        out
    }

    fn next_uid(&self) -> usize {
        let n = self.fresh.get();
        self.fresh.set(n + 1);
        n
    }

    /// Dispatch order is fixed: negation wraps everything, then
    /// builtins, then facts, then rules.
    fn prove_literal(
        &self,
        lit: &Literal,
        subst: &Subst,
        depth: usize,
        emit: &mut dyn FnMut(&Subst) -> bool,
    ) -> bool {
        if depth > MAX_DEPTH {
            return true;
        }

        if lit.negated {
            let positive = Literal {
                negated: false,
                ..lit.clone()
            };
            let mut disproved = false;
            self.prove_literal(&positive, subst, depth + 1, &mut |_| {
                disproved = true;
                false
            });
            if !disproved {
                // Negation never binds: yield the caller's substitution.
                return emit(subst);
            }
            return true;
        }

        if is_builtin(&lit.pred) {
            if eval_builtin(&lit.pred, &lit.args, subst) {
                return emit(subst);
            }
            return true;
        }

        for fact in self.facts.iter().filter(|f| f.pred == lit.pred) {
            if let Some(theta) = unify_args(&lit.args, &fact.args, subst) {
                if !emit(&theta) {
                    return false;
                }
            }
        }

        for rule in self.rules.iter().filter(|r| r.head.pred == lit.pred) {
            let fresh = rename_rule(rule, self.next_uid());
            if let Some(theta) = unify_args(&lit.args, &fresh.head.args, subst) {
                if !self.prove_all(&fresh.body, &theta, depth + 1, emit) {
                    return false;
                }
            }
        }

        true
    }

    /// Prove a conjunction: every solution of the first literal is
    /// extended through the rest, backtracking chronologically.
    fn prove_all(
        &self,
        lits: &[Literal],
        subst: &Subst,
        depth: usize,
        emit: &mut dyn FnMut(&Subst) -> bool,
    ) -> bool {
        match lits.split_first() {
            None => emit(subst),
            Some((first, rest)) => self.prove_literal(first, subst, depth, &mut |theta| {
                self.prove_all(rest, theta, depth, &mut *emit)
            }),
        }
    }
}

//
// ------------------------- Query driver -------------------------
//

/// Prove `query` against `facts` and `rules`, returning every answer in
/// discovery order.
pub fn ask(query: &Literal, facts: &[Atom], rules: &[Rule]) -> Vec<Solution> {
    Prover::new(facts, rules).solve(query)
}

/// Restrict a proof substitution to the query's own variables, fully
/// dereferenced so no chains remain.
fn normalize(query: &Literal, theta: &Subst) -> Solution {
    let mut sol = Solution::new();
    for var in query.variables() {
        let value = resolve(&Term::Var(var.clone()), theta);
        sol.insert(var, value);
    }
    sol
}
