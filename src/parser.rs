use pest::iterators::Pair;
use pest::Parser as PestParser; // <- trait (gives KbParser::parse)
use pest_derive::Parser;        // <- derive macro (generates Rule enum + impl)
use thiserror::Error;

use crate::ast::{self, Atom, Literal, Term};

#[derive(Parser)]
#[grammar = "kb.pest"]
struct KbParser;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("parse error: {0}")]
    Pest(#[from] pest::error::Error<Rule>),
    #[error("unexpected rule: {0:?}")]
    Unexpected(Rule),
    #[error("integer literal out of range: {0}")]
    IntegerRange(String),
    #[error("fact '{fact}' is not ground: variable {var}")]
    NonGroundFact { fact: String, var: String },
}

/// Parse a knowledge-base text into its fact and rule lists, in
/// declaration order. Facts must be ground.
pub fn parse_kb(input: &str) -> Result<(Vec<Atom>, Vec<ast::Rule>), ParseError> {
    let mut pairs = KbParser::parse(Rule::document, input)?;
    let doc = pairs.next().unwrap();

    let mut facts = vec![];
    let mut rules = vec![];

    for item in doc.into_inner() {
        if item.as_rule() != Rule::statement {
            continue; // EOI
        }
        let inner = item.into_inner().next().unwrap();
        match inner.as_rule() {
            Rule::fact_stmt => {
                let atom = build_atom(inner.into_inner().next().unwrap())?;
                if let Some(Term::Var(v)) = atom.args.iter().find(|a| a.is_var()) {
                    return Err(ParseError::NonGroundFact {
                        fact: atom.to_string(),
                        var: v.clone(),
                    });
                }
                facts.push(atom);
            }
            Rule::rule_stmt => rules.push(build_rule(inner)?),
            r => return Err(ParseError::Unexpected(r)),
        }
    }

    Ok((facts, rules))
}

/// Parse a single query literal, with an optional trailing `?`.
pub fn parse_query(input: &str) -> Result<Literal, ParseError> {
    let mut pairs = KbParser::parse(Rule::query, input)?;
    let query = pairs.next().unwrap();
    let lit = query.into_inner().next().unwrap();
    build_literal(lit)
}

fn build_rule(pair: Pair<Rule>) -> Result<ast::Rule, ParseError> {
    let mut it = pair.into_inner();
    let head = build_atom(it.next().unwrap())?;
    let body = it.map(build_literal).collect::<Result<Vec<_>, _>>()?;
    Ok(ast::Rule { head, body })
}

fn build_literal(pair: Pair<Rule>) -> Result<Literal, ParseError> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::neg_literal => {
            let atom_pair = inner
                .into_inner()
                .find(|p| p.as_rule() == Rule::atom)
                .unwrap();
            let atom = build_atom(atom_pair)?;
            Ok(Literal {
                pred: atom.pred,
                args: atom.args,
                negated: true,
            })
        }
        Rule::atom => {
            let atom = build_atom(inner)?;
            Ok(Literal {
                pred: atom.pred,
                args: atom.args,
                negated: false,
            })
        }
        r => Err(ParseError::Unexpected(r)),
    }
}

fn build_atom(pair: Pair<Rule>) -> Result<Atom, ParseError> {
    let mut it = pair.into_inner();
    let pred = it.next().unwrap().as_str().to_string();
    let args = it.map(build_term).collect::<Result<Vec<_>, _>>()?;
    Ok(Atom { pred, args })
}

fn build_term(pair: Pair<Rule>) -> Result<Term, ParseError> {
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::integer => inner
            .as_str()
            .parse()
            .map(Term::Int)
            .map_err(|_| ParseError::IntegerRange(inner.as_str().to_string())),
        Rule::ident => Ok(Term::symbol(inner.as_str())),
        r => Err(ParseError::Unexpected(r)),
    }
}
