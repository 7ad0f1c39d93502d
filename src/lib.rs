mod ast;
mod parser;
mod reasoner;

pub use ast::*;
pub use parser::{parse_kb, parse_query, ParseError};
pub use reasoner::{
    ask,
    compose,
    eval_builtin,
    is_builtin,
    rename_rule,
    resolve,
    resolve_args,
    unify,
    unify_args,
    Prover,
    Solution,
    Subst,
};
