// Horn-clause FOL reasoner front end.
//
// Behavior:
// - Loads a knowledge base of `Pred(args).` facts and `Head :- Body.` rules.
// - Answers queries by backward chaining with negation as failure.
// - Queries come from extra command-line arguments, or interactively
//   from stdin (`exit`, `quit`, `help`).

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};

use hornlite::{ask, parse_kb, parse_query, Atom, Literal, Rule, Solution};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args()
        .nth(1)
        .expect("usage: hornlite <kb.fol> [query ...]");
    let input = fs::read_to_string(path)?;
    let (facts, rules) = parse_kb(&input)?;
    eprintln!("KB loaded: {} facts, {} rules.", facts.len(), rules.len());

    let queries: Vec<String> = env::args().skip(2).collect();
    if !queries.is_empty() {
        for q in &queries {
            println!("Query: {q}");
            run_query(q, &facts, &rules);
        }
        return Ok(());
    }

    println!("Type a query like:   NeedsCooling(X)?");
    println!("Commands: 'exit', 'quit', 'help'\n");

    let stdin = io::stdin();
    loop {
        print!("Query > ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();

        match line.to_ascii_lowercase().as_str() {
            "" => continue,
            "exit" | "quit" => break,
            "help" => {
                print_help();
                continue;
            }
            _ => run_query(line, &facts, &rules),
        }
    }

    Ok(())
}

fn run_query(input: &str, facts: &[Atom], rules: &[Rule]) {
    let query = match parse_query(input) {
        Ok(q) => q,
        Err(e) => {
            eprintln!("Error parsing query: {e}");
            return;
        }
    };
    let solutions = ask(&query, facts, rules);
    display_solutions(&query, &solutions);
}

fn display_solutions(query: &Literal, solutions: &[Solution]) {
    if solutions.is_empty() {
        println!("  No solutions.");
        return;
    }

    let vars = query.variables();
    println!("  Solutions found: {}", solutions.len());

    for sol in solutions {
        if vars.is_empty() {
            println!("   - Yes.");
            continue;
        }
        let pairs: Vec<String> = vars
            .iter()
            .map(|v| match sol.get(v) {
                Some(value) => format!("{v} = {value}"),
                None => format!("{v} = {v}"),
            })
            .collect();
        println!("   - {}", pairs.join(", "));
    }
}

fn print_help() {
    println!(
        "
Enter queries in FOL form, for example:
   NeedsCooling(X)?
   TurnOnAC(Room)?
   Occupied(living_room)?
   not(NeedsCooling(kitchen))?

Commands:
   exit  - leave the program
   help  - show this help message
"
    );
}
