// Self-contained smart-home entailment demo.

use hornlite::{ask, parse_kb, parse_query};

const KB: &str = "\
% Sensor snapshot.
Occupied(living_room).
Occupied(kitchen).
Temperature(living_room, 29).
Temperature(kitchen, 31).
Temperature(bedroom, 21).
AcBroken(kitchen).

% Comfort policy.
NeedsCooling(Room) :- Occupied(Room), Temperature(Room, T), GreaterThan(T, 25).
TurnOnAC(Room) :- NeedsCooling(Room), not(AcBroken(Room)).
";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (facts, rules) = parse_kb(KB)?;

    for input in [
        "NeedsCooling(X)?",
        "TurnOnAC(X)?",
        "not(NeedsCooling(bedroom))?",
    ] {
        let query = parse_query(input)?;
        let solutions = ask(&query, &facts, &rules);

        println!("Query: {input}");
        if solutions.is_empty() {
            println!("  No solutions.");
            continue;
        }
        for sol in &solutions {
            let vars = query.variables();
            if vars.is_empty() {
                println!("  Yes.");
                continue;
            }
            for v in vars {
                match sol.get(&v) {
                    Some(value) => println!("  {v} = {value}"),
                    None => println!("  {v} = {v}"),
                }
            }
        }
    }

    Ok(())
}
