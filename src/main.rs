use std::env;
use std::process;

mod cdcl;
mod parser;

use cdcl::restart::{LubyRestarts, LUBY_UNIT};
use cdcl::{Cdcl, SatResult};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: {} <dimacs-cnf-file>", args[0]);
        process::exit(1);
    }
    let (cnf, num_vars) = match parser::read_from_file(&args[1]) {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("c {err}");
            process::exit(1);
        }
    };

    let mut solver = Cdcl::new(&cnf, num_vars, LubyRestarts::new(LUBY_UNIT));
    let result = solver.run();

    let stats = solver.stats();
    println!(
        "c {} decisions, {} conflicts, {} restarts",
        stats.decisions, stats.conflicts, stats.restarts
    );
    match result {
        SatResult::Sat(model) => {
            println!("s SATISFIABLE");
            println!("v {}", cdcl::utils::format_solution(&model));
        }
        SatResult::Unsat => println!("s UNSATISFIABLE"),
        SatResult::Unknown => {
            println!("s UNKNOWN");
            process::exit(2);
        }
    }
}
