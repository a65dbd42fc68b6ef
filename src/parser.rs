use std::fs;
use std::io;
use std::path::Path;

use dimacs::{parse_dimacs, Instance, Sign};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("file I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed DIMACS input: {0:?}")]
    Parse(dimacs::ParseError),
    #[error("expected a CNF instance, got a SAT formula")]
    NotCnf,
}

/// Parses DIMACS CNF text into the clause list the solver consumes, plus the
/// declared variable count.
pub fn parse_cnf(contents: &str) -> Result<(Vec<Vec<i64>>, usize), SolverError> {
    let (num_vars, clauses) = match parse_dimacs(contents).map_err(SolverError::Parse)? {
        Instance::Cnf { num_vars, clauses } => (num_vars, clauses),
        Instance::Sat { .. } => return Err(SolverError::NotCnf),
    };
    let cnf = clauses
        .iter()
        .map(|clause| {
            clause
                .lits()
                .iter()
                .map(|l| {
                    let var = l.var().to_u64() as i64;
                    match l.sign() {
                        Sign::Pos => var,
                        Sign::Neg => -var,
                    }
                })
                .collect()
        })
        .collect();
    Ok((cnf, num_vars as usize))
}

pub fn read_from_file(path: impl AsRef<Path>) -> Result<(Vec<Vec<i64>>, usize), SolverError> {
    let contents = fs::read_to_string(path)?;
    parse_cnf(&contents)
}
