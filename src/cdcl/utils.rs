use super::literal::Literal;

/// Formats the final model as a DIMACS values line: every assigned literal in
/// variable order, positive for true and negative for false, closed by `0`.
pub fn format_solution(model: &[Literal]) -> String {
    let mut line = String::new();
    for lit in model {
        line.push_str(&lit.to_dimacs().to_string());
        line.push(' ');
    }
    line.push('0');
    line
}
