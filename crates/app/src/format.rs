//! Terminal rendering of questions, times and matrices, and answer parsing.

use anyhow::{Result, anyhow, bail};
use drill_core::Matrix;
use drill_core::model::{Answer, Question};
use services::SessionProgress;

const BAR_WIDTH: usize = 24;

/// Milliseconds as seconds with two decimals, e.g. `1.25s`.
#[allow(clippy::cast_precision_loss)]
pub fn seconds(ms: u64) -> String {
    format!("{:.2}s", ms as f64 / 1_000.0)
}

pub fn seconds_f(ms: f64) -> String {
    format!("{:.2}s", ms / 1_000.0)
}

/// Rows of a matrix, one per line, entries right-aligned.
pub fn matrix(m: &Matrix) -> Vec<String> {
    let width = m
        .columns()
        .iter()
        .flatten()
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1);
    m.rows()
        .iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:>width$}")).collect();
            format!("[ {} ]", cells.join(" "))
        })
        .collect()
}

/// Lines that present a question.
pub fn question(q: &Question) -> Vec<String> {
    match q {
        Question::Arithmetic(q) => vec![format!("{q} = ?")],
        Question::Matrix(q) => {
            let mut lines = matrix(&q.mat1);
            lines.push(format!("  {}", q.oper.symbol()));
            lines.extend(matrix(&q.mat2));
            lines.push("answer rows separated by ';', e.g. `1 2; 3 4`".to_owned());
            lines
        }
    }
}

pub fn progress_bar(progress: &SessionProgress) -> String {
    let filled = (progress.fraction() * BAR_WIDTH as f64).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let filled = (filled as usize).min(BAR_WIDTH);
    format!(
        "[{}{}] {}/{}",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        progress.answered,
        progress.total
    )
}

/// Parse typed input as an answer to `q`.
///
/// Matrix answers are entered row by row: entries separated by spaces or
/// commas, rows by `;`.
pub fn parse_answer(q: &Question, input: &str) -> Result<Answer> {
    let input = input.trim();
    match q {
        Question::Arithmetic(_) => input
            .parse::<i64>()
            .map(Answer::Number)
            .map_err(|_| anyhow!("expected a whole number")),
        Question::Matrix(_) => parse_matrix(input).map(Answer::Matrix),
    }
}

fn parse_matrix(input: &str) -> Result<Matrix> {
    let rows: Vec<Vec<i64>> = input
        .split(';')
        .map(|row| {
            row.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<i64>().map_err(|_| anyhow!("`{s}` is not a number")))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<_>>()?;

    let width = rows.first().map_or(0, Vec::len);
    if width == 0 {
        bail!("empty matrix");
    }
    if rows.iter().any(|row| row.len() != width) {
        bail!("every row needs {width} entries");
    }

    let columns = (0..width)
        .map(|col| rows.iter().map(|row| row[col]).collect())
        .collect();
    Ok(Matrix::from_columns(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::generator::generate_question;
    use drill_core::matrix;
    use drill_core::model::{MathOperator, MatrixOperator, MatrixQuestion};

    fn matrix_question() -> Question {
        Question::Matrix(MatrixQuestion {
            mat1: matrix::zeros(1, 2),
            mat2: matrix::zeros(2, 1),
            oper: MatrixOperator::Mul,
            ans: matrix::zeros(2, 2),
        })
    }

    #[test]
    fn seconds_have_two_decimals() {
        assert_eq!(seconds(1_250), "1.25s");
        assert_eq!(seconds(9_900), "9.90s");
        assert_eq!(seconds_f(500.0), "0.50s");
    }

    #[test]
    fn arithmetic_answers_are_integers() {
        let q = Question::Arithmetic(generate_question(3, 4, MathOperator::Add).unwrap());
        assert_eq!(parse_answer(&q, " 7 \n").unwrap(), Answer::Number(7));
        assert!(parse_answer(&q, "seven").is_err());
        assert_eq!(question(&q), vec!["3 + 4 = ?".to_owned()]);
    }

    #[test]
    fn matrix_answers_are_read_row_by_row() {
        let answer = parse_answer(&matrix_question(), "1 2; 3,4").unwrap();
        let expected = Matrix::from_columns(vec![vec![1, 3], vec![2, 4]]).unwrap();
        assert_eq!(answer, Answer::Matrix(expected));

        assert!(parse_answer(&matrix_question(), "1 2; 3").is_err());
        assert!(parse_answer(&matrix_question(), "").is_err());
    }

    #[test]
    fn matrices_render_rows() {
        let m = Matrix::from_columns(vec![vec![1, 30], vec![2, 4]]).unwrap();
        assert_eq!(matrix(&m), vec!["[  1  2 ]", "[ 30  4 ]"]);
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        let half = SessionProgress {
            total: 4,
            answered: 2,
            remaining: 2,
            is_complete: false,
        };
        let bar = progress_bar(&half);
        assert!(bar.starts_with(&format!("[{}{}]", "#".repeat(12), "-".repeat(12))));
        assert!(bar.ends_with("2/4"));
    }
}
