//! GitHub-style pipe tables
//!
//! Numeric columns are right-aligned on the decimal point, text columns are
//! left-aligned, and every column is at least two characters wider than its
//! header.

/// One table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Cell::Text(text)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

const MIN_PADDING: usize = 2;
const SIGNIFICANT_DIGITS: i32 = 6;

/// Format like C's `%g`: six significant digits, trailing zeros trimmed,
/// scientific notation for exponents below -4 or from 6 up
pub fn format_general(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let precision = (SIGNIFICANT_DIGITS - 1) as usize;
    let scientific = format!("{:.*e}", precision, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= SIGNIFICANT_DIGITS {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exponent).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(digits: &str) -> &str {
    if digits.contains('.') {
        digits.trim_end_matches('0').trim_end_matches('.')
    } else {
        digits
    }
}

/// Characters after the decimal point (or exponent marker), -1 for integers
fn after_point(text: &str) -> isize {
    if text.parse::<f64>().is_err() || text.parse::<i64>().is_ok() {
        return -1;
    }
    let position = text.rfind('.').or_else(|| text.to_lowercase().rfind('e'));
    match position {
        Some(position) => (text.len() - position - 1) as isize,
        None => -1,
    }
}

fn width(text: &str) -> usize {
    text.chars().count()
}

struct Column {
    header: String,
    cells: Vec<String>,
    width: usize,
    numeric: bool,
}

impl Column {
    fn build(header: &str, cells: Vec<&Cell>) -> Self {
        let numeric = !cells.is_empty() && cells.iter().all(|c| matches!(c, Cell::Number(_)));

        let mut texts: Vec<String> = cells
            .iter()
            .map(|cell| match cell {
                Cell::Text(text) => text.clone(),
                Cell::Number(value) => format_general(*value),
            })
            .collect();

        if numeric {
            let decimals: Vec<isize> = texts.iter().map(|t| after_point(t)).collect();
            let most = decimals.iter().copied().max().unwrap_or(-1);
            for (text, own) in texts.iter_mut().zip(decimals) {
                text.push_str(&" ".repeat((most - own) as usize));
            }
        }

        let widest = texts.iter().map(|t| width(t)).max().unwrap_or(0);
        Self {
            header: header.to_string(),
            cells: texts,
            width: widest.max(width(header) + MIN_PADDING),
            numeric,
        }
    }

    fn align(&self, text: &str) -> String {
        let fill = " ".repeat(self.width.saturating_sub(width(text)));
        if self.numeric {
            format!("{fill}{text}")
        } else {
            format!("{text}{fill}")
        }
    }
}

fn line(cells: impl Iterator<Item = String>) -> String {
    format!("| {} |", cells.collect::<Vec<_>>().join(" | "))
}

/// Render rows under `headers`; lines are joined without a trailing newline
pub fn render(headers: &[&str], rows: &[Vec<Cell>]) -> String {
    let blank = Cell::Text(String::new());
    let columns: Vec<Column> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            let cells = rows.iter().map(|row| row.get(index).unwrap_or(&blank)).collect();
            Column::build(header, cells)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(line(columns.iter().map(|c| c.align(&c.header))));
    lines.push(format!(
        "|{}|",
        columns
            .iter()
            .map(|c| "-".repeat(c.width + 2))
            .collect::<Vec<_>>()
            .join("|")
    ));
    for row in 0..rows.len() {
        lines.push(line(columns.iter().map(|c| c.align(&c.cells[row]))));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_general() {
        assert_eq!(format_general(0.9), "0.9");
        assert_eq!(format_general(10.0), "10");
        assert_eq!(format_general(-2.5), "-2.5");
        assert_eq!(format_general(0.1 + 0.2), "0.3");
        assert_eq!(format_general(123456.0), "123456");
        assert_eq!(format_general(1234567.0), "1.23457e+06");
        assert_eq!(format_general(999999.5), "1e+06");
        assert_eq!(format_general(0.0001), "0.0001");
        assert_eq!(format_general(0.00001), "1e-05");
        assert_eq!(format_general(0.0), "0");
        assert_eq!(format_general(f64::NAN), "nan");
        assert_eq!(format_general(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_after_point() {
        assert_eq!(after_point("12"), -1);
        assert_eq!(after_point("0.25"), 2);
        assert_eq!(after_point("1e-05"), 3);
        assert_eq!(after_point("nan"), -1);
        assert_eq!(after_point("reward"), -1);
    }

    #[test]
    fn test_render_single_row() {
        let table = render(
            &["episodes", "epsilon"],
            &[vec![Cell::Number(3.0), Cell::Number(0.9)]],
        );
        let expected = "\
|   episodes |   epsilon |
|------------|-----------|
|          3 |       0.9 |";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_render_aligns_decimals() {
        let table = render(
            &["category", "highest"],
            &[
                vec!["reward".into(), 12.0.into()],
                vec!["difficulty".into(), 0.2.into()],
            ],
        );
        let expected = "\
| category   |   highest |
|------------|-----------|
| reward     |      12   |
| difficulty |       0.2 |";
        assert_eq!(table, expected);
    }

    #[test]
    fn test_render_wide_cells_grow_column() {
        let table = render(&["x"], &[vec!["a long label".into()]]);
        assert_eq!(
            table,
            "| x            |\n|--------------|\n| a long label |"
        );
    }

    #[test]
    fn test_render_headers_only() {
        assert_eq!(render(&["a"], &[]), "| a   |\n|-----|");
    }
}
