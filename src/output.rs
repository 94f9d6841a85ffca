use std::{
    fs::File,
    io::{self, BufWriter, Write},
    iter::{once, repeat},
    path::Path,
};

use crate::{
    error::{Error, Result},
    join::Entry,
    row::RowType,
};

/// marker line at the top of a list file, followed by two blank lines
const LST_PREAMBLE: &str = "*e*\n\n\n";

/// the cells of `entry`, padding a miss with empty cells after its id
fn cells<'a>(entry: &'a Entry, row_type: &RowType) -> Vec<&'a str> {
    match entry {
        Entry::Hit(row) => row.cells().iter().map(String::as_str).collect(),
        Entry::Miss(id) => once(id.as_str())
            .chain(repeat("").take(row_type.len() - 1))
            .collect(),
    }
}

/// write `table` to `out` with every column right-aligned to its widest cell,
/// followed by the number of rows
pub fn write_table(
    mut out: impl Write,
    table: &[Entry],
    row_type: &RowType,
) -> io::Result<()> {
    let header: Vec<&str> =
        row_type.names().iter().map(String::as_str).collect();
    let rows: Vec<Vec<&str>> =
        table.iter().map(|e| cells(e, row_type)).collect();

    let mut widths: Vec<usize> =
        header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[&str]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:>w$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    writeln!(out, "{}", line(&header))?;
    for row in &rows {
        writeln!(out, "{}", line(row))?;
    }
    writeln!(out)?;
    writeln!(out, "TOTAL: {}", rows.len())
}

pub fn print_table(table: &[Entry], row_type: &RowType) -> Result<()> {
    write_table(io::stdout().lock(), table, row_type)
        .map_err(|e| Error::io("<stdout>", e))
}

/// write `table` as CSV with a header row of the column names
pub fn write_csv(
    path: impl AsRef<Path>,
    table: &[Entry],
    row_type: &RowType,
) -> Result<()> {
    let path = path.as_ref();
    let mut wtr =
        csv::Writer::from_path(path).map_err(|e| Error::csv(path, e))?;
    wtr.write_record(row_type.names())
        .map_err(|e| Error::csv(path, e))?;
    for entry in table {
        wtr.write_record(cells(entry, row_type))
            .map_err(|e| Error::csv(path, e))?;
    }
    wtr.flush().map_err(|e| Error::io(path, e))
}

/// write the ids in `table`, one per line, after the list preamble
pub fn write_lst(path: impl AsRef<Path>, table: &[Entry]) -> Result<()> {
    let path = path.as_ref();
    let mut out = File::create(path)
        .map(BufWriter::new)
        .map_err(|e| Error::io(path, e))?;
    let mut write = || -> io::Result<()> {
        out.write_all(LST_PREAMBLE.as_bytes())?;
        for entry in table {
            writeln!(out, "{}", entry.id())?;
        }
        out.flush()
    };
    write().map_err(|e| Error::io(path, e))
}
