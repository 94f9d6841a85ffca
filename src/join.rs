use std::collections::HashSet;

use log::trace;

use crate::{
    row::{Row, RowType},
    Molecules,
};

/// One line of the joined table: either the requested properties of a molecule
/// found in the haystack, or the id of a needle that was not there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Hit(Row),
    Miss(String),
}

impl Entry {
    pub fn id(&self) -> &str {
        match self {
            Entry::Hit(row) => row.id(),
            Entry::Miss(id) => id.as_str(),
        }
    }

    pub fn row(&self) -> Option<&Row> {
        match self {
            Entry::Hit(row) => Some(row),
            Entry::Miss(_) => None,
        }
    }
}

/// look up each id in `needle` in `haystack` and build a row of `row_type` from
/// its properties. properties missing from a haystack record are left empty.
/// ids not in `haystack` are dropped unless `include_missing` is set, in which
/// case they are kept as [Entry::Miss].
///
/// the result is sorted by the non-id columns in order, comparing cells that
/// parse as integers numerically, then by id. misses come last
pub fn join_results(
    haystack: &Molecules,
    needle: &HashSet<String>,
    row_type: &RowType,
    include_missing: bool,
) -> Vec<Entry> {
    let mut ret = Vec::with_capacity(needle.len());
    for mol in needle {
        let Some(props) = haystack.get(mol) else {
            if include_missing {
                ret.push(Entry::Miss(mol.clone()));
            }
            continue;
        };
        let cells = row_type
            .names()
            .iter()
            .map(|prop| props.get(prop).cloned().unwrap_or_default())
            .collect();
        let row = Row::new(cells);
        trace!("{mol}: {}", row_type.describe(&row));
        ret.push(Entry::Hit(row));
    }

    ret.sort_by_cached_key(sort_key);
    ret
}

/// a single cell in a sort key. integers sort before everything else.
/// integers outside the range of `i128` are not recognized and sort as text,
/// after all of the integers that are
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Cell {
    Int(i128),
    Text(String),
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        match s.trim().parse() {
            Ok(n) => Cell::Int(n),
            Err(_) => Cell::Text(s.to_owned()),
        }
    }
}

fn sort_key(entry: &Entry) -> (bool, Vec<Cell>, String) {
    match entry {
        Entry::Hit(row) => {
            let cells = row.cells()[1..].iter().map(|c| c.as_str().into());
            (false, cells.collect(), row.id().to_owned())
        }
        Entry::Miss(id) => (true, Vec::new(), id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::Properties;

    use super::*;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect()
    }

    fn haystack(rows: &[&[(&str, &str)]]) -> Molecules {
        rows.iter()
            .map(|row| {
                let p = props(row);
                (p["ID"].clone(), p)
            })
            .collect()
    }

    fn needle(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|&s| s.to_owned()).collect()
    }

    fn ids(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(Entry::id).collect()
    }

    #[test]
    fn single_match() {
        let h = haystack(&[
            &[("ID", "A"), ("MW", "10")],
            &[("ID", "B"), ("MW", "20")],
        ]);
        let rt = RowType::new("MW", "ID").unwrap();
        let got = join_results(&h, &needle(&["B"]), &rt, false);
        let want = vec![Entry::Hit(Row::new(vec!["B".into(), "20".into()]))];
        assert_eq!(got, want);
    }

    #[test]
    fn restricted_to_columns() {
        let h = haystack(&[
            &[("ID", "A"), ("MW", "10"), ("LogP", "1.2"), ("NAME", "x")],
            &[("ID", "B"), ("MW", "20"), ("LogP", "0.4"), ("NAME", "y")],
        ]);
        let rt = RowType::new("LogP MW", "ID").unwrap();
        let got = join_results(&h, &needle(&["A", "B"]), &rt, false);
        for entry in &got {
            let row = entry.row().unwrap();
            let want: Vec<_> = rt
                .names()
                .iter()
                .map(|n| h[entry.id()][n].clone())
                .collect();
            assert_eq!(row.cells(), want.as_slice());
        }
        assert_eq!(ids(&got), vec!["B", "A"]);
    }

    #[test]
    fn missing_property_is_blank() {
        let h = haystack(&[&[("ID", "A")]]);
        let rt = RowType::new("MW", "ID").unwrap();
        let got = join_results(&h, &needle(&["A"]), &rt, false);
        assert_eq!(got[0].row().unwrap().cells(), &["A", ""]);
    }

    #[test]
    fn numeric_order() {
        let h = haystack(&[
            &[("ID", "A"), ("MW", "10")],
            &[("ID", "B"), ("MW", "2")],
            &[("ID", "C"), ("MW", "n/a")],
            &[("ID", "D"), ("MW", " -7 ")],
            &[("ID", "E"), ("MW", "2")],
        ]);
        let rt = RowType::new("MW", "ID").unwrap();
        let n = needle(&["A", "B", "C", "D", "E"]);
        let got = join_results(&h, &n, &rt, false);
        assert_eq!(ids(&got), vec!["D", "B", "E", "A", "C"]);
    }

    #[test]
    fn huge_integers_sort_as_text() {
        let huge = "1".repeat(40);
        let h = haystack(&[
            &[("ID", "A"), ("MW", huge.as_str())],
            &[("ID", "B"), ("MW", "5")],
            &[("ID", "C"), ("MW", "abc")],
        ]);
        let rt = RowType::new("MW", "ID").unwrap();
        let got = join_results(&h, &needle(&["A", "B", "C"]), &rt, false);
        assert_eq!(ids(&got), vec!["B", "A", "C"]);
        assert_eq!(Cell::from(huge.as_str()), Cell::Text(huge.clone()));
    }

    #[test]
    fn later_columns_break_ties() {
        let h = haystack(&[
            &[("ID", "A"), ("X", "1"), ("Y", "b")],
            &[("ID", "B"), ("X", "1"), ("Y", "a")],
            &[("ID", "C"), ("X", "0"), ("Y", "z")],
        ]);
        let rt = RowType::new("X,Y", "ID").unwrap();
        let got = join_results(&h, &needle(&["A", "B", "C"]), &rt, false);
        assert_eq!(ids(&got), vec!["C", "B", "A"]);
    }

    #[test]
    fn misses() {
        let h = haystack(&[&[("ID", "A"), ("MW", "10")]]);
        let rt = RowType::new("MW", "ID").unwrap();
        let n = needle(&["Z", "A", "Y"]);

        let got = join_results(&h, &n, &rt, false);
        assert_eq!(ids(&got), vec!["A"]);

        let got = join_results(&h, &n, &rt, true);
        assert_eq!(ids(&got), vec!["A", "Y", "Z"]);
        assert_eq!(got[1], Entry::Miss("Y".to_owned()));
    }

    #[test]
    fn empty_inputs() {
        let rt = RowType::new("", "ID").unwrap();
        assert!(join_results(&HashMap::new(), &needle(&["A"]), &rt, false)
            .is_empty());
    }
}
