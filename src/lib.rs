use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

use log::{info, warn};

pub use error::{Error, Result};
use join::Entry;
use row::RowType;

pub mod config;
pub mod error;
pub mod join;
pub mod output;
pub mod row;
pub mod sdf;
pub mod sniff;
pub mod table;

/// property name to raw value for a single molecule
pub type Properties = HashMap<String, String>;

/// molecule id to its properties
pub type Molecules = HashMap<String, Properties>;

/// lowercase extension of `path`, without the dot
fn extension(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// read a haystack or needle file, choosing the format from its extension.
/// `.csv` files are read as CSV and everything else as SDF. the first of
/// `prop_names` is the id property
pub fn read_input_file(
    path: impl AsRef<Path>,
    prop_names: &[String],
) -> Result<Molecules> {
    let path = path.as_ref();
    let id_prop = prop_names.first().ok_or(Error::EmptyId)?;

    info!("{}: reading...", path.display());

    let ret = match extension(path).as_str() {
        "csv" => table::read_csv(path, prop_names)?,
        ext => {
            if ext != "sdf" {
                warn!("{}: will be treated as SDF", path.display());
            }
            sdf::parse_sdf(path, id_prop)?
        }
    };

    info!("done: {} molecules", ret.len());

    Ok(ret)
}

/// the union of the molecule ids found in each of `paths`
pub fn load_needles(
    paths: &[impl AsRef<Path>],
    prop_names: &[String],
) -> Result<HashSet<String>> {
    let mut ret = HashSet::new();
    for path in paths {
        ret.extend(read_input_file(path, prop_names)?.into_keys());
    }
    Ok(ret)
}

/// write `table` to `path` as CSV for a `.csv` extension and as a list of ids
/// otherwise
pub fn write_output_file(
    path: impl AsRef<Path>,
    table: &[Entry],
    row_type: &RowType,
) -> Result<()> {
    let path = path.as_ref();

    match extension(path).as_str() {
        "csv" => output::write_csv(path, table, row_type)?,
        ext => {
            if ext != "lst" {
                warn!("{}: will be treated as LST", path.display());
            }
            output::write_lst(path, table)?
        }
    }

    info!("{}: result saved", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs::read_to_string;

    use tempfile::TempDir;

    use crate::join::join_results;

    use super::*;

    fn keys(m: &Molecules) -> Vec<&str> {
        let mut ret: Vec<_> = m.keys().map(String::as_str).collect();
        ret.sort();
        ret
    }

    #[test]
    fn dispatch_by_extension() {
        let rt = RowType::new("MW", "ID").unwrap();
        let names = rt.names();

        let sdf = read_input_file("testfiles/haystack.sdf", names).unwrap();
        assert_eq!(keys(&sdf), vec!["C1", "C2", "C3"]);

        let csv = read_input_file("testfiles/haystack.csv", names).unwrap();
        assert_eq!(keys(&csv), vec!["C1", "C2", "C3", "C4"]);

        // not .sdf, but still parsed as one
        let txt = read_input_file("testfiles/needle.txt", names).unwrap();
        assert_eq!(keys(&txt), vec!["C3"]);
    }

    #[test]
    fn needle_union() {
        let rt = RowType::new("", "ID").unwrap();
        let got = load_needles(
            &["testfiles/needle.csv", "testfiles/needle.txt"],
            rt.names(),
        )
        .unwrap();
        let mut got: Vec<_> = got.into_iter().collect();
        got.sort();
        assert_eq!(got, vec!["C2", "C3", "C9"]);
    }

    #[test]
    fn csv_end_to_end() {
        let dir = TempDir::new().unwrap();
        let h = dir.path().join("h.csv");
        let n = dir.path().join("n.csv");
        std::fs::write(&h, "ID,MW\nA,10\nB,20").unwrap();
        std::fs::write(&n, "ID\nB").unwrap();

        let rt = RowType::new("MW", "ID").unwrap();
        let haystack = read_input_file(&h, rt.names()).unwrap();
        let needle = load_needles(&[&n], rt.names()).unwrap();
        let got = join_results(&haystack, &needle, &rt, false);

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].row().unwrap().cells(), &["B", "20"]);
    }

    #[test]
    fn output_by_extension() {
        let dir = TempDir::new().unwrap();
        let rt = RowType::new("MW", "ID").unwrap();
        let row = row::Row::new(vec!["C1".into(), "16".into()]);
        let table = [Entry::Hit(row)];

        let csv = dir.path().join("out.CSV");
        write_output_file(&csv, &table, &rt).unwrap();
        assert_eq!(read_to_string(csv).unwrap(), "ID,MW\nC1,16\n");

        let lst = dir.path().join("out.txt");
        write_output_file(&lst, &table, &rt).unwrap();
        assert_eq!(read_to_string(lst).unwrap(), "*e*\n\n\nC1\n");
    }
}
