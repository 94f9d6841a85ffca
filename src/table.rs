use std::{collections::HashMap, path::Path};

use log::{debug, warn};

use crate::{
    error::{Error, Result},
    sniff::{sniff, SAMPLE_SIZE},
    Molecules, Properties,
};

/// read the delimited file at `path` into a map from the value of the first
/// entry of `prop_names` to the whole row. if the first line does not name that
/// column, the file is treated as headerless and `prop_names` are assigned to
/// the columns in order
pub fn read_csv(
    path: impl AsRef<Path>,
    prop_names: &[String],
) -> Result<Molecules> {
    let path = path.as_ref();
    let id_prop = prop_names.first().ok_or(Error::EmptyId)?;

    let data = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let dialect = sniff(&data[..data.len().min(SAMPLE_SIZE)]);
    debug!("{}: sniffed {dialect:?}", path.display());

    let data = dialect.normalize(&data);
    let records = dialect
        .reader_builder()
        .from_reader(&*data)
        .into_records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::csv(path, e))?;

    let (names, rows): (Vec<String>, _) = match records.split_first() {
        None => return Ok(HashMap::new()),
        Some((header, rows)) if header.iter().any(|h| h == id_prop) => {
            (header.iter().map(str::to_owned).collect(), rows)
        }
        Some(_) => {
            debug!(
                "{}: no {id_prop} column in the header, reading as headerless",
                path.display()
            );
            (prop_names.to_vec(), records.as_slice())
        }
    };

    let mut ret = HashMap::with_capacity(rows.len());
    for record in rows {
        let row: Properties = names
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_owned))
            .collect();
        let Some(id) = row.get(id_prop).cloned() else {
            warn!(
                "{}: skipping record without {id_prop}: {record:?}",
                path.display()
            );
            continue;
        };
        if ret.contains_key(&id) {
            return Err(Error::DuplicateId {
                path: path.to_owned(),
                id,
            });
        }
        ret.insert(id, row);
    }

    Ok(ret)
}
