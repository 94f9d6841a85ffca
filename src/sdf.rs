//! Property-block parser for SD files. Only the data items are read, the
//! connection tables are skipped line by line like any other non-header text.

use std::{
    collections::HashMap,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    sync::LazyLock,
};

use log::{debug, info, trace};
use regex::Regex;

use crate::{
    error::{Error, Result},
    Molecules, Properties,
};

/// `> <PROPERTY> (MOLID)`, with the molecule id optional
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^>\s*<(.*?)>\s*(?:\((.*?)\)\s*)?$").unwrap()
});

/// placeholder used in error messages for properties outside any molecule
const UNGROUPED: &str = "(none)";

/// load the SD file at `path` and return its molecules keyed by the id found in
/// each data header. every molecule must carry `id_prop` with a value equal to
/// that key
pub fn parse_sdf(path: impl AsRef<Path>, id_prop: &str) -> Result<Molecules> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| Error::io(path, e))?;
    read_sdf(BufReader::new(f), path, id_prop)
}

/// like [parse_sdf] but reading from an already opened `reader`. `path` is only
/// used for error messages
pub fn read_sdf(
    reader: impl BufRead,
    path: &Path,
    id_prop: &str,
) -> Result<Molecules> {
    let mut blocks: HashMap<Option<String>, Properties> = HashMap::new();

    let mut lines = reader.split(b'\n').enumerate();
    while let Some((i, line)) = lines.next() {
        let line = decode(line.map_err(|e| Error::io(path, e))?);
        let Some(caps) = HEADER.captures(&line) else {
            if line.starts_with('>') {
                trace!("{}:{}: not a property header", path.display(), i + 1);
            }
            continue;
        };

        let prop = caps[1].to_owned();
        let mol = caps
            .get(2)
            .map(|m| m.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_owned);

        let Some((_, value)) = lines.next() else {
            return Err(Error::UnexpectedEof {
                path: path.to_owned(),
                line: i + 1,
            });
        };
        let value = decode(value.map_err(|e| Error::io(path, e))?);

        let props = blocks.entry(mol).or_default();
        if props.contains_key(&prop) {
            let mol = match caps.get(2).map(|m| m.as_str()) {
                Some(mol) if !mol.is_empty() => mol,
                _ => UNGROUPED,
            };
            return Err(Error::ConflictingProperty {
                prop,
                mol: mol.to_owned(),
            });
        }
        props.insert(prop, value.trim_end().to_owned());
    }

    info!("checking...");
    check_ids(blocks, id_prop)
}

fn decode(mut buf: Vec<u8>) -> String {
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    match String::from_utf8(buf) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}

/// make sure each molecule's `id_prop` agrees with the id it was filed under.
/// properties that were not attached to any molecule are discarded, unless one
/// of them claims to be an id
fn check_ids(
    blocks: HashMap<Option<String>, Properties>,
    id_prop: &str,
) -> Result<Molecules> {
    let mut ret = HashMap::with_capacity(blocks.len());
    for (mol, props) in blocks {
        let found = props.get(id_prop);
        match mol {
            Some(mol) if found == Some(&mol) => {
                ret.insert(mol, props);
            }
            Some(mol) => {
                return Err(Error::IdMismatch {
                    found: found.map_or(UNGROUPED, String::as_str).to_owned(),
                    mol,
                });
            }
            None => {
                if let Some(found) = found {
                    return Err(Error::IdMismatch {
                        found: found.clone(),
                        mol: UNGROUPED.to_owned(),
                    });
                }
                debug!("dropping {} ungrouped properties", props.len());
            }
        }
    }
    Ok(ret)
}
