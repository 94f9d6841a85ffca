use std::fmt::{Display, Write};

use serde::Deserialize;

use crate::error::{Error, Result};

/// The user's choice of properties to extract, either as a single string of
/// comma- or whitespace-separated names or as an explicit list.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Props {
    Text(String),
    List(Vec<String>),
}

impl Default for Props {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for Props {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<Vec<String>> for Props {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl Props {
    fn into_names(self) -> Vec<String> {
        match self {
            Props::Text(s) => s
                .replace(',', " ")
                .split_whitespace()
                .map(str::to_owned)
                .collect(),
            Props::List(v) => v,
        }
    }
}

/// The fixed set of output columns shared by every row in a run. The id column
/// always comes first.
#[derive(Clone, Debug, PartialEq)]
pub struct RowType {
    /// column names as given, used for headers and property lookups
    names: Vec<String>,

    /// names usable as identifiers. a name that is not one, is a reserved
    /// word, or repeats an earlier column, is replaced by `_` followed by its
    /// position
    fields: Vec<String>,
}

impl RowType {
    pub fn new(props: impl Into<Props>, id_prop: &str) -> Result<Self> {
        if id_prop.trim().is_empty() {
            return Err(Error::EmptyId);
        }
        let props: Props = props.into();
        let mut names = vec![id_prop.to_owned()];
        names.extend(props.into_names().into_iter().filter(|n| n != id_prop));

        let mut fields: Vec<String> = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if is_field_name(name) && !fields.contains(name) {
                fields.push(name.clone());
            } else {
                fields.push(format!("_{i}"));
            }
        }

        Ok(Self { names, fields })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// render `row` with its field names, like `Row(ID='C1', MW='16')`
    pub fn describe(&self, row: &Row) -> String {
        let mut s = String::from("Row(");
        let cells = self.fields.iter().zip(row.cells());
        for (i, (field, cell)) in cells.enumerate() {
            if i > 0 {
                s.push_str(", ");
            }
            let _ = write!(s, "{field}='{cell}'");
        }
        s.push(')');
        s
    }
}

impl Display for RowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.names.join(", "))
    }
}

/// words that parse as keywords and so cannot name a field
const RESERVED: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break",
    "class", "continue", "def", "del", "elif", "else", "except", "finally",
    "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal",
    "not", "or", "pass", "raise", "return", "try", "while", "with", "yield",
];

fn is_field_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !RESERVED.contains(&name)
}

/// One output row, with one cell per column of its [RowType].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row(Vec<String>);

impl Row {
    pub fn new(cells: Vec<String>) -> Self {
        Self(cells)
    }

    pub fn id(&self) -> &str {
        &self.0[0]
    }

    pub fn cells(&self) -> &[String] {
        &self.0
    }
}
