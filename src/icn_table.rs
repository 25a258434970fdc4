//! Functions for reading the ICN atlas table and deriving the network layout from it.
//!
//! The table has one row per intrinsic connectivity network (ICN) component of the atlas, in
//! component order. The first column holds the 1-based component index, the `Label` column
//! the name of the functional network the component belongs to, and the `new_order` column
//! the rank of the component in the network-grouped display order.

use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::{FncError, Result};
use crate::util::{is_tsv_file, open_maybe_gz};

pub const LABEL_COLUMN: &str = "Label";
pub const NEW_ORDER_COLUMN: &str = "new_order";

/// The functional networks of the atlas in display order, with their abbreviations.
pub const NETWORKS: [(&str, &str); 6] = [
    ("Visual", "VI"),
    ("Cerebellar", "CB"),
    ("Temporal", "TM"),
    ("Subcortical", "SC"),
    ("Sensorimotor", "SM"),
    ("Higher Cognition", "HC"),
];

/// The full network labels as they appear in the `Label` column of the ICN table, in display order.
pub const NETWORK_LABELS: [(&str, &str); 6] = [
    ("Visual Network", "VI"),
    ("Cerebellar network", "CB"),
    ("Temporal network", "TM"),
    ("Subcortical network (SC)", "SC"),
    ("Sensorimotor network (SM)", "SM"),
    ("Higher Cognition network (HC)", "HC"),
];


/// Models an ICN atlas table.
#[derive(Debug, Clone, PartialEq)]
pub struct IcnTable {
    pub indices: Vec<usize>, // 1-based component indices, as in the file.
    pub labels: Vec<String>,
    pub new_order: Vec<f64>,
}

impl IcnTable {

    /// Read an ICN table from a delimited text file.
    ///
    /// Files ending in ".tsv" or ".tsv.gz" are read as tab-separated, all others as comma-separated.
    /// If the file's name ends with ".gz", the file is assumed to need GZip decoding.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<IcnTable> {
        let delimiter = if is_tsv_file(&path) { b'\t' } else { b',' };
        let table = IcnTable::from_reader(open_maybe_gz(&path)?, delimiter)?;
        debug!("Read ICN table with {} components from '{}'.", table.len(), path.as_ref().display());
        Ok(table)
    }


    /// Read an ICN table from the given reader. The first line must be the header.
    pub fn from_reader<S>(input: S, delimiter: u8) -> Result<IcnTable>
    where
        S: Read,
    {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .delimiter(delimiter)
            .trim(Trim::All)
            .flexible(false)
            .from_reader(input);

        let headers = rdr.headers()?.clone();
        let order_col = column_position(&headers, NEW_ORDER_COLUMN)
            .ok_or_else(|| FncError::MissingColumn(NEW_ORDER_COLUMN.to_string()))?;
        let label_col = column_position(&headers, LABEL_COLUMN);
        // Tables that start with one of the named columns carry no explicit index column.
        let has_index_col = order_col != 0 && label_col != Some(0);

        let mut table = IcnTable {
            indices: Vec::new(),
            labels: Vec::new(),
            new_order: Vec::new(),
        };

        for (row_idx, result) in rdr.records().enumerate() {
            let record = result?;
            let index = if has_index_col {
                parse_index(&record[0], row_idx)?
            } else {
                row_idx + 1
            };
            table.indices.push(index);
            table.labels.push(label_col.map(|c| record[c].to_string()).unwrap_or_default());
            table.new_order.push(parse_number(&record[order_col], row_idx)?);
        }
        Ok(table)
    }


    /// Number of atlas components in the table.
    pub fn len(&self) -> usize {
        self.new_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.new_order.is_empty()
    }
}

impl fmt::Display for IcnTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ICN table with {} components.", self.len())
    }
}


fn column_position(headers: &StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

fn parse_number(field: &str, row_idx: usize) -> Result<f64> {
    field.parse::<f64>().map_err(|_| {
        FncError::InvalidIcnTable(format!("cannot parse '{}' as a number in data row {}", field, row_idx + 1))
    })
}

fn parse_index(field: &str, row_idx: usize) -> Result<usize> {
    let value = parse_number(field, row_idx)?;
    if value < 1.0 || value.fract() != 0.0 {
        return Err(FncError::InvalidIcnTable(format!(
            "component index '{}' in data row {} is not a positive integer", field, row_idx + 1
        )));
    }
    Ok(value as usize)
}


/// A functional network and the 0-based indices of its atlas components.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkGroup {
    pub name: String,
    pub abbreviation: String,
    pub indices: Vec<usize>,
}

impl NetworkGroup {
    pub fn size(&self) -> usize {
        self.indices.len()
    }
}


/// The grouping of atlas components into functional networks, used to annotate network-ordered maps.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkLayout {
    pub groups: Vec<NetworkGroup>,
}

impl NetworkLayout {

    /// Assign the table rows to the [`NETWORKS`], in display order.
    ///
    /// A row belongs to a network if its label contains the network name, ignoring case.
    /// Networks without any member are left out.
    pub fn from_table(table: &IcnTable) -> NetworkLayout {
        NetworkLayout::group_rows(table, &NETWORKS, |label, name| {
            label.to_lowercase().contains(&name.to_lowercase())
        })
    }


    /// Assign the table rows to the [`NETWORK_LABELS`], in display order.
    ///
    /// A row belongs to a network only if its label equals the full network label.
    /// Networks without any member are left out.
    pub fn from_table_exact(table: &IcnTable) -> NetworkLayout {
        NetworkLayout::group_rows(table, &NETWORK_LABELS, |label, name| label == name)
    }


    // Component index 0 is not a valid 1-based index, such rows are never assigned.
    fn group_rows<F>(table: &IcnTable, networks: &[(&str, &str)], matches: F) -> NetworkLayout
    where
        F: Fn(&str, &str) -> bool,
    {
        let mut groups: Vec<NetworkGroup> = Vec::with_capacity(networks.len());
        for (name, abbreviation) in networks.iter() {
            let indices: Vec<usize> = table.labels.iter()
                .zip(table.indices.iter())
                .filter(|(label, _)| matches(label, name))
                .filter_map(|(_, idx)| idx.checked_sub(1))
                .collect();
            if !indices.is_empty() {
                groups.push(NetworkGroup {
                    name: name.to_string(),
                    abbreviation: abbreviation.to_string(),
                    indices,
                });
            }
        }
        NetworkLayout { groups }
    }


    /// The 0-based indices of all grouped components, in display order.
    pub fn all_indices(&self) -> Vec<usize> {
        self.groups.iter().flat_map(|g| g.indices.iter().cloned()).collect()
    }


    /// The number of components covered by all groups.
    pub fn total_size(&self) -> usize {
        self.groups.iter().map(|g| g.size()).sum()
    }


    /// The network abbreviations, in display order.
    pub fn abbreviations(&self) -> Vec<String> {
        self.groups.iter().map(|g| g.abbreviation.clone()).collect()
    }


    /// The center position of each network along a matrix axis, suitable for tick labels.
    pub fn tick_positions(&self) -> Vec<f64> {
        let mut positions = Vec::with_capacity(self.groups.len());
        let mut start = 0usize;
        for g in self.groups.iter() {
            positions.push(start as f64 + g.size() as f64 / 2.0);
            start += g.size();
        }
        positions
    }


    /// The network boundaries along a matrix axis: 0, followed by the cumulative network sizes.
    pub fn boundaries(&self) -> Vec<usize> {
        let mut boundaries = vec![0usize];
        let mut pos = 0usize;
        for g in self.groups.iter() {
            pos += g.size();
            boundaries.push(pos);
        }
        boundaries
    }
}

impl fmt::Display for NetworkLayout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Network layout with {} networks covering {} components.", self.groups.len(), self.total_size())
    }
}
