//! Built-in case set inspection

use clap::Args;
use serde::Serialize;

use checkrun_api::CaseLoader;

use crate::output::{print_list, OutputFormat, TableDisplay};

#[derive(Debug, Args)]
pub struct CasesArgs {
    /// Case set to print; lists every set when omitted
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CaseSetRow {
    pub name: String,
    pub tuples: usize,
}

impl TableDisplay for CaseSetRow {
    fn headers() -> Vec<&'static str> {
        vec!["Case Set", "Tuples"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.tuples.to_string()]
    }
}

#[derive(Debug, Serialize)]
pub struct TupleRow {
    pub index: usize,
    pub values: Vec<checkrun_api::CaseValue>,
}

impl TableDisplay for TupleRow {
    fn headers() -> Vec<&'static str> {
        vec!["#", "Parameters"]
    }

    fn row(&self) -> Vec<String> {
        let values: Vec<String> = self.values.iter().map(|v| v.to_string()).collect();
        vec![self.index.to_string(), values.join(", ")]
    }
}

pub fn set_rows(loader: &CaseLoader) -> Vec<CaseSetRow> {
    loader
        .names()
        .into_iter()
        .map(|name| CaseSetRow {
            name: name.to_string(),
            tuples: loader.load(name).len(),
        })
        .collect()
}

/// Tuples of `name` in declaration order; empty for an unknown set
pub fn tuple_rows(loader: &CaseLoader, name: &str) -> Vec<TupleRow> {
    loader
        .load(name)
        .into_iter()
        .enumerate()
        .map(|(i, tuple)| TupleRow {
            index: i + 1,
            values: tuple.values().to_vec(),
        })
        .collect()
}

pub fn execute(args: CasesArgs, format: OutputFormat) -> anyhow::Result<()> {
    let loader = CaseLoader::builtin();
    match args.name {
        Some(name) => print_list(&tuple_rows(loader, &name), format),
        None => print_list(&set_rows(loader), format),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkrun_api::cases;

    #[test]
    fn test_set_rows() {
        let rows = set_rows(CaseLoader::builtin());
        let create = rows.iter().find(|r| r.name == cases::CREATE_POST).unwrap();
        assert_eq!(create.tuples, 2);
    }

    #[test]
    fn test_tuple_rows_keep_order() {
        let rows = tuple_rows(CaseLoader::builtin(), cases::GET_COMMENTS_FOR_POST);
        let cells: Vec<Vec<String>> = rows.iter().map(|r| r.row()).collect();
        assert_eq!(
            cells,
            vec![
                vec!["1".to_string(), "1, 5".to_string()],
                vec!["2".to_string(), "7777, 0".to_string()],
                vec!["3".to_string(), "0, 0".to_string()],
            ]
        );
        assert!(tuple_rows(CaseLoader::builtin(), "Unknown").is_empty());
    }
}
