//! Positional command-line arguments for both tools. There are no flags.

use std::path::PathBuf;

use crate::error::UsageError;

pub const COMPARE_USAGE: &str = "usage: outcar-compare <file> <name> [<file> <name> [<file> <name>]]\n\
     You must input file names and compound names as arguments";

/// Exit status for a wrong argument count.
pub const USAGE_EXIT: u8 = 2;
/// Exit status for a run that failed after its arguments were accepted.
pub const FAILURE_EXIT: u8 = 1;

pub const DOS_USAGE: &str = "usage: dos_plot <file>\n       dos_plot <fileA> <nameA> <fileB> <nameB> <fileC> <nameC>";

/// An input file and the compound name shown for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub path: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareInvocation {
    /// Plot one compound's table.
    Single(Input),
    /// Compare two or three tables against the first.
    Compare(Vec<Input>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DosInvocation {
    /// Plot one DOS file, titled by its path.
    Single(PathBuf),
    /// Three named DOS files side by side.
    Panels(Vec<Input>),
}

/// Arguments after the program name: 2, 4 or 6 values in `file name` pairs.
pub fn parse_compare_args(args: &[String]) -> Result<CompareInvocation, UsageError> {
    match args.len() {
        2 => Ok(CompareInvocation::Single(pairs(args).remove(0))),
        4 | 6 => Ok(CompareInvocation::Compare(pairs(args))),
        found => Err(UsageError {
            found,
            usage: COMPARE_USAGE,
        }),
    }
}

/// Arguments after the program name: one file, or three `file name` pairs.
pub fn parse_dos_args(args: &[String]) -> Result<DosInvocation, UsageError> {
    match args.len() {
        1 => Ok(DosInvocation::Single(PathBuf::from(&args[0]))),
        6 => Ok(DosInvocation::Panels(pairs(args))),
        found => Err(UsageError {
            found,
            usage: DOS_USAGE,
        }),
    }
}

/// Process exit status for the outcome of a whole run.
pub fn exit_status<T>(result: &anyhow::Result<T>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(e) if e.is::<UsageError>() => USAGE_EXIT,
        Err(_) => FAILURE_EXIT,
    }
}

fn pairs(args: &[String]) -> Vec<Input> {
    args.chunks_exact(2)
        .map(|pair| Input {
            path: PathBuf::from(&pair[0]),
            name: pair[1].clone(),
        })
        .collect()
}
