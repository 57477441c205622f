//! Edge-list dataset reader.
//!
//! Format: a header of two whitespace-separated integers (declared node
//! count, declared edge count) followed by `source target` token pairs.
//! Tokens are split on any whitespace, so line breaks carry no meaning.
//! Reading stops quietly at end of input. A trailing unpaired token is
//! discarded, and a line that is not valid UTF-8 ends the input early.

use crate::error::{GraphError, Result};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Counts announced by the first line. Only a sizing hint; never validated.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct DatasetHeader {
    pub declared_nodes: usize,
    pub declared_edges: usize,
}

pub struct DatasetReader<R> {
    source: PathBuf,
    reader: R,
    line: Vec<u8>,
    line_no: usize,
    pending: VecDeque<String>,
    exhausted: bool,
}

impl DatasetReader<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| GraphError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, BufReader::new(file)))
    }
}

impl<R: BufRead> DatasetReader<R> {
    /// `source` only labels errors.
    pub fn new(source: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            source: source.into(),
            reader,
            line: Vec::new(),
            line_no: 0,
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    fn next_token(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(t) = self.pending.pop_front() {
                return Ok(Some(t));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.line.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.line)
                .map_err(|source| GraphError::Io {
                    path: self.source.clone(),
                    source,
                })?;
            if read == 0 {
                self.exhausted = true;
                return Ok(None);
            }
            self.line_no += 1;
            match std::str::from_utf8(&self.line) {
                Ok(text) => self
                    .pending
                    .extend(text.split_whitespace().map(str::to_owned)),
                Err(_) => {
                    warn!(
                        path = %self.source.display(),
                        line = self.line_no,
                        "stopping at line that is not valid UTF-8"
                    );
                    self.exhausted = true;
                    return Ok(None);
                }
            }
        }
    }

    /// Must be called once, before any edge is read.
    pub fn read_header(&mut self) -> Result<DatasetHeader> {
        let mut field = |what: &str| -> Result<usize> {
            let token = self
                .next_token()?
                .ok_or_else(|| GraphError::InvalidHeader(format!("missing {what}")))?;
            token
                .parse()
                .map_err(|_| GraphError::InvalidHeader(format!("{what} is not a count: {token:?}")))
        };
        let declared_nodes = field("node count")?;
        let declared_edges = field("edge count")?;
        Ok(DatasetHeader {
            declared_nodes,
            declared_edges,
        })
    }

    /// Next `(source, target)` pair, or `None` once input runs out.
    pub fn next_edge(&mut self) -> Result<Option<(String, String)>> {
        let Some(source) = self.next_token()? else {
            return Ok(None);
        };
        match self.next_token()? {
            Some(target) => Ok(Some((source, target))),
            None => {
                warn!(
                    path = %self.source.display(),
                    token = %source,
                    "discarding unpaired trailing token"
                );
                Ok(None)
            }
        }
    }
}

impl<R: BufRead> Iterator for DatasetReader<R> {
    type Item = Result<(String, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_edge().transpose()
    }
}
