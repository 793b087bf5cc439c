//! The sole authority for reading and writing the five persisted
//! collections. Every load is an eager, complete snapshot and every save is
//! a full overwrite; there is no caching and no cross-file transaction.
//!
//! The backing medium is abstracted behind [`Backend`] so that the
//! reconciliation passes and their tests can run against an in-memory map
//! instead of a directory of files.

use log::debug;
use snafu::ResultExt;

use std::collections::HashMap;
use std::io::{self, Write as _};
use std::path::PathBuf;

use crate::elect::codec;
use crate::elect::models::*;
use crate::elect::{CreatingResourceSnafu, ElectResult, ReadingResourceSnafu, WritingResourceSnafu};

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Resource {
    Users,
    Manifestos,
    Votes,
    Results,
    VoteUpdates,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Users,
        Resource::Manifestos,
        Resource::Votes,
        Resource::Results,
        Resource::VoteUpdates,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Resource::Users => "users.txt",
            Resource::Manifestos => "manifestos.txt",
            Resource::Votes => "votes.txt",
            Resource::Results => "results.txt",
            Resource::VoteUpdates => "vote_updates.txt",
        }
    }
}

pub trait Backend {
    /// The full contents of a resource, or `None` when it does not exist.
    fn read(&self, res: Resource) -> io::Result<Option<String>>;
    /// Full overwrite.
    fn write(&mut self, res: Resource, contents: &str) -> io::Result<()>;
    /// Appends to the end, creating the resource if needed.
    fn append(&mut self, res: Resource, contents: &str) -> io::Result<()>;
    fn exists(&self, res: Resource) -> bool;
}

/// Flat files in a single directory.
pub struct FsBackend {
    dir: PathBuf,
}

impl FsBackend {
    pub fn new(dir: impl Into<PathBuf>) -> FsBackend {
        FsBackend { dir: dir.into() }
    }

    fn path(&self, res: Resource) -> PathBuf {
        self.dir.join(res.file_name())
    }
}

impl Backend for FsBackend {
    fn read(&self, res: Resource) -> io::Result<Option<String>> {
        match std::fs::read_to_string(self.path(res)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&mut self, res: Resource, contents: &str) -> io::Result<()> {
        std::fs::write(self.path(res), contents)
    }

    fn append(&mut self, res: Resource, contents: &str) -> io::Result<()> {
        let mut f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(res))?;
        f.write_all(contents.as_bytes())
    }

    fn exists(&self, res: Resource) -> bool {
        self.path(res).exists()
    }
}

/// In-memory backing, used by the unit tests.
#[derive(Default)]
pub struct MemBackend {
    files: HashMap<Resource, String>,
}

impl Backend for MemBackend {
    fn read(&self, res: Resource) -> io::Result<Option<String>> {
        Ok(self.files.get(&res).cloned())
    }

    fn write(&mut self, res: Resource, contents: &str) -> io::Result<()> {
        self.files.insert(res, contents.to_string());
        Ok(())
    }

    fn append(&mut self, res: Resource, contents: &str) -> io::Result<()> {
        self.files.entry(res).or_default().push_str(contents);
        Ok(())
    }

    fn exists(&self, res: Resource) -> bool {
        self.files.contains_key(&res)
    }
}

pub struct Store<B: Backend> {
    backend: B,
}

impl<B: Backend> Store<B> {
    pub fn new(backend: B) -> Store<B> {
        Store { backend }
    }

    /// Creates the resource empty if it is absent. Idempotent.
    pub fn ensure_exists(&mut self, res: Resource) -> ElectResult<()> {
        if !self.backend.exists(res) {
            debug!("Creating missing resource {}", res.file_name());
            self.backend.write(res, "").context(CreatingResourceSnafu {
                name: res.file_name(),
            })?;
        }
        Ok(())
    }

    fn load_collection<T>(&self, res: Resource, parse: fn(&str) -> Option<T>) -> ElectResult<Vec<T>> {
        let contents = self
            .backend
            .read(res)
            .context(ReadingResourceSnafu {
                name: res.file_name(),
            })?
            .unwrap_or_default();
        Ok(codec::parse_collection(&contents, parse))
    }

    fn save_collection<T>(
        &mut self,
        res: Resource,
        items: &[T],
        encode: fn(&T) -> String,
    ) -> ElectResult<()> {
        let contents = codec::encode_collection(items, encode);
        self.backend.write(res, &contents).context(WritingResourceSnafu {
            name: res.file_name(),
        })
    }

    pub fn load_accounts(&self) -> ElectResult<Vec<Account>> {
        self.load_collection(Resource::Users, codec::parse_account)
    }

    /// The accounts with the representative role, in file order.
    pub fn load_representatives(&self) -> ElectResult<Vec<Account>> {
        Ok(self
            .load_accounts()?
            .into_iter()
            .filter(|a| a.role == Role::Representative)
            .collect())
    }

    pub fn save_accounts(&mut self, accounts: &[Account]) -> ElectResult<()> {
        self.save_collection(Resource::Users, accounts, codec::encode_account)
    }

    pub fn load_manifestos(&self) -> ElectResult<Vec<Manifesto>> {
        self.load_collection(Resource::Manifestos, codec::parse_manifesto)
    }

    pub fn save_manifestos(&mut self, manifestos: &[Manifesto]) -> ElectResult<()> {
        self.save_collection(Resource::Manifestos, manifestos, codec::encode_manifesto)
    }

    pub fn load_votes(&self) -> ElectResult<Vec<Vote>> {
        self.load_collection(Resource::Votes, codec::parse_vote)
    }

    pub fn save_votes(&mut self, votes: &[Vote]) -> ElectResult<()> {
        self.save_collection(Resource::Votes, votes, codec::encode_vote)
    }

    pub fn load_results(&self) -> ElectResult<Vec<ResultEntry>> {
        self.load_collection(Resource::Results, codec::parse_result)
    }

    pub fn save_results(&mut self, results: &[ResultEntry]) -> ElectResult<()> {
        self.save_collection(Resource::Results, results, codec::encode_result)
    }

    // Raw access to the publication flag; the transition logic lives in `sync`.

    pub(crate) fn read_flag(&self) -> ElectResult<Option<String>> {
        self.backend
            .read(Resource::VoteUpdates)
            .context(ReadingResourceSnafu {
                name: Resource::VoteUpdates.file_name(),
            })
    }

    pub(crate) fn write_flag(&mut self, contents: &str) -> ElectResult<()> {
        self.backend
            .write(Resource::VoteUpdates, contents)
            .context(WritingResourceSnafu {
                name: Resource::VoteUpdates.file_name(),
            })
    }

    pub(crate) fn append_flag(&mut self, contents: &str) -> ElectResult<()> {
        self.backend
            .append(Resource::VoteUpdates, contents)
            .context(WritingResourceSnafu {
                name: Resource::VoteUpdates.file_name(),
            })
    }
}

#[cfg(test)]
pub(crate) fn mem_store() -> Store<MemBackend> {
    Store::new(MemBackend::default())
}
