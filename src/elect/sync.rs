//! Cross-file reconciliation: manifestos against the current representative
//! roster, and the publication flag against the vote log. Also the tally
//! that produces the published results snapshot.

use log::{debug, info};

use crate::elect::models::*;
use crate::elect::store::{Backend, Store};
use crate::elect::ElectResult;

/// Sole line of the flag file when no votes are pending publication.
pub const PUBLISHED_MARKER: &str = "updated";
/// Prefix of each pending-vote line in the flag file.
pub const VOTE_CAST_PREFIX: &str = "vote_cast_by:";

/// Rebuilds the manifestos file with exactly one row per current
/// representative. Existing text is kept on the first username match;
/// new representatives get a pending row; departed ones are dropped.
///
/// This is a rebuild, not a merge. It runs at startup and after every
/// representative registration.
pub fn sync_manifestos_with_reps<B: Backend>(store: &mut Store<B>) -> ElectResult<()> {
    let reps = store.load_representatives()?;
    let manifestos = store.load_manifestos()?;

    let rebuilt: Vec<Manifesto> = reps
        .iter()
        .map(|rep| {
            let text = manifestos
                .iter()
                .find(|m| m.rep_username == rep.username)
                .map(|m| m.text.clone())
                .unwrap_or(ManifestoText::Pending);
            Manifesto {
                rep_username: rep.username.clone(),
                text,
            }
        })
        .collect();

    debug!(
        "Synced manifestos: {} rows for {} representatives",
        rebuilt.len(),
        reps.len()
    );
    store.save_manifestos(&rebuilt)
}

/// Tallies the votes per manifesto row and persists the full results
/// snapshot, replacing any previous one. Each vote is attributed to at most
/// one row, the first whose representative matches.
pub fn publish_results<B: Backend>(
    store: &mut Store<B>,
    manifestos: &[Manifesto],
    votes: &[Vote],
) -> ElectResult<Vec<ResultEntry>> {
    let mut counts = vec![0u32; manifestos.len()];
    for vote in votes {
        for (i, m) in manifestos.iter().enumerate() {
            if m.rep_username == vote.rep_username {
                counts[i] += 1;
                break;
            }
        }
    }

    let entries: Vec<ResultEntry> = manifestos
        .iter()
        .zip(counts)
        .map(|(m, vote_count)| ResultEntry {
            rep_username: m.rep_username.clone(),
            vote_count,
        })
        .collect();
    store.save_results(&entries)?;
    info!(
        "Published results: {} candidates, {} votes",
        entries.len(),
        votes.len()
    );
    Ok(entries)
}

/// Live per-representative counts, recomputed from the vote log. This is
/// what the admin sees before publishing; it is independent of the
/// persisted results snapshot.
pub fn vote_counts(reps: &[Account], votes: &[Vote]) -> Vec<(String, u32)> {
    reps.iter()
        .map(|rep| {
            let n = votes
                .iter()
                .filter(|v| v.rep_username == rep.username)
                .count() as u32;
            (rep.username.clone(), n)
        })
        .collect()
}

/// Overwrites the flag file with the single published marker line.
pub fn mark_results_published<B: Backend>(store: &mut Store<B>) -> ElectResult<()> {
    store.write_flag(&format!("{}\n", PUBLISHED_MARKER))
}

/// Records one cast vote in the flag file. The first vote after a publish
/// clears the marker; later votes append to the pending lines.
pub fn append_vote_update<B: Backend>(store: &mut Store<B>, username: &str) -> ElectResult<()> {
    let line = format!("{}{}\n", VOTE_CAST_PREFIX, username);
    let current = store.read_flag()?.unwrap_or_default();
    if current.lines().next() == Some(PUBLISHED_MARKER) {
        store.write_flag(&line)
    } else {
        store.append_flag(&line)
    }
}

/// Publication state, judged from the first line of the flag file only.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum ResultStatus {
    /// The flag file does not exist.
    Missing,
    /// Published and current, no votes cast since.
    Published,
    /// Votes have been cast since the last publish.
    VotesPending,
    /// The flag file exists but is empty.
    Empty,
}

pub fn result_status<B: Backend>(store: &Store<B>) -> ElectResult<ResultStatus> {
    let contents = match store.read_flag()? {
        None => return Ok(ResultStatus::Missing),
        Some(c) => c,
    };
    Ok(match contents.lines().next() {
        None => ResultStatus::Empty,
        Some(PUBLISHED_MARKER) => ResultStatus::Published,
        Some(_) => ResultStatus::VotesPending,
    })
}
