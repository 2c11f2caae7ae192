//! Room state machine: membership, host succession, voting and word dealing.

use crate::{assign_words, resolve_winner, GameError, Result, VoteRound, WordAssignment, WordCorpus};
use impostor_types::{ConnectionId, Member, RoomId, RoomSnapshot, RoomStatus, VoteTally};
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

/// Per-round phase. Word assignments only exist in `Assigned`.
#[derive(Debug)]
enum Phase {
    Lobby,
    Voting(VoteRound),
    Assigned {
        assignment: WordAssignment,
        tally: VoteTally,
    },
}

/// How a completed vote ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Words were dealt for the winning category.
    Assigned { category: String },
    /// The winning category could not be dealt; the room is back in the lobby.
    Aborted { category: String, error: GameError },
}

#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub member: Member,
}

#[derive(Debug, Clone)]
pub struct LeaveOutcome {
    /// The departed member, as they were before leaving.
    pub member: Member,
    /// Member promoted to host by this departure.
    pub new_host: Option<ConnectionId>,
    /// A vote cast by the departed member was removed from the tally.
    pub vote_retracted: bool,
    /// The departure completed the vote.
    pub resolution: Option<Resolution>,
}

#[derive(Debug, Clone)]
pub struct VoteOutcome {
    pub tally: VoteTally,
    pub resolution: Option<Resolution>,
}

/// One game room.
///
/// All mutators validate before touching state, so an `Err` always leaves
/// the room exactly as it was.
#[derive(Debug)]
pub struct Room {
    id: RoomId,
    title: String,
    /// Join order; the first entry is the longest-seated member.
    members: Vec<Member>,
    phase: Phase,
    closed: bool,
    rng: StdRng,
}

impl Room {
    pub fn new(id: RoomId, title: impl Into<String>, rng: StdRng) -> Self {
        Self {
            id,
            title: title.into(),
            members: Vec::new(),
            phase: Phase::Lobby,
            closed: false,
            rng,
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn status(&self) -> RoomStatus {
        match self.phase {
            Phase::Lobby => RoomStatus::Lobby,
            Phase::Voting(_) => RoomStatus::Voting,
            Phase::Assigned { .. } => RoomStatus::Assigned,
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn member(&self, id: ConnectionId) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn host(&self) -> Option<&Member> {
        self.members.iter().find(|m| m.is_host)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Mark the room as removed; later joins fail with `RoomNotFound`.
    pub(crate) fn close(&mut self) {
        self.closed = true;
    }

    /// Current tally; the final tally once assigned, empty in the lobby.
    pub fn tally(&self) -> VoteTally {
        match &self.phase {
            Phase::Lobby => VoteTally::new(),
            Phase::Voting(round) => round.tally().clone(),
            Phase::Assigned { tally, .. } => tally.clone(),
        }
    }

    pub fn assignment(&self) -> Option<&WordAssignment> {
        match &self.phase {
            Phase::Assigned { assignment, .. } => Some(assignment),
            _ => None,
        }
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        let voted = match &self.phase {
            Phase::Voting(round) => round.voted().collect(),
            _ => Vec::new(),
        };
        RoomSnapshot {
            room_id: self.id,
            title: self.title.clone(),
            status: self.status(),
            members: self.members.clone(),
            tally: self.tally(),
            voted,
            category: self.assignment().map(|a| a.category().to_string()),
        }
    }

    fn wrong_state(&self, action: &'static str, expected: RoomStatus) -> GameError {
        GameError::InvalidStateTransition {
            action,
            expected,
            actual: self.status(),
        }
    }

    fn require_member(&self, id: ConnectionId) -> Result<&Member> {
        self.member(id).ok_or(GameError::NotInRoom(self.id))
    }

    fn require_host(&self, id: ConnectionId, action: &'static str) -> Result<()> {
        if self.require_member(id)?.is_host {
            Ok(())
        } else {
            Err(GameError::Unauthorized(action))
        }
    }

    /// Seat a new member. The first member of an empty room becomes host.
    pub fn join(&mut self, id: ConnectionId, display_name: &str) -> Result<JoinOutcome> {
        if self.closed {
            return Err(GameError::RoomNotFound(self.id));
        }
        if self.status() != RoomStatus::Lobby {
            return Err(self.wrong_state("join", RoomStatus::Lobby));
        }
        if self.member(id).is_some() {
            return Err(GameError::AlreadyInRoom(self.id));
        }
        if self.members.iter().any(|m| m.display_name == display_name) {
            return Err(GameError::DuplicateName {
                room_id: self.id,
                name: display_name.to_string(),
            });
        }

        let mut member = Member::new(id, display_name);
        member.is_host = self.members.is_empty();
        self.members.push(member.clone());

        debug!(
            target: "impostor::room",
            "Room {}: {} joined (host: {}, members: {})",
            self.id, member.display_name, member.is_host, self.members.len()
        );
        Ok(JoinOutcome { member })
    }

    /// Remove a member. A departing host is succeeded by the earliest-joined
    /// remaining member. During a vote the member leaves the electorate and
    /// any vote they cast is retracted, which may complete the vote.
    pub fn leave(&mut self, id: ConnectionId, corpus: &WordCorpus) -> Result<LeaveOutcome> {
        let pos = self
            .members
            .iter()
            .position(|m| m.id == id)
            .ok_or(GameError::NotInRoom(self.id))?;
        let member = self.members.remove(pos);

        let mut new_host = None;
        if member.is_host {
            if let Some(next) = self.members.first_mut() {
                next.is_host = true;
                new_host = Some(next.id);
            }
        }

        let vote_retracted = match &mut self.phase {
            Phase::Voting(round) => round.withdraw(id),
            _ => false,
        };

        let resolution = if self.members.is_empty() {
            self.phase = Phase::Lobby;
            None
        } else {
            self.resolve_if_complete(corpus)
        };

        debug!(
            target: "impostor::room",
            "Room {}: {} left (retracted vote: {}, members: {})",
            self.id, member.display_name, vote_retracted, self.members.len()
        );
        Ok(LeaveOutcome {
            member,
            new_host,
            vote_retracted,
            resolution,
        })
    }

    /// Host only: open the category vote over the current roster.
    pub fn start_game(&mut self, by: ConnectionId, categories: Vec<String>) -> Result<Vec<String>> {
        self.require_host(by, "start the game")?;
        if self.status() != RoomStatus::Lobby {
            return Err(self.wrong_state("start the game", RoomStatus::Lobby));
        }
        if categories.is_empty() {
            return Err(GameError::NoCategories);
        }

        let electorate = self.members.iter().map(|m| m.id).collect();
        let round = VoteRound::new(categories, electorate);
        let offered = round.offered().to_vec();
        self.phase = Phase::Voting(round);

        info!(
            target: "impostor::room",
            "Room {}: voting opened for {} member(s)", self.id, self.members.len()
        );
        Ok(offered)
    }

    /// Categories of the open vote.
    pub fn offered_categories(&self, by: ConnectionId) -> Result<&[String]> {
        self.require_member(by)?;
        match &self.phase {
            Phase::Voting(round) => Ok(round.offered()),
            _ => Err(self.wrong_state("request categories", RoomStatus::Voting)),
        }
    }

    /// Cast a vote. Resolves the round once every elector has voted.
    pub fn vote(&mut self, by: ConnectionId, category: &str, corpus: &WordCorpus) -> Result<VoteOutcome> {
        self.require_member(by)?;
        let status = self.status();
        let Phase::Voting(round) = &mut self.phase else {
            return Err(GameError::InvalidStateTransition {
                action: "vote",
                expected: RoomStatus::Voting,
                actual: status,
            });
        };
        round.cast(by, category)?;
        let tally = round.tally().clone();

        debug!(target: "impostor::vote", "Room {}: vote for {:?}, tally {:?}", self.id, category, tally);

        let resolution = self.resolve_if_complete(corpus);
        Ok(VoteOutcome { tally, resolution })
    }

    fn resolve_if_complete(&mut self, corpus: &WordCorpus) -> Option<Resolution> {
        let Phase::Voting(round) = &self.phase else {
            return None;
        };
        if !round.is_complete() {
            return None;
        }
        let category = resolve_winner(round.tally(), &mut self.rng)?;

        match self.assign(&category, corpus).map(|_| ()) {
            Ok(()) => {
                info!(target: "impostor::vote", "Room {}: category resolved to {:?}", self.id, category);
                Some(Resolution::Assigned { category })
            }
            Err(error) => {
                warn!(target: "impostor::vote", "Room {}: cannot deal {:?}: {}", self.id, category, error);
                self.phase = Phase::Lobby;
                Some(Resolution::Aborted { category, error })
            }
        }
    }

    /// Deal words for `category` and move to `Assigned`. A no-op returning
    /// the existing assignment if words were already dealt this round.
    pub fn assign(&mut self, category: &str, corpus: &WordCorpus) -> Result<&WordAssignment> {
        if let Phase::Voting(round) = &self.phase {
            let roster: Vec<ConnectionId> = self.members.iter().map(|m| m.id).collect();
            let candidates = corpus.distinct_words(category);
            let assignment = assign_words(category, &roster, &candidates, &mut self.rng)?;
            let tally = round.tally().clone();
            self.phase = Phase::Assigned { assignment, tally };
        }

        match &self.phase {
            Phase::Assigned { assignment, .. } => Ok(assignment),
            _ => Err(self.wrong_state("assign words", RoomStatus::Voting)),
        }
    }

    /// The secret word dealt to `member`.
    pub fn word_for(&self, member: ConnectionId) -> Result<&str> {
        match &self.phase {
            Phase::Assigned { assignment, .. } => assignment
                .word_for(member)
                .ok_or(GameError::UnknownMember(member)),
            _ => Err(GameError::NotAssigned),
        }
    }

    /// Host only: discard the round and return to the lobby.
    pub fn reset(&mut self, by: ConnectionId) -> Result<()> {
        self.require_host(by, "reset the game")?;
        if self.status() != RoomStatus::Assigned {
            return Err(self.wrong_state("reset the game", RoomStatus::Assigned));
        }
        self.phase = Phase::Lobby;
        info!(target: "impostor::room", "Room {}: reset to lobby", self.id);
        Ok(())
    }
}
