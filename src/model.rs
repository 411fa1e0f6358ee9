//! Record shapes read by the migration steps.
//!
//! Each type decodes one historical record shape from a [`RecordView`],
//! checking every field the steps rely on up front. Steps decode whole
//! collections before mutating anything, so a malformed record aborts the
//! step with the document untouched.

use crate::document::{Coin, Document, Key, RecordView};
use crate::errors::{MigrationError, Result};
use crate::resolver::{Collection, Resolver};

pub const STORIES: Collection = Collection::new("story.stories");
pub const CATEGORIES: Collection = Collection::new("category.categories");
pub const CLAIMS: Collection = Collection::new("claim.claims");
pub const COMMUNITIES: Collection = Collection::new("community.communities");
pub const BACKINGS: Collection = Collection::new("backing.backings");
pub const CHALLENGES: Collection = Collection::new("challenge.challenges");
pub const LEGACY_ARGUMENTS: Collection = Collection::new("argument.arguments");
pub const ARGUMENTS: Collection = Collection::new("trustaking.arguments");
pub const STAKES: Collection = Collection::new("trustaking.stakes");
pub const TRANSACTIONS: Collection = Collection::new("trubank2.transactions");
pub const ACCOUNTS: Collection = Collection::new("accounts");

/// Story status code for a story whose voting window has closed.
pub const STORY_EXPIRED: u64 = 1;

/// Kind of a stake, as encoded in the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StakeKind {
    Backing,
    Challenge,
    Upvote,
}

impl StakeKind {
    pub fn code(self) -> u64 {
        match self {
            StakeKind::Backing => 0,
            StakeKind::Challenge => 1,
            StakeKind::Upvote => 2,
        }
    }

    pub fn from_code(location: &str, code: u64) -> Result<Self> {
        match code {
            0 => Ok(StakeKind::Backing),
            1 => Ok(StakeKind::Challenge),
            2 => Ok(StakeKind::Upvote),
            _ => Err(MigrationError::shape(location, "stake kind 0, 1 or 2")),
        }
    }

    /// Side of a vote cast by the argument author.
    pub fn from_vote(supports: bool) -> Self {
        if supports {
            StakeKind::Backing
        } else {
            StakeKind::Challenge
        }
    }
}

/// A vote from the legacy `backing` or `challenge` modules.
///
/// Records in both collections wrap the vote: `{ "vote": { ... } }`.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyVote {
    pub location: String,
    pub story_id: Key,
    pub argument_id: Key,
    pub creator: String,
    pub amount: Coin,
    /// `true` for a backing vote, `false` for a challenge.
    pub supports: bool,
    pub created_time: Option<String>,
}

impl LegacyVote {
    pub fn decode(record: &RecordView<'_>) -> Result<Self> {
        let vote = record.require_object("vote")?;
        let created_time = match vote.optional("timestamp") {
            Some(_) => Some(
                vote.require_object("timestamp")?
                    .require_str("created_time")?
                    .to_string(),
            ),
            None => None,
        };
        Ok(Self {
            location: vote.location().to_string(),
            story_id: vote.require_key("story_id")?,
            argument_id: vote.require_key("argument_id")?,
            creator: vote.require_str("creator")?.to_string(),
            amount: vote.require_coin("amount")?,
            supports: vote.require_bool("vote")?,
            created_time,
        })
    }

    pub fn require_created_time(&self) -> Result<&str> {
        self.created_time
            .as_deref()
            .ok_or_else(|| MigrationError::missing_field(&self.location, "timestamp"))
    }
}

/// All legacy votes: backings first, then challenges, each in stored order.
pub fn legacy_votes(document: &Document) -> Result<Vec<LegacyVote>> {
    let resolver = Resolver::new(document);
    let mut votes = Vec::new();
    for collection in [BACKINGS, CHALLENGES] {
        for record in resolver.records(collection)? {
            votes.push(LegacyVote::decode(&record)?);
        }
    }
    Ok(votes)
}

/// An argument in `trustaking.arguments`, after migration.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentRecord {
    pub id: Key,
    pub claim_id: Key,
    pub creator: String,
    pub stake_type: StakeKind,
}

impl ArgumentRecord {
    pub fn decode(record: &RecordView<'_>) -> Result<Self> {
        let location = format!("{}.stake_type", record.location());
        Ok(Self {
            id: record.require_key("id")?,
            claim_id: record.require_key("claim_id")?,
            creator: record.require_str("creator")?.to_string(),
            stake_type: StakeKind::from_code(&location, record.require_u64("stake_type")?)?,
        })
    }
}

/// A stake in `trustaking.stakes`.
#[derive(Debug, Clone, PartialEq)]
pub struct StakeRecord {
    pub location: String,
    pub argument_id: Key,
    pub kind: StakeKind,
    pub amount: Coin,
}

impl StakeRecord {
    pub fn decode(record: &RecordView<'_>) -> Result<Self> {
        let location = format!("{}.type", record.location());
        Ok(Self {
            location: record.location().to_string(),
            argument_id: record.require_key("argument_id")?,
            kind: StakeKind::from_code(&location, record.require_u64("type")?)?,
            amount: record.require_coin("amount")?,
        })
    }
}

/// Bank transaction type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TransactionKind {
    Registration,
    Backing,
    BackingReturned,
    Challenge,
    ChallengeReturned,
    Upvote,
    UpvoteReturned,
    InterestArgumentCreation,
    InterestUpvoteReceived,
    InterestUpvoteGiven,
    RewardPayout,
}

impl TransactionKind {
    const ALL: [TransactionKind; 11] = [
        TransactionKind::Registration,
        TransactionKind::Backing,
        TransactionKind::BackingReturned,
        TransactionKind::Challenge,
        TransactionKind::ChallengeReturned,
        TransactionKind::Upvote,
        TransactionKind::UpvoteReturned,
        TransactionKind::InterestArgumentCreation,
        TransactionKind::InterestUpvoteReceived,
        TransactionKind::InterestUpvoteGiven,
        TransactionKind::RewardPayout,
    ];

    pub fn code(self) -> u64 {
        self as u64
    }

    pub fn from_code(location: &str, code: u64) -> Result<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or_else(|| MigrationError::shape(location, "transaction type 0..=10"))
    }
}

/// A transaction in `trubank2.transactions`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub location: String,
    pub kind: TransactionKind,
    pub address: String,
    pub amount: Coin,
    pub community_id: Option<String>,
}

impl Transaction {
    pub fn decode(record: &RecordView<'_>) -> Result<Self> {
        let location = format!("{}.type", record.location());
        let community_id = match record.optional("community_id") {
            Some(_) => Some(record.require_str("community_id")?.to_string()),
            None => None,
        };
        Ok(Self {
            location: record.location().to_string(),
            kind: TransactionKind::from_code(&location, record.require_u64("type")?)?,
            address: record.require_str("app_account_address")?.to_string(),
            amount: record.require_coin("amount")?,
            community_id,
        })
    }

    pub fn require_community(&self) -> Result<&str> {
        self.community_id
            .as_deref()
            .ok_or_else(|| MigrationError::missing_field(&self.location, "community_id"))
    }
}
