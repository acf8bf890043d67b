use crate::types::RankedElement;

outcome! {
    pub enum LeaderboardUpsert {
        Success,
    }
}

outcome! {
    /// Outcome of every leaderboard read. An absent leaderboard reads as an
    /// empty `Success`.
    pub enum LeaderboardFetch {
        Success(Vec<RankedElement>),
    }
}

impl LeaderboardFetch {
    pub fn values(&self) -> Option<&[RankedElement]> {
        match self {
            LeaderboardFetch::Success(elements) => Some(elements),
            _ => None,
        }
    }
}

outcome! {
    pub enum LeaderboardLength {
        Success(u32),
    }
}

impl LeaderboardLength {
    pub fn length(&self) -> Option<u32> {
        match self {
            LeaderboardLength::Success(n) => Some(*n),
            _ => None,
        }
    }
}

outcome! {
    pub enum LeaderboardRemoveElements {
        Success,
    }
}

outcome! {
    pub enum LeaderboardDelete {
        Success,
    }
}
