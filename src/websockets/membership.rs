use std::str::FromStr;

/// What a new `join` does to the room the connection was already in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RejoinPolicy {
    /// Stay a member of earlier rooms until disconnect
    #[default]
    Retain,
    /// Leave the previous room before joining the new one
    Migrate,
}

impl FromStr for RejoinPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(Self::Retain),
            "migrate" => Ok(Self::Migrate),
            other => Err(format!("unknown rejoin policy '{}'", other)),
        }
    }
}

/// Room affiliation of a single connection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Membership {
    #[default]
    Unjoined,
    Joined {
        /// Room named by the most recent join
        room: String,
        /// Earlier rooms still holding this connection under `RejoinPolicy::Retain`
        retained: Vec<String>,
    },
}

impl Membership {
    pub fn current_room(&self) -> Option<&str> {
        match self {
            Membership::Unjoined => None,
            Membership::Joined { room, .. } => Some(room),
        }
    }

    /// Every room the registry currently lists this connection in
    pub fn rooms(&self) -> Vec<String> {
        match self {
            Membership::Unjoined => Vec::new(),
            Membership::Joined { room, retained } => {
                let mut rooms = retained.clone();
                rooms.push(room.clone());
                rooms
            }
        }
    }

    /// Apply a join. Returns the room the connection must leave, if any.
    pub fn join(&mut self, room: &str, policy: RejoinPolicy) -> Option<String> {
        match std::mem::take(self) {
            Membership::Unjoined => {
                *self = Membership::Joined {
                    room: room.to_string(),
                    retained: Vec::new(),
                };
                None
            }
            Membership::Joined {
                room: previous,
                mut retained,
            } => {
                retained.retain(|r| r != room);
                let to_leave = if previous == room {
                    None
                } else {
                    match policy {
                        RejoinPolicy::Retain => {
                            retained.push(previous);
                            None
                        }
                        RejoinPolicy::Migrate => Some(previous),
                    }
                };
                *self = Membership::Joined {
                    room: room.to_string(),
                    retained,
                };
                to_leave
            }
        }
    }

    /// Reset to `Unjoined`, returning every room that must be left
    pub fn disconnect(&mut self) -> Vec<String> {
        let rooms = self.rooms();
        *self = Membership::Unjoined;
        rooms
    }
}
