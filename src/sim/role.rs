//! Body roles
//!
//! Every collider in the arena is tagged with a role when it is created. The
//! tag travels in the collider's user-data word so contact callbacks can tell
//! a racket from a wall without any lookup tables of their own.

/// Gameplay role of a physical body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRole {
    Ball,
    Racket,
    LeftWall,
    RightWall,
    TopWall,
    BottomWall,
    Block,
}

impl BodyRole {
    pub const ALL: [BodyRole; 7] = [
        BodyRole::Ball,
        BodyRole::Racket,
        BodyRole::LeftWall,
        BodyRole::RightWall,
        BodyRole::TopWall,
        BodyRole::BottomWall,
        BodyRole::Block,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyRole::Ball => "ball",
            BodyRole::Racket => "racket",
            BodyRole::LeftWall => "leftBorder",
            BodyRole::RightWall => "rightBorder",
            BodyRole::TopWall => "topBorder",
            BodyRole::BottomWall => "bottomBorder",
            BodyRole::Block => "block",
        }
    }

    /// Encode for a collider user-data word.
    ///
    /// Zero is reserved for "untagged" so colliders created without a role
    /// never decode to one.
    pub fn to_user_data(self) -> u128 {
        match self {
            BodyRole::Ball => 1,
            BodyRole::Racket => 2,
            BodyRole::LeftWall => 3,
            BodyRole::RightWall => 4,
            BodyRole::TopWall => 5,
            BodyRole::BottomWall => 6,
            BodyRole::Block => 7,
        }
    }

    pub fn from_user_data(data: u128) -> Option<Self> {
        match data {
            1 => Some(BodyRole::Ball),
            2 => Some(BodyRole::Racket),
            3 => Some(BodyRole::LeftWall),
            4 => Some(BodyRole::RightWall),
            5 => Some(BodyRole::TopWall),
            6 => Some(BodyRole::BottomWall),
            7 => Some(BodyRole::Block),
            _ => None,
        }
    }
}

impl std::fmt::Display for BodyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
