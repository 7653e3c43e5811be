use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::Serialize;

use crate::engine::PayloadGenerator;

const MAX_SWIPER_ID: u32 = 5_000;
const MAX_SWIPEE_ID: u32 = 1_000_000;
const COMMENT_LEN: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// JSON body posted to `/swipe/{direction}/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwipeBody {
    pub swiper: String,
    pub swipee: String,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipeRequest {
    pub direction: Direction,
    pub body: SwipeBody,
}

/// Uniformly random swipes: swiper in `1..=5000`, swipee in `1..=1_000_000`,
/// and a 256 character alphanumeric comment.
#[derive(Debug, Clone, Copy)]
pub struct SwipeGenerator {
    max_swiper: u32,
    max_swipee: u32,
    comment_len: usize,
}

impl SwipeGenerator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_swiper: MAX_SWIPER_ID,
            max_swipee: MAX_SWIPEE_ID,
            comment_len: COMMENT_LEN,
        }
    }
}

impl Default for SwipeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PayloadGenerator for SwipeGenerator {
    type Payload = SwipeRequest;

    fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> SwipeRequest {
        let direction = if rng.gen_bool(0.5) {
            Direction::Right
        } else {
            Direction::Left
        };
        let swiper = rng.gen_range(1..=self.max_swiper);
        let swipee = rng.gen_range(1..=self.max_swipee);
        let comment: String = std::iter::repeat_with(|| char::from(rng.sample(Alphanumeric)))
            .take(self.comment_len)
            .collect();

        SwipeRequest {
            direction,
            body: SwipeBody {
                swiper: swiper.to_string(),
                swipee: swipee.to_string(),
                comment,
            },
        }
    }
}
