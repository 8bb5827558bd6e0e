//! Game tuning constants.

use std::time::Duration;

/// Number of image/word pairs on the board at once.
pub const DEFAULT_PAIR_COUNT: usize = 5;

/// Countdown length for a session, in seconds.
pub const DEFAULT_TIMER_LENGTH_SECS: u32 = 60;

/// Title shown by the view layer.
pub const DEFAULT_TITLE: &str = "Picture Match Fun!";

/// Points awarded for each correct match.
pub const MATCH_SCORE: u32 = 50;

/// Interval between countdown decrements.
pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

// Relative order of the stage delays below is load-bearing:
// replacement < return-to-playing < win declaration < error clear.

/// Delay before a matched pair is swapped for a fresh one.
pub const REPLACEMENT_START_DELAY: Duration = Duration::from_millis(250);

/// Delay before a correct match hands control back to the player.
pub const RETURN_TO_PLAYING_DELAY: Duration = Duration::from_millis(300);

/// How long a freshly inserted card keeps its entering animation flag.
pub const ENTERING_CLEAR_DELAY: Duration = Duration::from_millis(500);

/// Delay between the board becoming fully matched and the win being declared.
pub const WIN_DECLARE_DELAY: Duration = Duration::from_millis(600);

/// How long mismatched cards stay flagged before the board resets.
pub const ERROR_CLEAR_DELAY: Duration = Duration::from_millis(800);

/// Lifetime of a floating score popup.
pub const POPUP_EXPIRE_DELAY: Duration = Duration::from_millis(1500);
