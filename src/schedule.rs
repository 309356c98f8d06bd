use once_cell::sync::Lazy;
use regex::Regex;

use self::models::{Day, TimeBlock};

pub mod mask;
pub mod models;

/// Token joining the blocks inside a raw schedule
pub const SEPARATOR: &str = "<p>";

// day => day of the week   | start => first period
// end => last period       | room  => room, without the parentheses
static CHUNK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<day>\p{Alphabetic})(?P<start>\d+)(?:~(?P<end>\d+))?(?:\((?P<room>[^)]*)\))?")
        .expect("chunk regex is valid")
});

/// Parse a raw schedule, i.e. `월1~2(303)<p>화3(202)`, into its blocks
///
/// Chunks that can't be read are left out, the others keep their order.
#[must_use]
pub fn parse(raw: &str) -> Vec<TimeBlock> {
    raw.split(SEPARATOR)
        .filter(|chunk| !chunk.trim().is_empty())
        .filter_map(|chunk| {
            let block = parse_chunk(chunk);
            if block.is_none() {
                tracing::debug!(chunk, "dropping malformed schedule chunk");
            }
            block
        })
        .collect()
}

/// Parse a single chunk such as `월1~2(303)`
#[must_use]
pub fn parse_chunk(chunk: &str) -> Option<TimeBlock> {
    let captures = CHUNK.captures(chunk.trim())?;

    let day = captures
        .name("day")
        .and_then(|m| m.as_str().chars().next())
        .and_then(Day::from_label)?;

    let start = captures.name("start")?.as_str().parse().ok()?;
    let end = match captures.name("end") {
        Some(m) => m.as_str().parse().ok()?,
        None => start,
    };

    let room = captures
        .name("room")
        .map(|m| m.as_str().trim())
        .filter(|room| !room.is_empty())
        .map(str::to_owned);

    TimeBlock::new(day, start, end, room)
}

/// Join blocks back into the raw catalog format
#[must_use]
pub fn format(blocks: &[TimeBlock]) -> String {
    blocks
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}
