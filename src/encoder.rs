use arrayvec::ArrayString;
use core::fmt::Write;
use static_assertions::const_assert;

pub const MAX_ENCODED_LEN: usize = 16;

pub type EncodedCommand = ArrayString<MAX_ENCODED_LEN>;

// Longest encoding is "S 4294967295\r\n".
const_assert!(MAX_ENCODED_LEN >= 14);

/// `S <n>` — shoot `frame_count` frames.
pub fn shoot(frame_count: u32) -> EncodedCommand {
    let mut buffer = EncodedCommand::new();
    let _ = write!(buffer, "S {}\r\n", frame_count);
    buffer
}

/// `D` — delete the last frame.
pub fn delete() -> EncodedCommand {
    fixed("D\r\n")
}

/// `P` — toggle playback.
pub fn toggle_play() -> EncodedCommand {
    fixed("P\r\n")
}

/// `L` — switch the host to the live feed.
pub fn go_live() -> EncodedCommand {
    fixed("L\r\n")
}

fn fixed(text: &str) -> EncodedCommand {
    let mut buffer = EncodedCommand::new();
    buffer.push_str(text);
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shoot_encoding() {
        assert_eq!(shoot(1).as_str(), "S 1\r\n");
        assert_eq!(shoot(24).as_str(), "S 24\r\n");
    }

    #[test]
    fn test_shoot_encoding_fits_largest_count() {
        assert_eq!(shoot(u32::MAX).as_str(), "S 4294967295\r\n");
    }

    #[test]
    fn test_fixed_encodings() {
        assert_eq!(delete().as_str(), "D\r\n");
        assert_eq!(toggle_play().as_str(), "P\r\n");
        assert_eq!(go_live().as_str(), "L\r\n");
    }
}
