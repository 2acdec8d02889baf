/// One 16-bit stereo sample pair
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StereoFrame {
    pub left: i16,
    pub right: i16,
}

impl StereoFrame {
    pub fn new(left: i16, right: i16) -> Self {
        Self { left, right }
    }

    /// Decode a raw source word: left in the low half, right in the high half.
    pub fn from_source_word(word: u32) -> Self {
        Self {
            left: word as u16 as i16,
            right: (word >> 16) as u16 as i16,
        }
    }

    /// Inverse of [`StereoFrame::from_source_word`].
    pub fn to_source_word(self) -> u32 {
        (self.left as u16 as u32) | ((self.right as u16 as u32) << 16)
    }

    /// Encode for the playback device: left in the high half, right in the low half.
    pub fn to_output_word(self) -> u32 {
        ((self.left as u16 as u32) << 16) | (self.right as u16 as u32)
    }

    /// Inverse of [`StereoFrame::to_output_word`].
    pub fn from_output_word(word: u32) -> Self {
        Self {
            left: (word >> 16) as u16 as i16,
            right: word as u16 as i16,
        }
    }
}
