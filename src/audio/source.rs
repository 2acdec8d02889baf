use std::path::Path;

use hound::WavReader;

use super::StereoFrame;
use crate::error::{PipelineError, Result};

/// Bounded, indexable stereo sample source.
pub trait AudioSource: Send {
    /// Number of frames available
    fn len(&self) -> usize;

    /// Frame at `index`, or `None` past the end
    fn frame(&self, index: usize) -> Option<StereoFrame>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Native sample rate, when the source carries one
    fn sample_rate(&self) -> Option<u32> {
        None
    }
}

/// Source backed by raw packed words, one per stereo frame
/// (left in the low 16 bits, right in the high 16 bits).
pub struct PackedSource {
    words: Vec<u32>,
    sample_rate: Option<u32>,
}

impl PackedSource {
    pub fn from_words(words: Vec<u32>) -> Self {
        Self {
            words,
            sample_rate: None,
        }
    }

    pub fn from_frames(frames: &[StereoFrame]) -> Self {
        Self::from_words(frames.iter().map(|f| f.to_source_word()).collect())
    }

    /// Same sample on both channels.
    pub fn from_mono(samples: &[i16]) -> Self {
        Self::from_words(
            samples
                .iter()
                .map(|&s| StereoFrame::new(s, s).to_source_word())
                .collect(),
        )
    }

    /// Decode a flash image: `header_len` bytes of header, then little-endian
    /// packed words. A trailing partial word is ignored.
    pub fn from_raw_image(bytes: &[u8], header_len: usize) -> Result<Self> {
        let payload = bytes.get(header_len..).ok_or_else(|| {
            PipelineError::AudioSource(format!(
                "image is {} bytes, shorter than its {} byte header",
                bytes.len(),
                header_len
            ))
        })?;

        let words = payload
            .chunks_exact(4)
            .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Ok(Self::from_words(words))
    }

    pub fn from_raw_file<P: AsRef<Path>>(path: P, header_len: usize) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| PipelineError::AudioSource(format!("{}: {}", path.display(), e)))?;
        Self::from_raw_image(&bytes, header_len)
    }

    /// Load a 16-bit stereo PCM WAV file.
    pub fn from_wav<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = WavReader::open(path.as_ref())
            .map_err(|e| PipelineError::AudioSource(e.to_string()))?;
        let spec = reader.spec();

        if spec.channels != 2 {
            return Err(PipelineError::AudioSource(format!(
                "Expected stereo WAV file, got {} channels",
                spec.channels
            )));
        }
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(PipelineError::AudioSource(format!(
                "Expected 16-bit integer PCM, got {} bit {:?}",
                spec.bits_per_sample, spec.sample_format
            )));
        }

        let samples = reader
            .into_samples::<i16>()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| PipelineError::AudioSource(e.to_string()))?;

        let words = samples
            .chunks_exact(2)
            .map(|c| StereoFrame::new(c[0], c[1]).to_source_word())
            .collect();

        Ok(Self {
            words,
            sample_rate: Some(spec.sample_rate),
        })
    }
}

impl AudioSource for PackedSource {
    fn len(&self) -> usize {
        self.words.len()
    }

    fn frame(&self, index: usize) -> Option<StereoFrame> {
        self.words
            .get(index)
            .map(|&w| StereoFrame::from_source_word(w))
    }

    fn sample_rate(&self) -> Option<u32> {
        self.sample_rate
    }
}
